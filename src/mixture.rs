// src/mixture.rs - Gas mixture state and thermodynamic arithmetic
//
// The mixture is a passive record: reactions and tanks mutate it from
// the outside. Tunables arrive by shared reference to the resolved
// SimConfig so no lock is taken on the hot path.

use crate::config::SimConfig;
use crate::constants::{ROUND_PRESSURE_DIGITS, ROUND_TEMP_DIGITS};
use crate::gas::{get_profile, GasType, ALL_GASES, GAS_COUNT};
use serde::{Deserialize, Serialize};

/// A well-mixed volume of gas: moles per gas, one shared temperature,
/// fixed volume in liters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasMixture {
    moles: [f64; GAS_COUNT],
    temperature: f64,
    volume: f64,
}

impl GasMixture {
    /// Create an empty mixture at the given temperature and volume.
    pub fn new(volume_l: f64, temperature_k: f64, cfg: &SimConfig) -> Self {
        GasMixture {
            moles: [0.0; GAS_COUNT],
            temperature: temperature_k.max(cfg.tcmb),
            volume: volume_l,
        }
    }

    /// Current temperature in Kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Set the temperature, clamped to the cosmic microwave background floor.
    pub fn set_temperature(&mut self, temperature_k: f64, cfg: &SimConfig) {
        self.temperature = temperature_k.max(cfg.tcmb);
    }

    /// Volume in liters (fixed for the life of the mixture).
    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn moles_of(&self, gas: GasType) -> f64 {
        self.moles[gas as usize]
    }

    /// Set a gas to an absolute mole count. Negative values clamp to zero.
    pub fn set_moles(&mut self, gas: GasType, moles: f64) {
        self.moles[gas as usize] = moles.max(0.0);
    }

    /// Add (or with a negative delta, remove) moles of one gas, clamping at zero.
    pub fn adjust_moles(&mut self, gas: GasType, delta: f64) {
        let slot = &mut self.moles[gas as usize];
        *slot = (*slot + delta).max(0.0);
    }

    pub fn total_moles(&self) -> f64 {
        self.moles.iter().sum()
    }

    /// Heat capacity in J/K: sum of moles times per-gas specific heat.
    pub fn heat_capacity(&self) -> f64 {
        ALL_GASES
            .iter()
            .map(|g| self.moles[*g as usize] * get_profile(*g).specific_heat_j_mol_k)
            .sum()
    }

    /// Thermal energy in Joules: temperature times heat capacity.
    pub fn thermal_energy(&self) -> f64 {
        self.temperature * self.heat_capacity()
    }

    /// Pressure in kPa from the ideal gas law. With R in J/(mol·K) and the
    /// volume in liters, n·R·T/V lands directly in kPa. Empty mixtures
    /// read zero.
    pub fn pressure(&self, cfg: &SimConfig) -> f64 {
        if self.volume <= 0.0 {
            return 0.0;
        }
        let n = self.total_moles();
        if n <= 0.0 {
            return 0.0;
        }
        n * cfg.r * self.temperature / self.volume
    }

    /// Absorb another mixture. Moles add per gas; the temperature is the
    /// energy-weighted blend unless the combined capacity is below the
    /// inert floor, in which case this mixture's temperature stands. The
    /// absorbed mixture's volume is discarded.
    pub fn merge(&mut self, other: &GasMixture, cfg: &SimConfig) {
        let combined_capacity = self.heat_capacity() + other.heat_capacity();
        if combined_capacity > cfg.minimum_heat_capacity {
            let combined_energy = self.thermal_energy() + other.thermal_energy();
            self.temperature = (combined_energy / combined_capacity).max(cfg.tcmb);
        }
        for gas in ALL_GASES {
            self.moles[gas as usize] += other.moles[gas as usize];
        }
    }

    /// Multiply every mole count by `factor`. Temperature is unchanged.
    pub fn scale(&mut self, factor: f64) {
        let factor = factor.max(0.0);
        for m in self.moles.iter_mut() {
            *m *= factor;
        }
    }

    /// Transfer `ratio` of every gas into a new mixture with the same
    /// temperature and volume.
    pub fn remove_ratio(&mut self, ratio: f64) -> GasMixture {
        let ratio = ratio.clamp(0.0, 1.0);
        let mut removed = GasMixture {
            moles: [0.0; GAS_COUNT],
            temperature: self.temperature,
            volume: self.volume,
        };
        for gas in ALL_GASES {
            let taken = self.moles[gas as usize] * ratio;
            self.moles[gas as usize] -= taken;
            removed.moles[gas as usize] = taken;
        }
        removed
    }

    /// Empty the mixture (vented to space). Temperature is left as-is.
    pub fn clear(&mut self) {
        self.moles = [0.0; GAS_COUNT];
    }

    /// True when every stored quantity is a finite number.
    pub fn is_finite(&self) -> bool {
        self.temperature.is_finite()
            && self.volume.is_finite()
            && self.moles.iter().all(|m| m.is_finite())
    }

    /// One-line human-readable state: temperature, pressure, then every
    /// gas with a nonzero mole count.
    pub fn status_line(&self, cfg: &SimConfig) -> String {
        let mut parts = vec![format!(
            "{:.*} K | {:.*} kPa",
            ROUND_TEMP_DIGITS,
            self.temperature,
            ROUND_PRESSURE_DIGITS,
            self.pressure(cfg)
        )];
        for gas in ALL_GASES {
            let m = self.moles[gas as usize];
            if m > 0.0 {
                parts.push(format!("{}: {:.3} mol", gas.as_str(), m));
            }
        }
        parts.join(" | ")
    }
}

/// Mixing-tool helper: given the desired true percentage of the first
/// gas and the two gas temperatures, return the volume/mole percentages
/// to dial in on the mixer.
pub fn mixing_ratio(percent_first: f64, t1: f64, t2: f64) -> (f64, f64) {
    let portion = percent_first * 0.01;
    let n_ratio = portion / (1.0 - portion) * t1 / t2;
    let n_perc = 100.0 * n_ratio / (1.0 + n_ratio);
    (n_perc, 100.0 - n_perc)
}
