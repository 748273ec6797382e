// src/tank.rs - Gas tank state machine
//
// A tank owns its mixture exclusively. Each tick applies the reaction
// set and then walks the pressure thresholds: fragmentation explodes the
// tank immediately, sustained over-pressure ruptures it after the
// integrity countdown, and anything past the leak threshold vents a
// fixed fraction to vacuum. Ruptured and exploded are terminal.

use crate::config::SimConfig;
use crate::constants::{TANK_LEAK_RATIO, TANK_RUPTURE_TICKS};
use crate::mixture::GasMixture;
use crate::reactions::react;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankState {
    Intact,
    Ruptured,
    Exploded,
}

impl TankState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TankState::Intact => "intact",
            TankState::Ruptured => "ruptured",
            TankState::Exploded => "exploded",
        }
    }

    /// Numeric code for restriction comparisons: intact 0, ruptured 1,
    /// exploded 2.
    pub fn as_code(&self) -> f64 {
        match self {
            TankState::Intact => 0.0,
            TankState::Ruptured => 1.0,
            TankState::Exploded => 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GasTank {
    pub mix: GasMixture,
    pub state: TankState,
    pub ticks: usize,
    integrity: u32,
    /// Pressure recorded at the exploding tick; drives the radius metric.
    burst_pressure: f64,
}

impl GasTank {
    pub fn new(mix: GasMixture) -> Self {
        GasTank {
            mix,
            state: TankState::Intact,
            ticks: 0,
            integrity: TANK_RUPTURE_TICKS,
            burst_pressure: 0.0,
        }
    }

    /// Run one simulation tick. Returns true if any reaction fired.
    /// Terminal tanks do nothing and report false.
    pub fn tick(&mut self, cfg: &SimConfig) -> bool {
        if self.state != TankState::Intact {
            return false;
        }

        let fired = react(&mut self.mix, cfg);
        let pressure = self.mix.pressure(cfg);

        if pressure >= cfg.tank_fragment_pressure {
            self.state = TankState::Exploded;
            self.burst_pressure = pressure;
        } else if pressure >= cfg.tank_rupture_pressure {
            if self.integrity == 0 {
                self.state = TankState::Ruptured;
                self.mix.clear();
            } else {
                self.integrity -= 1;
            }
        } else if pressure >= cfg.tank_leak_pressure {
            self.mix.scale(1.0 - TANK_LEAK_RATIO);
        }

        self.ticks += 1;
        fired
    }

    /// Run up to `cap` ticks or until a terminal state; returns the tick
    /// count.
    pub fn tick_n(&mut self, cap: usize, cfg: &SimConfig) -> usize {
        while self.state == TankState::Intact && self.ticks < cap {
            self.tick(cfg);
        }
        self.ticks
    }

    /// Explosion radius from overpressure at fragmentation: clamp to
    /// non-negative before the square root, round only at display time.
    pub fn calc_radius(&self, cfg: &SimConfig) -> f64 {
        let pressure = match self.state {
            TankState::Exploded => self.burst_pressure,
            _ => self.mix.pressure(cfg),
        };
        ((pressure - cfg.tank_fragment_pressure) / cfg.tank_fragment_scale)
            .max(0.0)
            .sqrt()
    }

    /// Human-readable snapshot: temperature, pressure, per-gas moles.
    pub fn get_status(&self, cfg: &SimConfig) -> String {
        self.mix.status_line(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gas::GasType;
    use approx::assert_abs_diff_eq;
    use more_asserts::assert_lt;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    /// Inert nitrogen fill at whatever mole count hits the wanted pressure.
    fn nitrogen_tank(pressure_kpa: f64, temp: f64) -> GasTank {
        let cfg = cfg();
        let mut mix = GasMixture::new(cfg.tank_volume, temp, &cfg);
        let moles = pressure_kpa * cfg.tank_volume / (cfg.r * temp);
        mix.set_moles(GasType::Nitrogen, moles);
        GasTank::new(mix)
    }

    #[test]
    fn test_fragment_pressure_explodes_in_one_tick() {
        let cfg = cfg();
        let mut tank = nitrogen_tank(cfg.tank_fragment_pressure * 1.2, 293.15);
        tank.tick_n(100, &cfg);
        assert_eq!(tank.state, TankState::Exploded);
        assert_eq!(tank.ticks, 1);
        assert!(tank.calc_radius(&cfg) >= 0.0);
    }

    #[test]
    fn test_quiet_tank_runs_to_cap_intact() {
        let cfg = cfg();
        let mut tank = nitrogen_tank(cfg.one_atmosphere, 293.15);
        let ticks = tank.tick_n(50, &cfg);
        assert_eq!(ticks, 50);
        assert_eq!(tank.state, TankState::Intact);
        assert_eq!(tank.calc_radius(&cfg), 0.0);
    }

    #[test]
    fn test_sustained_overpressure_ruptures_and_vents() {
        let cfg = cfg();
        // Between rupture and fragment thresholds
        let mut tank = nitrogen_tank(
            (cfg.tank_rupture_pressure + cfg.tank_fragment_pressure) / 2.0,
            293.15,
        );
        tank.tick_n(100, &cfg);
        assert_eq!(tank.state, TankState::Ruptured);
        // Countdown takes the integrity ticks plus the rupturing tick
        assert_eq!(tank.ticks as u32, TANK_RUPTURE_TICKS + 1);
        assert_eq!(tank.mix.total_moles(), 0.0);
    }

    #[test]
    fn test_leak_band_bleeds_pressure() {
        let cfg = cfg();
        let start = (cfg.tank_leak_pressure + cfg.tank_rupture_pressure) / 2.0;
        let mut tank = nitrogen_tank(start, 293.15);
        tank.tick(&cfg);
        assert_eq!(tank.state, TankState::Intact);
        assert_abs_diff_eq!(
            tank.mix.pressure(&cfg),
            start * (1.0 - TANK_LEAK_RATIO),
            epsilon = 1e-6
        );
        // Leaking converges below the leak threshold and stays intact
        tank.tick_n(60, &cfg);
        assert_eq!(tank.state, TankState::Intact);
        assert_lt!(tank.mix.pressure(&cfg), cfg.tank_leak_pressure);
    }

    #[test]
    fn test_radius_grows_with_overpressure() {
        let cfg = cfg();
        let mut small = nitrogen_tank(cfg.tank_fragment_pressure * 1.1, 293.15);
        let mut big = nitrogen_tank(cfg.tank_fragment_pressure * 3.0, 293.15);
        small.tick(&cfg);
        big.tick(&cfg);
        assert_lt!(small.calc_radius(&cfg), big.calc_radius(&cfg));
    }

    #[test]
    fn test_terminal_tank_ignores_ticks() {
        let cfg = cfg();
        let mut tank = nitrogen_tank(cfg.tank_fragment_pressure * 2.0, 293.15);
        tank.tick(&cfg);
        assert_eq!(tank.state, TankState::Exploded);
        let radius = tank.calc_radius(&cfg);
        assert!(!tank.tick(&cfg));
        assert_eq!(tank.ticks, 1);
        assert_abs_diff_eq!(tank.calc_radius(&cfg), radius, epsilon = 1e-12);
    }
}
