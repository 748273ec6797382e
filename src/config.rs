// src/config.rs - Tunable simulation constants: named presets plus a
// JSON file fallback, resolved once into an immutable SimConfig record.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

/// Embedded preset override documents, applied on top of the compiled-in
/// defaults. Update the README if you add more.
pub static PRESETS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    // goob is just the defaults
    m.insert("goob", "{}");
    m.insert(
        "wizden",
        r#"{
            "Tritium": { "FireEnergyReleased": 2840000, "BurnFuelRatio": 2 }
        }"#,
    );
    m.insert(
        "frontier",
        r#"{
            "Plasma": { "SuperSaturationThreshold": 30, "UpperTemperature": 700 },
            "Reactions": { "TritiumFireTemp": 700 }
        }"#,
    );
    // Identical to frontier but 10 liter tanks
    m.insert(
        "monolith",
        r#"{
            "Plasma": { "SuperSaturationThreshold": 30, "UpperTemperature": 700 },
            "Reactions": { "TritiumFireTemp": 700 },
            "Tank": { "Volume": 10 }
        }"#,
    );
    m
});

/// Every tunable the simulation reads, resolved once from a preset or a
/// config file and then treated as read-only. Combustion energies are
/// stored pre-multiplied by `heat_scale`; `n2o_decomposition_rate` is
/// stored inverted (a per-tick fraction).
#[derive(Debug, Clone)]
pub struct SimConfig {
    // [Atmosim]
    pub default_tol: f64,

    // [Cvars]
    pub heat_scale: f64,

    // [Atmospherics]
    pub r: f64,
    pub one_atmosphere: f64,
    pub tcmb: f64,
    pub t0c: f64,
    pub t20c: f64,
    pub minimum_heat_capacity: f64,

    // [Plasma]
    pub fire_plasma_energy_released: f64,
    pub super_saturation_threshold: f64,
    pub super_saturation_ends: f64,
    pub oxygen_burn_rate_base: f64,
    pub plasma_minimum_burn_temperature: f64,
    pub plasma_upper_temperature: f64,
    pub plasma_oxygen_fullburn: f64,
    pub plasma_burn_rate_delta: f64,

    // [Tritium]
    pub fire_hydrogen_energy_released: f64,
    pub minimum_tritium_oxyburn_energy: f64,
    pub tritium_burn_oxy_factor: f64,
    pub tritium_burn_trit_factor: f64,
    pub tritium_burn_fuel_ratio: f64,

    // [Frezon]
    pub frezon_cool_lower_temperature: f64,
    pub frezon_cool_mid_temperature: f64,
    pub frezon_cool_maximum_energy_modifier: f64,
    pub frezon_nitrogen_cool_ratio: f64,
    pub frezon_cool_energy_released: f64,
    pub frezon_cool_rate_modifier: f64,
    pub frezon_production_temp: f64,
    pub frezon_production_max_efficiency_temperature: f64,
    pub frezon_production_nitrogen_ratio: f64,
    pub frezon_production_trit_ratio: f64,
    pub frezon_production_conversion_rate: f64,

    // [N2O]
    pub n2o_decomposition_rate: f64,

    // [Nitrium]
    pub nitrium_decomposition_energy: f64,

    // [Reactions]
    pub reaction_min_gas: f64,
    pub plasma_fire_temp: f64,
    pub trit_fire_temp: f64,
    pub frezon_cool_temp: f64,
    pub n2o_decomp_temp: f64,
    pub nitrium_decomp_temp: f64,

    // [Canister]
    pub pressure_cap: f64,
    pub required_transfer_volume: f64,

    // [Tank]
    pub tank_volume: f64,
    pub tank_leak_pressure: f64,
    pub tank_rupture_pressure: f64,
    pub tank_fragment_pressure: f64,
    pub tank_fragment_scale: f64,

    // [Misc]
    pub tickrate: f64,
}

fn get_f64(overrides: &Value, section: &str, key: &str) -> Option<f64> {
    overrides.get(section)?.get(key)?.as_f64()
}

impl SimConfig {
    /// Build a config from a JSON override document. Keys not present
    /// fall back to the goobstation defaults.
    pub fn from_overrides(overrides: &Value) -> SimConfig {
        let value_or = |section: &str, key: &str, default: f64| -> f64 {
            get_f64(overrides, section, key).unwrap_or(default)
        };

        let default_tol = value_or("Atmosim", "DefaultTolerance", 0.95);

        // Inverted: configured as a divisor on energy releases.
        let heat_scale = value_or("Cvars", "HeatScale", 1.0 / 8.0);

        let r = value_or("Atmospherics", "R", 8.314462618);
        let one_atmosphere = value_or("Atmospherics", "OneAtmosphere", 101.325);
        let tcmb = value_or("Atmospherics", "TCMB", 2.7);
        let t0c = value_or("Atmospherics", "T0C", 273.15);
        let t20c = value_or("Atmospherics", "T20C", 293.15);
        let minimum_heat_capacity = value_or("Atmospherics", "MinimumHeatCapacity", 0.0003);

        let fire_plasma_energy_released =
            value_or("Plasma", "FireEnergyReleased", 160_000.0) * heat_scale;
        let super_saturation_threshold = value_or("Plasma", "SuperSaturationThreshold", 96.0);
        let super_saturation_ends = value_or(
            "Plasma",
            "SuperSaturationEnds",
            super_saturation_threshold / 3.0,
        );
        let oxygen_burn_rate_base = value_or("Plasma", "OxygenBurnRateBase", 1.4);
        let plasma_minimum_burn_temperature =
            value_or("Plasma", "MinimumBurnTemperature", 100.0 + t0c);
        let plasma_upper_temperature = value_or("Plasma", "UpperTemperature", 1370.0 + t0c);
        let plasma_oxygen_fullburn = value_or("Plasma", "OxygenFullburn", 10.0);
        let plasma_burn_rate_delta = value_or("Plasma", "BurnRateDelta", 9.0);

        let fire_hydrogen_energy_released =
            value_or("Tritium", "FireEnergyReleased", 284_000.0) * heat_scale;
        let minimum_tritium_oxyburn_energy =
            value_or("Tritium", "MinimumOxyburnEnergy", 143_000.0) * heat_scale;
        let tritium_burn_oxy_factor = value_or("Tritium", "BurnOxyFactor", 100.0);
        let tritium_burn_trit_factor = value_or("Tritium", "BurnTritFactor", 10.0);
        let tritium_burn_fuel_ratio = value_or("Tritium", "BurnFuelRatio", 0.0);

        let frezon_cool_lower_temperature = value_or("Frezon", "CoolLowerTemperature", 23.15);
        let frezon_cool_mid_temperature = value_or("Frezon", "CoolMidTemperature", 373.15);
        let frezon_cool_maximum_energy_modifier =
            value_or("Frezon", "CoolMaximumEnergyModifier", 10.0);
        let frezon_nitrogen_cool_ratio = value_or("Frezon", "NitrogenCoolRatio", 5.0);
        let frezon_cool_energy_released =
            value_or("Frezon", "CoolEnergyReleased", -600_000.0) * heat_scale;
        let frezon_cool_rate_modifier = value_or("Frezon", "CoolRateModifier", 20.0);
        let frezon_production_temp = value_or("Frezon", "ProductionTemp", 73.15);
        let frezon_production_max_efficiency_temperature =
            value_or("Frezon", "ProductionMaxEfficiencyTemperature", 73.15);
        let frezon_production_nitrogen_ratio = value_or("Frezon", "ProductionNitrogenRatio", 10.0);
        let frezon_production_trit_ratio = value_or("Frezon", "ProductionTritRatio", 50.0);
        let frezon_production_conversion_rate = value_or("Frezon", "ProductionConversionRate", 50.0);

        // Inverted: stored as the per-tick decomposed fraction.
        let n2o_decomposition_rate = value_or("N2O", "DecompositionRate", 1.0 / 2.0);

        let nitrium_decomposition_energy = value_or("Nitrium", "DecompositionEnergy", 30_000.0);

        let reaction_min_gas = value_or("Reactions", "ReactionMinGas", 0.01);
        let plasma_fire_temp = value_or("Reactions", "PlasmaFireTemp", 373.149);
        let trit_fire_temp = value_or("Reactions", "TritiumFireTemp", 373.149);
        let frezon_cool_temp = value_or("Reactions", "FrezonCoolTemp", 23.15);
        let n2o_decomp_temp = value_or("Reactions", "N2ODecomposionTemp", 850.0);
        let nitrium_decomp_temp = value_or("Reactions", "NitriumDecompositionTemp", t0c + 70.0);

        let pressure_cap = value_or("Canister", "TransferPressureCap", 1013.25);
        // canister + two pipes volume
        let required_transfer_volume =
            value_or("Canister", "RequiredTransferVolume", 1500.0 + 200.0 * 2.0);

        let tank_volume = value_or("Tank", "Volume", 5.0);
        let tank_leak_pressure = value_or("Tank", "LeakPressure", 30.0 * one_atmosphere);
        let tank_rupture_pressure = value_or("Tank", "RupturePressure", 40.0 * one_atmosphere);
        let tank_fragment_pressure = value_or("Tank", "FragmentPressure", 50.0 * one_atmosphere);
        let tank_fragment_scale = value_or("Tank", "FragmentScale", 2.25 * one_atmosphere);

        let tickrate = value_or("Misc", "Tickrate", 0.5);

        SimConfig {
            default_tol,
            heat_scale,
            r,
            one_atmosphere,
            tcmb,
            t0c,
            t20c,
            minimum_heat_capacity,
            fire_plasma_energy_released,
            super_saturation_threshold,
            super_saturation_ends,
            oxygen_burn_rate_base,
            plasma_minimum_burn_temperature,
            plasma_upper_temperature,
            plasma_oxygen_fullburn,
            plasma_burn_rate_delta,
            fire_hydrogen_energy_released,
            minimum_tritium_oxyburn_energy,
            tritium_burn_oxy_factor,
            tritium_burn_trit_factor,
            tritium_burn_fuel_ratio,
            frezon_cool_lower_temperature,
            frezon_cool_mid_temperature,
            frezon_cool_maximum_energy_modifier,
            frezon_nitrogen_cool_ratio,
            frezon_cool_energy_released,
            frezon_cool_rate_modifier,
            frezon_production_temp,
            frezon_production_max_efficiency_temperature,
            frezon_production_nitrogen_ratio,
            frezon_production_trit_ratio,
            frezon_production_conversion_rate,
            n2o_decomposition_rate,
            nitrium_decomposition_energy,
            reaction_min_gas,
            plasma_fire_temp,
            trit_fire_temp,
            frezon_cool_temp,
            n2o_decomp_temp,
            nitrium_decomp_temp,
            pressure_cap,
            required_transfer_volume,
            tank_volume,
            tank_leak_pressure,
            tank_rupture_pressure,
            tank_fragment_pressure,
            tank_fragment_scale,
            tickrate,
        }
    }

    /// Resolve a preset name, or failing that, a JSON file path.
    pub fn resolve(name_or_path: &str) -> Result<SimConfig, String> {
        let doc = if let Some(embedded) = PRESETS.get(name_or_path) {
            serde_json::from_str::<Value>(embedded)
                .map_err(|e| format!("config error: bad embedded preset '{}': {}", name_or_path, e))?
        } else {
            let text = fs::read_to_string(name_or_path).map_err(|e| {
                format!(
                    "config error: '{}' is neither a preset ({}) nor a readable file: {}",
                    name_or_path,
                    preset_names(),
                    e
                )
            })?;
            serde_json::from_str::<Value>(&text)
                .map_err(|e| format!("config error: failed to parse {}: {}", name_or_path, e))?
        };
        Ok(SimConfig::from_overrides(&doc))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig::from_overrides(&Value::Null)
    }
}

pub fn preset_names() -> String {
    let mut names: Vec<&str> = PRESETS.keys().copied().collect();
    names.sort();
    names.join(", ")
}

/// Process-wide current configuration. Written by `set_config`, read by
/// everything else through cheap `Arc` clones.
static CURRENT: Lazy<Mutex<Arc<SimConfig>>> =
    Lazy::new(|| Mutex::new(Arc::new(SimConfig::default())));

/// Install a named preset or a JSON config file as the current
/// configuration. On failure the previous configuration stays in place.
pub fn set_config(name_or_path: &str) -> Result<(), String> {
    let resolved = SimConfig::resolve(name_or_path)?;
    *CURRENT.lock().unwrap() = Arc::new(resolved);
    Ok(())
}

/// Snapshot of the current configuration.
pub fn current_config() -> Arc<SimConfig> {
    CURRENT.lock().unwrap().clone()
}
