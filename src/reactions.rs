// src/reactions.rs - The ordered gas reaction set
//
// Reactions are free functions over a GasMixture. Each one checks its
// predicate, applies mole deltas (clamped at zero by the mixture), and
// converts its released energy into a temperature change against the
// post-reaction heat capacity. A reaction that cannot proceed leaves
// the mixture untouched and reports false.

use crate::config::SimConfig;
use crate::gas::GasType;
use crate::math_utils::clamp01;
use crate::mixture::GasMixture;

/// Apply every reaction once, in the fixed order plasma fire, tritium
/// fire, frezon coolant, frezon production, N2O decomposition, nitrium
/// decomposition. Later reactions see the mixture as mutated by earlier
/// ones. Returns true if any reaction fired this tick.
pub fn react(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let mut any = false;
    any |= plasma_fire(mix, cfg);
    any |= tritium_fire(mix, cfg);
    any |= frezon_coolant(mix, cfg);
    any |= frezon_production(mix, cfg);
    any |= n2o_decomposition(mix, cfg);
    any |= nitrium_decomposition(mix, cfg);
    any
}

/// Recompute temperature from pre-reaction thermal energy plus the
/// released energy, against the post-reaction heat capacity. Mixtures
/// below the inert capacity floor keep their temperature.
fn apply_energy_delta(mix: &mut GasMixture, cfg: &SimConfig, energy_before: f64, delta_e: f64) {
    let new_capacity = mix.heat_capacity();
    if new_capacity > cfg.minimum_heat_capacity {
        mix.set_temperature((energy_before + delta_e) / new_capacity, cfg);
    }
}

/// Plasma combustion. Oxygen-rich mixtures supersaturate and yield
/// tritium instead of carbon dioxide.
pub fn plasma_fire(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let oxygen = mix.moles_of(GasType::Oxygen);
    let plasma = mix.moles_of(GasType::Plasma);

    if temperature < cfg.plasma_fire_temp
        || oxygen < cfg.reaction_min_gas
        || plasma < cfg.reaction_min_gas
    {
        return false;
    }

    let temperature_scale = clamp01(
        (temperature - cfg.plasma_minimum_burn_temperature)
            / (cfg.plasma_upper_temperature - cfg.plasma_minimum_burn_temperature),
    );
    let oxygen_burn_rate = cfg.oxygen_burn_rate_base - temperature_scale;
    if temperature_scale <= 0.0 || oxygen_burn_rate <= 0.0 {
        return false;
    }

    let mut plasma_burned = if oxygen / plasma > cfg.plasma_oxygen_fullburn {
        plasma * temperature_scale / cfg.plasma_burn_rate_delta
    } else {
        (oxygen / cfg.plasma_oxygen_fullburn) * temperature_scale / cfg.plasma_burn_rate_delta
    };
    plasma_burned = plasma_burned.min(plasma).min(oxygen / oxygen_burn_rate);
    if plasma_burned <= 0.0 {
        return false;
    }

    // Product split: tritium above the supersaturation threshold, CO2
    // below the end point, linear blend between.
    let oxy_ratio = oxygen / plasma;
    let supersaturation = if cfg.super_saturation_threshold > cfg.super_saturation_ends {
        clamp01(
            (oxy_ratio - cfg.super_saturation_ends)
                / (cfg.super_saturation_threshold - cfg.super_saturation_ends),
        )
    } else if oxy_ratio >= cfg.super_saturation_threshold {
        1.0
    } else {
        0.0
    };

    let energy_before = mix.thermal_energy();
    let product_moles = plasma_burned * oxygen_burn_rate;
    mix.set_moles(GasType::Plasma, plasma - plasma_burned);
    mix.set_moles(GasType::Oxygen, oxygen - plasma_burned * oxygen_burn_rate);
    mix.adjust_moles(GasType::Tritium, product_moles * supersaturation);
    mix.adjust_moles(GasType::CarbonDioxide, product_moles * (1.0 - supersaturation));

    let delta_e = plasma_burned * cfg.fire_plasma_energy_released;
    apply_energy_delta(mix, cfg, energy_before, delta_e);
    true
}

/// Tritium combustion. Oxygen-starved burns are slow and trickle out
/// water vapor; energetic oxygen-rich burns consume the tritium pool a
/// factor at a time and yield hydrogen.
pub fn tritium_fire(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let tritium = mix.moles_of(GasType::Tritium);
    let oxygen = mix.moles_of(GasType::Oxygen);

    if temperature < cfg.trit_fire_temp || tritium < cfg.reaction_min_gas {
        return false;
    }

    let energy_before = mix.thermal_energy();
    let burned_fuel;
    if oxygen < tritium * cfg.tritium_burn_oxy_factor {
        burned_fuel = (oxygen / cfg.tritium_burn_oxy_factor).min(tritium);
        if burned_fuel <= 0.0 {
            return false;
        }
        mix.set_moles(GasType::Tritium, tritium - burned_fuel);
        mix.set_moles(GasType::Oxygen, oxygen - burned_fuel);
    } else {
        let consumed = tritium / cfg.tritium_burn_trit_factor;
        burned_fuel = consumed * (1.0 + cfg.tritium_burn_fuel_ratio);
        mix.set_moles(GasType::Tritium, tritium - consumed);
        mix.set_moles(GasType::Oxygen, oxygen - consumed);
    }

    // Cold burns stay wet; only energetic burns crack the fuel to hydrogen.
    if energy_before < cfg.minimum_tritium_oxyburn_energy {
        mix.adjust_moles(GasType::WaterVapor, burned_fuel);
    } else {
        mix.adjust_moles(GasType::Hydrogen, burned_fuel);
    }

    let delta_e = burned_fuel * cfg.fire_hydrogen_energy_released;
    apply_energy_delta(mix, cfg, energy_before, delta_e);
    true
}

/// Frezon + nitrogen endothermic cooling, producing nitrous oxide. The
/// configured energy release is negative; the TCMB clamp bounds the drop.
pub fn frezon_coolant(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let nitrogen = mix.moles_of(GasType::Nitrogen);
    let frezon = mix.moles_of(GasType::Frezon);

    if temperature < cfg.frezon_cool_lower_temperature
        || temperature > cfg.frezon_cool_mid_temperature
        || nitrogen < cfg.reaction_min_gas
        || frezon < cfg.reaction_min_gas
        || nitrogen / frezon < cfg.frezon_nitrogen_cool_ratio
    {
        return false;
    }

    let span = cfg.frezon_cool_mid_temperature - cfg.frezon_cool_lower_temperature;
    if span <= 0.0 {
        return false;
    }
    let scale = (temperature - cfg.frezon_cool_lower_temperature) / span;
    let energy_modifier = (scale * cfg.frezon_cool_maximum_energy_modifier).min(1.0);

    let burn_rate = frezon * scale / cfg.frezon_cool_rate_modifier;
    if burn_rate <= 0.0 {
        return false;
    }

    let nitrogen_used = (burn_rate * cfg.frezon_nitrogen_cool_ratio).min(nitrogen);
    let frezon_used = nitrogen_used / cfg.frezon_nitrogen_cool_ratio;

    mix.adjust_moles(GasType::Nitrogen, -nitrogen_used);
    mix.adjust_moles(GasType::Frezon, -frezon_used);
    mix.adjust_moles(GasType::NitrousOxide, nitrogen_used + frezon_used);

    // Applied as a temperature delta: a strictly negative ΔT, unlike the
    // fires, which re-derive temperature from total thermal energy.
    let new_capacity = mix.heat_capacity();
    if new_capacity > cfg.minimum_heat_capacity {
        let delta_t =
            frezon_used * cfg.frezon_cool_energy_released * energy_modifier / new_capacity;
        mix.set_temperature(mix.temperature() + delta_t, cfg);
    }
    true
}

/// Cryogenic frezon production from oxygen and a tritium seed, with
/// nitrogen as the catalyst. Thermal energy is conserved across the
/// capacity change.
pub fn frezon_production(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let oxygen = mix.moles_of(GasType::Oxygen);
    let nitrogen = mix.moles_of(GasType::Nitrogen);
    let tritium = mix.moles_of(GasType::Tritium);

    if temperature > cfg.frezon_production_temp
        || oxygen < cfg.reaction_min_gas
        || nitrogen < cfg.reaction_min_gas
        || tritium < cfg.reaction_min_gas
    {
        return false;
    }

    let efficiency = (cfg.frezon_production_max_efficiency_temperature / temperature).min(1.0);
    let converted = oxygen.min(nitrogen / cfg.frezon_production_nitrogen_ratio) * efficiency
        / cfg.frezon_production_conversion_rate;
    if converted <= 0.0 {
        return false;
    }
    let tritium_used = (converted / cfg.frezon_production_trit_ratio).min(tritium);

    let energy_before = mix.thermal_energy();
    mix.adjust_moles(GasType::Oxygen, -converted);
    mix.adjust_moles(GasType::Tritium, -tritium_used);
    mix.adjust_moles(GasType::Frezon, converted + tritium_used);

    apply_energy_delta(mix, cfg, energy_before, 0.0);
    true
}

/// Nitrous oxide cracks back to nitrogen and oxygen at high temperature.
pub fn n2o_decomposition(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let n2o = mix.moles_of(GasType::NitrousOxide);

    if temperature < cfg.n2o_decomp_temp || n2o < cfg.reaction_min_gas {
        return false;
    }

    let decomposed = n2o * cfg.n2o_decomposition_rate;
    if decomposed <= 0.0 {
        return false;
    }

    let energy_before = mix.thermal_energy();
    mix.adjust_moles(GasType::NitrousOxide, -decomposed);
    mix.adjust_moles(GasType::Nitrogen, decomposed);
    mix.adjust_moles(GasType::Oxygen, decomposed / 2.0);

    apply_energy_delta(mix, cfg, energy_before, 0.0);
    true
}

/// Nitrium is stable when hot; below the threshold it decomposes into
/// nitrogen and hydrogen, releasing heat. The decomposition energy is
/// not heat-scaled.
pub fn nitrium_decomposition(mix: &mut GasMixture, cfg: &SimConfig) -> bool {
    let temperature = mix.temperature();
    let nitrium = mix.moles_of(GasType::Nitrium);

    if temperature > cfg.nitrium_decomp_temp || nitrium < cfg.reaction_min_gas {
        return false;
    }

    let decomposed = nitrium * (temperature / cfg.nitrium_decomp_temp).min(1.0);
    if decomposed <= 0.0 {
        return false;
    }

    let energy_before = mix.thermal_energy();
    mix.adjust_moles(GasType::Nitrium, -decomposed);
    mix.adjust_moles(GasType::Nitrogen, decomposed);
    mix.adjust_moles(GasType::Hydrogen, decomposed);

    let delta_e = decomposed * cfg.nitrium_decomposition_energy;
    apply_energy_delta(mix, cfg, energy_before, delta_e);
    true
}
