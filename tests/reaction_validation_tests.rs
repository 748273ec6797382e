// Comprehensive reaction validation tests
// Exercises each reaction individually to ensure mixture state changes in expected ways

use atmo_tank_rust::config::SimConfig;
use atmo_tank_rust::gas::{GasType, ALL_GASES};
use atmo_tank_rust::mixture::GasMixture;
use atmo_tank_rust::reactions;

fn test_mixture(gases: &[(GasType, f64)], temp_k: f64, cfg: &SimConfig) -> GasMixture {
    let mut mix = GasMixture::new(cfg.tank_volume, temp_k, cfg);
    for (gas, moles) in gases {
        mix.set_moles(*gas, *moles);
    }
    mix
}

#[test]
fn test_plasma_fire_adds_energy() {
    println!("🔥 Testing plasma fire - should ADD energy and consume fuel");

    let cfg = SimConfig::default();
    let mut mix = test_mixture(&[(GasType::Plasma, 5.0), (GasType::Oxygen, 5.0)], 600.0, &cfg);

    let initial_energy = mix.thermal_energy();
    let initial_temp = mix.temperature();
    println!("   Initial energy: {:.2e} J", initial_energy);
    println!("   Initial temp: {:.1}K", initial_temp);

    assert!(reactions::plasma_fire(&mut mix, &cfg), "plasma fire should ignite at 600K");

    let final_energy = mix.thermal_energy();
    let final_temp = mix.temperature();
    println!("   Final energy: {:.2e} J", final_energy);
    println!("   Final temp: {:.1}K", final_temp);

    assert!(final_temp > initial_temp, "plasma fire should increase temperature!");
    assert!(mix.moles_of(GasType::Plasma) < 5.0, "plasma fire should consume plasma!");
    assert!(mix.moles_of(GasType::Oxygen) < 5.0, "plasma fire should consume oxygen!");

    println!("   ✅ Plasma fire correctly consumes fuel and increases temperature");
}

#[test]
fn test_frezon_coolant_removes_energy() {
    println!("❄️ Testing frezon coolant - should REMOVE energy every tick");

    let cfg = SimConfig::default();
    let mut mix = test_mixture(&[(GasType::Nitrogen, 10.0), (GasType::Frezon, 1.0)], 300.0, &cfg);

    let mut last_temp = mix.temperature();
    for tick in 1..=5 {
        assert!(
            reactions::frezon_coolant(&mut mix, &cfg),
            "frezon coolant should keep firing on tick {}",
            tick
        );
        let temp = mix.temperature();
        println!("   Tick {}: {:.2}K", tick, temp);
        assert!(temp < last_temp, "temperature should decrease every tick!");
        last_temp = temp;
    }

    assert!(mix.moles_of(GasType::NitrousOxide) > 0.0, "coolant should produce N2O");
    println!("   ✅ Frezon coolant cools monotonically while it fires");
}

#[test]
fn test_reaction_order_within_one_tick() {
    println!("🔗 Testing reaction chaining - plasma fire feeds the tritium fire in the same tick");

    let cfg = SimConfig::default();
    // Supersaturated: O2/plasma = 100, so the plasma fire yields tritium,
    // and the tritium fire sees it immediately.
    let mut mix = test_mixture(&[(GasType::Plasma, 1.0), (GasType::Oxygen, 100.0)], 900.0, &cfg);

    assert!(reactions::react(&mut mix, &cfg));

    println!("   tritium: {:.4} mol", mix.moles_of(GasType::Tritium));
    println!("   hydrogen: {:.4} mol", mix.moles_of(GasType::Hydrogen));
    assert!(
        mix.moles_of(GasType::Tritium) > 0.0,
        "supersaturated plasma fire should have produced tritium"
    );
    assert!(
        mix.moles_of(GasType::Hydrogen) > 0.0,
        "the tritium fire should already have burned some of it to hydrogen"
    );
    println!("   ✅ Reactions apply in order against the mutated mixture");
}

#[test]
fn test_n2o_decomposition_mass_flow() {
    println!("🧪 Testing N2O decomposition at 900K");

    let cfg = SimConfig::default();
    let mut mix = test_mixture(&[(GasType::NitrousOxide, 4.0)], 900.0, &cfg);

    assert!(reactions::n2o_decomposition(&mut mix, &cfg));
    println!(
        "   N2O {:.2} | N2 {:.2} | O2 {:.2}",
        mix.moles_of(GasType::NitrousOxide),
        mix.moles_of(GasType::Nitrogen),
        mix.moles_of(GasType::Oxygen)
    );

    atmo_tank_rust::assert_deviation!(mix.moles_of(GasType::NitrousOxide), 2.0, 0.001);
    atmo_tank_rust::assert_deviation!(mix.moles_of(GasType::Nitrogen), 2.0, 0.001);
    atmo_tank_rust::assert_deviation!(mix.moles_of(GasType::Oxygen), 1.0, 0.001);
}

#[test]
fn test_invariants_across_temperature_sweep() {
    println!("🌡️ Sweeping temperatures - moles stay non-negative, temperature stays above TCMB");

    let cfg = SimConfig::default();
    let compositions: [&[(GasType, f64)]; 4] = [
        &[(GasType::Plasma, 2.0), (GasType::Oxygen, 50.0)],
        &[(GasType::Tritium, 3.0), (GasType::Oxygen, 1.0)],
        &[(GasType::Nitrogen, 20.0), (GasType::Frezon, 2.0)],
        &[
            (GasType::Nitrium, 1.0),
            (GasType::NitrousOxide, 1.0),
            (GasType::Tritium, 0.5),
            (GasType::Oxygen, 2.0),
        ],
    ];

    for temp in [3.0, 50.0, 293.15, 500.0, 900.0, 2000.0, 10000.0] {
        for gases in compositions {
            let mut mix = test_mixture(gases, temp, &cfg);
            for _ in 0..20 {
                reactions::react(&mut mix, &cfg);
            }
            for gas in ALL_GASES {
                assert!(
                    mix.moles_of(gas) >= 0.0,
                    "{} went negative at {}K",
                    gas.as_str(),
                    temp
                );
            }
            assert!(
                mix.temperature() >= cfg.tcmb,
                "temperature fell below TCMB at start temp {}K",
                temp
            );
        }
    }
    println!("   ✅ Non-negativity and the TCMB floor hold across the sweep");
}

#[test]
fn test_failed_predicate_leaves_mixture_untouched() {
    println!("🚫 Testing no-op idempotence for cold, inert mixtures");

    let cfg = SimConfig::default();
    let mut mix = test_mixture(
        &[(GasType::Plasma, 2.0), (GasType::Oxygen, 2.0), (GasType::Nitrium, 1.0)],
        360.0,
        &cfg,
    );
    let before = mix.clone();

    // 360K: too cold for the fires, too hot for nitrium decomposition
    assert!(!reactions::react(&mut mix, &cfg));
    assert_eq!(mix, before, "a reaction with a false predicate must not mutate the mixture");
}
