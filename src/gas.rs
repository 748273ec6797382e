// src/gas.rs - Gas registry with per-gas thermal properties

use serde::{Deserialize, Serialize};

/// Number of gases the simulation tracks. Mole arrays are indexed by
/// `GasType as usize`.
pub const GAS_COUNT: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GasType {
    Oxygen,
    Nitrogen,
    CarbonDioxide,
    Plasma,
    Tritium,
    WaterVapor,
    NitrousOxide,
    Frezon,
    Nitrium,
    Hydrogen,
    Healium,
    ProtoNitrate,
    BZ,
    Pluoxium,
}

/// Every gas, in mole-array index order.
pub const ALL_GASES: [GasType; GAS_COUNT] = [
    GasType::Oxygen,
    GasType::Nitrogen,
    GasType::CarbonDioxide,
    GasType::Plasma,
    GasType::Tritium,
    GasType::WaterVapor,
    GasType::NitrousOxide,
    GasType::Frezon,
    GasType::Nitrium,
    GasType::Hydrogen,
    GasType::Healium,
    GasType::ProtoNitrate,
    GasType::BZ,
    GasType::Pluoxium,
];

impl GasType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GasType::Oxygen => "oxygen",
            GasType::Nitrogen => "nitrogen",
            GasType::CarbonDioxide => "carbon_dioxide",
            GasType::Plasma => "plasma",
            GasType::Tritium => "tritium",
            GasType::WaterVapor => "water_vapor",
            GasType::NitrousOxide => "nitrous_oxide",
            GasType::Frezon => "frezon",
            GasType::Nitrium => "nitrium",
            GasType::Hydrogen => "hydrogen",
            GasType::Healium => "healium",
            GasType::ProtoNitrate => "proto_nitrate",
            GasType::BZ => "bz",
            GasType::Pluoxium => "pluoxium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "oxygen" => Some(GasType::Oxygen),
            "nitrogen" => Some(GasType::Nitrogen),
            "carbon_dioxide" => Some(GasType::CarbonDioxide),
            "plasma" => Some(GasType::Plasma),
            "tritium" => Some(GasType::Tritium),
            "water_vapor" => Some(GasType::WaterVapor),
            "nitrous_oxide" => Some(GasType::NitrousOxide),
            "frezon" => Some(GasType::Frezon),
            "nitrium" => Some(GasType::Nitrium),
            "hydrogen" => Some(GasType::Hydrogen),
            "healium" => Some(GasType::Healium),
            "proto_nitrate" => Some(GasType::ProtoNitrate),
            "bz" => Some(GasType::BZ),
            "pluoxium" => Some(GasType::Pluoxium),
            _ => None,
        }
    }

    /// Specific heat in J/(mol·K), via the profile table.
    pub fn specific_heat(&self) -> f64 {
        get_profile(*self).specific_heat_j_mol_k
    }
}

#[derive(Debug, Clone)]
pub struct GasProfile {
    pub kind: GasType,
    pub display_name: &'static str,
    /// Specific heat in J/(mol·K)
    pub specific_heat_j_mol_k: f64,
}

/// Per-gas metadata, indexed by `GasType as usize`.
pub static GAS_PROFILES: [GasProfile; GAS_COUNT] = [
    GasProfile { kind: GasType::Oxygen, display_name: "Oxygen", specific_heat_j_mol_k: 20.0 },
    GasProfile { kind: GasType::Nitrogen, display_name: "Nitrogen", specific_heat_j_mol_k: 20.0 },
    GasProfile { kind: GasType::CarbonDioxide, display_name: "Carbon Dioxide", specific_heat_j_mol_k: 30.0 },
    GasProfile { kind: GasType::Plasma, display_name: "Plasma", specific_heat_j_mol_k: 200.0 },
    GasProfile { kind: GasType::Tritium, display_name: "Tritium", specific_heat_j_mol_k: 10.0 },
    GasProfile { kind: GasType::WaterVapor, display_name: "Water Vapor", specific_heat_j_mol_k: 40.0 },
    GasProfile { kind: GasType::NitrousOxide, display_name: "Nitrous Oxide", specific_heat_j_mol_k: 40.0 },
    GasProfile { kind: GasType::Frezon, display_name: "Frezon", specific_heat_j_mol_k: 600.0 },
    GasProfile { kind: GasType::Nitrium, display_name: "Nitrium", specific_heat_j_mol_k: 10.0 },
    GasProfile { kind: GasType::Hydrogen, display_name: "Hydrogen", specific_heat_j_mol_k: 15.0 },
    GasProfile { kind: GasType::Healium, display_name: "Healium", specific_heat_j_mol_k: 10.0 },
    GasProfile { kind: GasType::ProtoNitrate, display_name: "Proto-Nitrate", specific_heat_j_mol_k: 30.0 },
    GasProfile { kind: GasType::BZ, display_name: "BZ", specific_heat_j_mol_k: 20.0 },
    GasProfile { kind: GasType::Pluoxium, display_name: "Pluoxium", specific_heat_j_mol_k: 80.0 },
];

pub fn get_profile(gas: GasType) -> &'static GasProfile {
    &GAS_PROFILES[gas as usize]
}

/// Comma-separated catalogue of recognized gas names, for host UIs.
pub fn list_gases() -> String {
    ALL_GASES
        .iter()
        .map(|g| g.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma-separated gas list like `"plasma,tritium"`.
pub fn parse_gas_list(s: &str) -> Result<Vec<GasType>, String> {
    let mut gases = Vec::new();
    for part in s.split(',') {
        let name = part.trim();
        if name.is_empty() {
            continue;
        }
        match GasType::from_str(name) {
            Some(gas) => gases.push(gas),
            None => {
                return Err(format!(
                    "parse error: unknown gas '{}' (available: {})",
                    name,
                    list_gases()
                ))
            }
        }
    }
    Ok(gases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrip() {
        for gas in ALL_GASES {
            assert_eq!(GasType::from_str(gas.as_str()), Some(gas));
        }
    }

    #[test]
    fn test_profile_table_order_matches_enum() {
        for (i, gas) in ALL_GASES.iter().enumerate() {
            assert_eq!(GAS_PROFILES[i].kind, *gas);
            assert_eq!(*gas as usize, i);
        }
    }

    #[test]
    fn test_parse_gas_list() {
        let gases = parse_gas_list("plasma, tritium").unwrap();
        assert_eq!(gases, vec![GasType::Plasma, GasType::Tritium]);

        assert!(parse_gas_list("plasma,unobtainium").is_err());
    }

    #[test]
    fn test_specific_heats_positive() {
        for gas in ALL_GASES {
            assert!(gas.specific_heat() > 0.0);
        }
    }
}
