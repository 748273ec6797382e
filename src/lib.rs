pub mod constants;
pub mod math_utils;
pub mod sim_log;
pub mod gas;
pub mod config;
pub mod mixture;
pub mod reactions;
pub mod tank;
pub mod bomb;
pub mod optimiser;
pub mod tolerance;

// Host contract surface
pub use bomb::{
    optimise, parse_restrictions, simulate, BombData, BombField, FieldRestriction, OptimiseArgs,
    TickTrace,
};
pub use config::{current_config, set_config, SimConfig};
pub use gas::{list_gases, parse_gas_list, GasType};
pub use mixture::{mixing_ratio, GasMixture};
pub use optimiser::{interrupt, is_interrupted, reset_interrupt};
pub use tank::{GasTank, TankState};
pub use tolerance::{measure_tolerances, ToleranceReport};
