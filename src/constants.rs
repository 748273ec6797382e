// Fixed numeric constants. Everything tunable lives in config::SimConfig;
// these are properties of the tank hardware and the tooling itself.

/// Decimal digits kept when rendering temperatures (K) in status lines.
pub const ROUND_TEMP_DIGITS: usize = 2;
/// Decimal digits kept when rendering pressures (kPa) in status lines.
pub const ROUND_PRESSURE_DIGITS: usize = 1;

/// Consecutive over-pressure ticks a tank survives before it ruptures.
pub const TANK_RUPTURE_TICKS: u32 = 3;
/// Fraction of every gas vented to vacuum per tick while a tank leaks.
pub const TANK_LEAK_RATIO: f64 = 0.25;

/// Tick cap used by the host-contract entry points when none is supplied.
pub const DEFAULT_TICK_CAP: usize = 600;

/// Uniform samples drawn per dimension, per sample round, in one optimizer batch.
pub const SAMPLES_PER_DIM: usize = 8;

/// Cap on how far a single tolerance walk may step away from the input value.
pub const TOLERANCE_MAX_STEPS: usize = 1000;
