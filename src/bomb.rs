// src/bomb.rs - Bomb data, restriction grammar, and the evaluator
//
// A bomb evaluation is a pure function of (parameter vector, args,
// config): assemble the mix and primer groups, merge them into a tank
// at the target temperature, run the tank to termination, and score one
// field of the outcome. Failed restrictions and numeric failures score
// as infeasible rather than erroring so one bad sample never aborts a
// search.

use crate::config::{current_config, SimConfig};
use crate::constants::DEFAULT_TICK_CAP;
use crate::gas::{get_profile, GasType};
use crate::math_utils::round_to_step;
use crate::mixture::GasMixture;
use crate::optimiser::{OptResult, Optimiser};
use crate::sim_log;
use crate::tank::{GasTank, TankState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The inspectable fields of a bomb result, as a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BombField {
    Radius,
    Ticks,
    FinPressure,
    FinTemperature,
    State,
    MixPressure,
    MixTemperature,
}

impl BombField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BombField::Radius => "radius",
            BombField::Ticks => "ticks",
            BombField::FinPressure => "fin_pressure",
            BombField::FinTemperature => "fin_temperature",
            BombField::State => "state",
            BombField::MixPressure => "mix_pressure",
            BombField::MixTemperature => "mix_temperature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "radius" => Some(BombField::Radius),
            "ticks" => Some(BombField::Ticks),
            "fin_pressure" => Some(BombField::FinPressure),
            "fin_temperature" => Some(BombField::FinTemperature),
            "state" => Some(BombField::State),
            "mix_pressure" => Some(BombField::MixPressure),
            "mix_temperature" => Some(BombField::MixTemperature),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictOp {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl RestrictOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictOp::Lt => "<",
            RestrictOp::Le => "<=",
            RestrictOp::Eq => "=",
            RestrictOp::Ge => ">=",
            RestrictOp::Gt => ">",
        }
    }

    pub fn test(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            RestrictOp::Lt => lhs < rhs,
            RestrictOp::Le => lhs <= rhs,
            RestrictOp::Eq => lhs == rhs,
            RestrictOp::Ge => lhs >= rhs,
            RestrictOp::Gt => lhs > rhs,
        }
    }
}

/// One arithmetic filter over a bomb-data field, e.g. `ticks<=30`.
/// A restriction list is a conjunction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRestriction {
    pub field: BombField,
    pub op: RestrictOp,
    pub value: f64,
}

impl FieldRestriction {
    /// Parse a single `field <op> value` clause.
    pub fn parse(s: &str) -> Result<FieldRestriction, String> {
        const OPS: [(&str, RestrictOp); 5] = [
            ("<=", RestrictOp::Le),
            (">=", RestrictOp::Ge),
            ("<", RestrictOp::Lt),
            (">", RestrictOp::Gt),
            ("=", RestrictOp::Eq),
        ];
        for (symbol, op) in OPS {
            if let Some(pos) = s.find(symbol) {
                let field_name = s[..pos].trim();
                let field = BombField::from_str(field_name)
                    .ok_or_else(|| format!("parse error: unknown field '{}'", field_name))?;
                let value_text = s[pos + symbol.len()..].trim();
                let value: f64 = value_text
                    .parse()
                    .map_err(|e| format!("parse error: bad value '{}': {}", value_text, e))?;
                return Ok(FieldRestriction { field, op, value });
            }
        }
        Err(format!("parse error: no comparison operator in '{}'", s))
    }

    pub fn passes(&self, data: &BombData) -> bool {
        self.op.test(data.field(self.field), self.value)
    }
}

/// Parse a comma-separated conjunction like `"radius>=10,ticks<30"`.
pub fn parse_restrictions(s: &str) -> Result<Vec<FieldRestriction>, String> {
    s.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(FieldRestriction::parse)
        .collect()
}

/// Everything the evaluator needs besides the parameter vector.
#[derive(Debug, Clone)]
pub struct BombArgs {
    pub mix_gases: Vec<GasType>,
    pub primer_gases: Vec<GasType>,
    pub measure_before: bool,
    pub round_pressure_to: f64,
    pub round_temp_to: f64,
    pub round_ratio_to: f64,
    pub tick_cap: usize,
    pub target: BombField,
    pub pre_restrictions: Vec<FieldRestriction>,
    pub post_restrictions: Vec<FieldRestriction>,
    pub log_level: usize,
}

impl BombArgs {
    /// Parameter vector length: three temperatures, the total pressure,
    /// and one ratio per extra gas in each group.
    pub fn dimension(&self) -> usize {
        4 + self.num_mix_ratios() + self.num_primer_ratios()
    }

    pub fn num_mix_ratios(&self) -> usize {
        self.mix_gases.len().saturating_sub(1)
    }

    pub fn num_primer_ratios(&self) -> usize {
        self.primer_gases.len().saturating_sub(1)
    }

    /// Per-coordinate rounding granularity, in parameter order.
    pub fn resolutions(&self) -> Vec<f64> {
        let mut res = vec![
            self.round_temp_to,
            self.round_temp_to,
            self.round_temp_to,
            self.round_pressure_to,
        ];
        res.extend(std::iter::repeat(self.round_ratio_to).take(
            self.num_mix_ratios() + self.num_primer_ratios(),
        ));
        res
    }

    /// Human-readable coordinate labels, in parameter order.
    pub fn param_labels(&self) -> Vec<String> {
        let mut labels = vec![
            "target_temp".to_string(),
            "mix_temp".to_string(),
            "primer_temp".to_string(),
            "pressure".to_string(),
        ];
        for gas in self.mix_gases.iter().skip(1) {
            labels.push(format!("mix_ratio_{}", gas.as_str()));
        }
        for gas in self.primer_gases.iter().skip(1) {
            labels.push(format!("primer_ratio_{}", gas.as_str()));
        }
        labels
    }

    /// Re-evaluation args for a stored bomb: same gas groups, default
    /// rounding and tick cap, no restrictions.
    pub fn for_data(data: &BombData) -> BombArgs {
        BombArgs {
            mix_gases: data.mix_gases.clone(),
            primer_gases: data.primer_gases.clone(),
            measure_before: false,
            round_pressure_to: 0.1,
            round_temp_to: 0.01,
            round_ratio_to: 0.001 * 0.01,
            tick_cap: DEFAULT_TICK_CAP,
            target: BombField::Radius,
            pre_restrictions: Vec::new(),
            post_restrictions: Vec::new(),
            log_level: 0,
        }
    }
}

/// Full record of one evaluated bomb: inputs, pre-sim snapshot, and the
/// simulated outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombData {
    pub params: Vec<f64>,
    pub mix_gases: Vec<GasType>,
    pub primer_gases: Vec<GasType>,
    pub pre_mix: GasMixture,
    pub target_temp: f64,
    pub total_pressure: f64,
    pub mix_pressure: f64,
    pub mix_temperature: f64,
    pub state: TankState,
    pub ticks: usize,
    pub fin_pressure: f64,
    pub fin_temperature: f64,
    pub fin_radius: f64,
}

impl BombData {
    pub fn field(&self, field: BombField) -> f64 {
        match field {
            BombField::Radius => self.fin_radius,
            BombField::Ticks => self.ticks as f64,
            BombField::FinPressure => self.fin_pressure,
            BombField::FinTemperature => self.fin_temperature,
            BombField::State => self.state.as_code(),
            BombField::MixPressure => self.mix_pressure,
            BombField::MixTemperature => self.mix_temperature,
        }
    }

    /// Printable interchange string; `deserialize` is the exact inverse.
    pub fn serialize(&self) -> String {
        serde_json::to_string(self).expect("bomb data serializes to JSON")
    }

    pub fn deserialize(s: &str) -> Result<BombData, String> {
        serde_json::from_str(s).map_err(|e| format!("parse error: bad bomb string: {}", e))
    }

    /// Rebuild a fresh intact tank around the pre-sim mixture.
    pub fn to_tank(&self) -> GasTank {
        GasTank::new(self.pre_mix.clone())
    }

    /// Multi-line human-readable report of this bomb.
    pub fn print_full(&self, cfg: &SimConfig) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Mix gases: {}\n",
            self.mix_gases
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        out.push_str(&format!(
            "Primer gases: {}\n",
            self.primer_gases
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        out.push_str(&format!("Initial mixture: {}\n", self.pre_mix.status_line(cfg)));
        out.push_str(&format!(
            "Target temp: {:.2} K | Fill pressure: {:.1} kPa\n",
            self.target_temp, self.total_pressure
        ));
        out.push_str(&format!(
            "Outcome: {} after {} ticks ({:.1} s) | {:.1} kPa | {:.2} K | radius {:.2}",
            self.state.as_str(),
            self.ticks,
            self.ticks as f64 * cfg.tickrate,
            self.fin_pressure,
            self.fin_temperature,
            self.fin_radius
        ));
        out
    }
}

/// Evaluation outcome handed to the optimizer. Infeasible evaluations
/// carry no score and sort after every scored sample.
#[derive(Debug, Clone)]
pub struct EvalResult {
    pub score: Option<f64>,
    pub data: Option<Box<BombData>>,
}

impl EvalResult {
    pub fn infeasible() -> Self {
        EvalResult { score: None, data: None }
    }
}

impl OptResult for EvalResult {
    fn score(&self) -> Option<f64> {
        self.score
    }
}

/// Normalized gas fractions within one group: the first gas has weight
/// 1, each further gas 2^ratio, projected onto the simplex.
fn group_fractions(gases: &[GasType], ratios: &[f64]) -> Vec<f64> {
    let mut weights = Vec::with_capacity(gases.len());
    weights.push(1.0);
    for r in ratios {
        weights.push(r.exp2());
    }
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Mean molar heat capacity of a gas group, J/(mol·K).
fn group_molar_heat(gases: &[GasType], fractions: &[f64]) -> f64 {
    gases
        .iter()
        .zip(fractions)
        .map(|(g, f)| f * get_profile(*g).specific_heat_j_mol_k)
        .sum()
}

/// Fraction of the fill pressure carried by the mix group, solved so the
/// merged tank lands exactly on the target temperature. Returns None
/// when the target does not lie between the two group temperatures.
fn solve_pressure_split(
    mix_heat: f64,
    primer_heat: f64,
    mix_temp: f64,
    primer_temp: f64,
    target_temp: f64,
) -> Option<f64> {
    let d_mix = mix_temp - target_temp;
    let d_primer = target_temp - primer_temp;
    if d_mix.abs() < 1e-9 && d_primer.abs() < 1e-9 {
        return Some(0.5);
    }
    let numerator = primer_heat * d_primer / primer_temp;
    let denominator = mix_heat * d_mix / mix_temp;
    if numerator <= 0.0 || denominator <= 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    if !ratio.is_finite() {
        return None;
    }
    Some(ratio / (1.0 + ratio))
}

/// The objective function: one full bomb evaluation.
pub fn do_sim(params: &[f64], args: &BombArgs, cfg: &SimConfig) -> EvalResult {
    // A mixture cannot be constructed from an empty group.
    if args.mix_gases.is_empty() || args.primer_gases.is_empty() {
        return EvalResult::infeasible();
    }
    if params.len() != args.dimension() {
        sim_log::warn(
            args.log_level,
            &format!(
                "parameter vector has {} coordinates, expected {}",
                params.len(),
                args.dimension()
            ),
        );
        return EvalResult::infeasible();
    }

    let target_temp = round_to_step(params[0], args.round_temp_to);
    let mix_temp = round_to_step(params[1], args.round_temp_to);
    let primer_temp = round_to_step(params[2], args.round_temp_to);
    let total_pressure = round_to_step(params[3], args.round_pressure_to);

    if total_pressure <= 0.0
        || target_temp < cfg.tcmb
        || mix_temp < cfg.tcmb
        || primer_temp < cfg.tcmb
    {
        return EvalResult::infeasible();
    }

    let n_mix = args.num_mix_ratios();
    let mix_ratios: Vec<f64> = params[4..4 + n_mix]
        .iter()
        .map(|r| round_to_step(*r, args.round_ratio_to))
        .collect();
    let primer_ratios: Vec<f64> = params[4 + n_mix..]
        .iter()
        .map(|r| round_to_step(*r, args.round_ratio_to))
        .collect();

    let mix_fractions = group_fractions(&args.mix_gases, &mix_ratios);
    let primer_fractions = group_fractions(&args.primer_gases, &primer_ratios);
    let mix_heat = group_molar_heat(&args.mix_gases, &mix_fractions);
    let primer_heat = group_molar_heat(&args.primer_gases, &primer_fractions);

    let mix_share = match solve_pressure_split(
        mix_heat,
        primer_heat,
        mix_temp,
        primer_temp,
        target_temp,
    ) {
        Some(share) => share,
        None => return EvalResult::infeasible(),
    };

    // Moles per group from the ideal gas law at each group's fill
    // temperature, split across the group by the simplex fractions.
    let volume = cfg.tank_volume;
    let mix_moles = mix_share * total_pressure * volume / (cfg.r * mix_temp);
    let primer_moles = (1.0 - mix_share) * total_pressure * volume / (cfg.r * primer_temp);

    let mut mix = GasMixture::new(volume, mix_temp, cfg);
    for (gas, fraction) in args.mix_gases.iter().zip(&mix_fractions) {
        mix.set_moles(*gas, mix_moles * fraction);
    }
    let mut primer = GasMixture::new(volume, primer_temp, cfg);
    for (gas, fraction) in args.primer_gases.iter().zip(&primer_fractions) {
        primer.set_moles(*gas, primer_moles * fraction);
    }

    mix.merge(&primer, cfg);
    let pre_mix = mix;

    let mut rounded_params = vec![target_temp, mix_temp, primer_temp, total_pressure];
    rounded_params.extend_from_slice(&mix_ratios);
    rounded_params.extend_from_slice(&primer_ratios);

    let mut data = BombData {
        params: rounded_params,
        mix_gases: args.mix_gases.clone(),
        primer_gases: args.primer_gases.clone(),
        pre_mix: pre_mix.clone(),
        target_temp,
        total_pressure,
        mix_pressure: pre_mix.pressure(cfg),
        mix_temperature: pre_mix.temperature(),
        state: TankState::Intact,
        ticks: 0,
        fin_pressure: pre_mix.pressure(cfg),
        fin_temperature: pre_mix.temperature(),
        fin_radius: 0.0,
    };

    if !args.pre_restrictions.iter().all(|r| r.passes(&data)) {
        return EvalResult::infeasible();
    }

    let mut tank = GasTank::new(pre_mix);
    let ticks = tank.tick_n(args.tick_cap, cfg);

    data.state = tank.state;
    if !args.measure_before {
        data.ticks = ticks;
        data.fin_pressure = tank.mix.pressure(cfg);
        data.fin_temperature = tank.mix.temperature();
        data.fin_radius = tank.calc_radius(cfg);
    }

    if !tank.mix.is_finite()
        || !data.fin_pressure.is_finite()
        || !data.fin_temperature.is_finite()
        || !data.fin_radius.is_finite()
    {
        sim_log::warn(args.log_level, "numeric failure in evaluation, discarding sample");
        return EvalResult::infeasible();
    }

    if !args.post_restrictions.iter().all(|r| r.passes(&data)) {
        return EvalResult::infeasible();
    }

    let score = data.field(args.target);
    EvalResult {
        score: Some(score),
        data: Some(Box::new(data)),
    }
}

/// Host-facing optimizer request, with the same defaults the original
/// calculator ships.
#[derive(Debug, Clone)]
pub struct OptimiseArgs {
    pub mix_gases: Vec<GasType>,
    pub primer_gases: Vec<GasType>,
    pub mix_temp_bounds: (f64, f64),
    pub primer_temp_bounds: (f64, f64),
    pub pressure_bounds: (f64, f64),
    pub lower_target_temp: f64,
    pub ratio_bound: f64,
    pub round_temp_to: f64,
    pub round_pressure_to: f64,
    /// Ratio granularity in percent, scaled down before evaluation.
    pub round_ratio_to: f64,
    pub target: BombField,
    pub maximise: bool,
    pub measure_before: bool,
    pub step_target_temp: bool,
    pub max_runtime_s: f64,
    pub sample_rounds: usize,
    pub bounds_scale: f64,
    pub n_threads: usize,
    pub tick_cap: usize,
    pub log_level: usize,
    pub seed: Option<u64>,
    pub pre_restrictions: Vec<FieldRestriction>,
    pub post_restrictions: Vec<FieldRestriction>,
}

impl Default for OptimiseArgs {
    fn default() -> Self {
        let cfg = current_config();
        OptimiseArgs {
            mix_gases: vec![GasType::Plasma, GasType::Tritium],
            primer_gases: vec![GasType::Oxygen],
            mix_temp_bounds: (375.15, 595.15),
            primer_temp_bounds: (293.15, 293.15),
            pressure_bounds: (cfg.pressure_cap, cfg.pressure_cap),
            lower_target_temp: cfg.plasma_fire_temp + 0.1,
            ratio_bound: 3.0,
            round_temp_to: 0.01,
            round_pressure_to: 0.1,
            round_ratio_to: 0.001,
            target: BombField::Radius,
            maximise: true,
            measure_before: false,
            step_target_temp: false,
            max_runtime_s: 3.0,
            sample_rounds: 5,
            bounds_scale: 0.5,
            n_threads: 1,
            tick_cap: DEFAULT_TICK_CAP,
            log_level: 2,
            seed: None,
            pre_restrictions: Vec::new(),
            post_restrictions: Vec::new(),
        }
    }
}

/// Run the optimizer against the current configuration and return the
/// best bomb found, if any sample was feasible.
pub fn optimise(args: &OptimiseArgs) -> Result<Option<BombData>, String> {
    if args.mix_gases.is_empty() || args.primer_gases.is_empty() {
        return Err("config error: no mix or primer gases defined".to_string());
    }
    let cfg = current_config();

    let bomb_args = BombArgs {
        mix_gases: args.mix_gases.clone(),
        primer_gases: args.primer_gases.clone(),
        measure_before: args.measure_before,
        round_pressure_to: args.round_pressure_to,
        round_temp_to: args.round_temp_to,
        round_ratio_to: args.round_ratio_to * 0.01,
        tick_cap: args.tick_cap,
        target: args.target,
        pre_restrictions: args.pre_restrictions.clone(),
        post_restrictions: args.post_restrictions.clone(),
        log_level: args.log_level,
    };

    let mut lower = vec![
        args.mix_temp_bounds.0.min(args.primer_temp_bounds.0),
        args.mix_temp_bounds.0,
        args.primer_temp_bounds.0,
        args.pressure_bounds.0,
    ];
    lower[0] = lower[0].max(args.lower_target_temp);

    let mut upper = vec![
        args.mix_temp_bounds.1.max(args.primer_temp_bounds.1),
        args.mix_temp_bounds.1,
        args.primer_temp_bounds.1,
        args.pressure_bounds.1,
    ];
    if !args.step_target_temp {
        // Fixed target temperature: the first coordinate collapses.
        upper[0] = lower[0];
    }

    let num_ratios = bomb_args.num_mix_ratios() + bomb_args.num_primer_ratios();
    for _ in 0..num_ratios {
        lower.push(-args.ratio_bound);
        upper.push(args.ratio_bound);
    }

    let resolutions = bomb_args.resolutions();
    let cfg_for_eval = cfg.clone();
    let objective = move |p: &[f64]| do_sim(p, &bomb_args, &cfg_for_eval);

    let mut optim = Optimiser::new(objective, lower, upper, args.maximise);
    optim.max_runtime = Duration::from_secs_f64(args.max_runtime_s.max(0.0));
    optim.sample_rounds = args.sample_rounds.max(1);
    optim.bounds_scale = args.bounds_scale;
    optim.n_threads = args.n_threads.max(1);
    optim.log_level = args.log_level;
    optim.seed = args.seed;
    optim.resolution = resolutions;

    let best = optim.find_best()?;
    Ok(best.and_then(|b| b.result.data.map(|boxed| *boxed)))
}

/// Tick-by-tick trace of a serialized bomb, for the simulation tool.
#[derive(Debug, Clone)]
pub struct TickTrace {
    pub lines: Vec<String>,
    pub final_state: TankState,
    pub final_status: String,
    pub radius: f64,
}

impl fmt::Display for TickTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        write!(
            f,
            "\nFinal Result:\n  Status: {}\n  State: {}\n  Radius: {:.2}",
            self.final_status,
            self.final_state.as_str(),
            self.radius
        )
    }
}

/// Re-run a serialized bomb tick by tick until it settles, goes
/// terminal, or hits the default tick cap.
pub fn simulate(serialized: &str) -> Result<TickTrace, String> {
    let cfg = current_config();
    let data = BombData::deserialize(serialized)?;
    let mut tank = data.to_tank();

    let mut lines = Vec::new();
    let mut tick = 1usize;
    loop {
        lines.push(format!("[Tick {:<2}] Tank status: {}", tick, tank.get_status(&cfg)));
        let fired = tank.tick(&cfg);
        // Pressure transitions keep a quiet tank interesting: only stop
        // once nothing reacts and nothing is leaking or straining.
        let active = fired || tank.mix.pressure(&cfg) >= cfg.tank_leak_pressure;
        if !active || tank.state != TankState::Intact || tick >= DEFAULT_TICK_CAP {
            break;
        }
        tick += 1;
    }

    Ok(TickTrace {
        final_status: tank.get_status(&cfg),
        final_state: tank.state,
        radius: tank.calc_radius(&cfg),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use approx::assert_abs_diff_eq;
    use more_asserts::assert_ge;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    fn plasma_oxygen_args() -> BombArgs {
        BombArgs {
            mix_gases: vec![GasType::Plasma],
            primer_gases: vec![GasType::Oxygen],
            measure_before: false,
            round_pressure_to: 0.1,
            round_temp_to: 0.01,
            round_ratio_to: 0.001 * 0.01,
            tick_cap: 100,
            target: BombField::Radius,
            pre_restrictions: Vec::new(),
            post_restrictions: Vec::new(),
            log_level: 0,
        }
    }

    #[test]
    fn test_restriction_parsing() {
        let r = FieldRestriction::parse("radius>=10").unwrap();
        assert_eq!(r.field, BombField::Radius);
        assert_eq!(r.op, RestrictOp::Ge);
        assert_abs_diff_eq!(r.value, 10.0, epsilon = 1e-12);

        let list = parse_restrictions("ticks<30, fin_pressure>500").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].op, RestrictOp::Lt);
        assert_eq!(list[1].field, BombField::FinPressure);

        assert!(parse_restrictions("bogus>=1").is_err());
        assert!(parse_restrictions("radius~10").is_err());
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in [
            BombField::Radius,
            BombField::Ticks,
            BombField::FinPressure,
            BombField::FinTemperature,
            BombField::State,
            BombField::MixPressure,
            BombField::MixTemperature,
        ] {
            assert_eq!(BombField::from_str(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_group_fractions_simplex() {
        let fractions = group_fractions(
            &[GasType::Plasma, GasType::Tritium, GasType::Oxygen],
            &[1.0, -1.0],
        );
        let total: f64 = fractions.iter().sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        // Weights are 1, 2, 0.5
        assert_abs_diff_eq!(fractions[1] / fractions[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fractions[2] / fractions[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pressure_split_equal_temps_is_half() {
        let share = solve_pressure_split(200.0, 20.0, 500.0, 500.0, 500.0).unwrap();
        assert_abs_diff_eq!(share, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pressure_split_hits_target_temperature() {
        let cfg = cfg();
        let args = plasma_oxygen_args();
        // Hot plasma, room-temperature oxygen, target in between
        let result = do_sim(&[500.0, 595.15, 293.15, 1013.25], &args, &cfg);
        let data = result.data.expect("feasible");
        assert_abs_diff_eq!(data.mix_temperature, 500.0, epsilon = 0.5);
    }

    #[test]
    fn test_unreachable_target_is_infeasible() {
        let cfg = cfg();
        let args = plasma_oxygen_args();
        // Target above both group temperatures
        let result = do_sim(&[800.0, 500.0, 293.15, 1013.25], &args, &cfg);
        assert!(result.score.is_none());
        assert!(result.data.is_none());
    }

    #[test]
    fn test_plasma_bomb_ignites_and_scores() {
        let cfg = cfg();
        let args = plasma_oxygen_args();
        let result = do_sim(&[500.0, 500.0, 500.0, 1013.25], &args, &cfg);
        let score = result.score.expect("feasible");
        assert_ge!(score, 0.0);
        let data = result.data.unwrap();
        assert_ge!(data.ticks, 1);
        // The fire consumed fuel
        assert!(data.fin_temperature > 500.0 || data.state != TankState::Intact);
    }

    #[test]
    fn test_pre_restriction_rejects() {
        let cfg = cfg();
        let mut args = plasma_oxygen_args();
        args.pre_restrictions = vec![FieldRestriction {
            field: BombField::MixPressure,
            op: RestrictOp::Gt,
            value: 1e6,
        }];
        let result = do_sim(&[500.0, 500.0, 500.0, 1013.25], &args, &cfg);
        assert!(result.score.is_none());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let cfg = cfg();
        let args = plasma_oxygen_args();
        let result = do_sim(&[500.0, 500.0, 500.0, 1013.25], &args, &cfg);
        let data = *result.data.unwrap();
        let restored = BombData::deserialize(&data.serialize()).unwrap();
        assert_eq!(data, restored);
    }

    #[test]
    fn test_measure_before_freezes_outcome_fields() {
        let cfg = cfg();
        let mut args = plasma_oxygen_args();
        args.measure_before = true;
        args.target = BombField::FinPressure;
        let result = do_sim(&[500.0, 500.0, 500.0, 1013.25], &args, &cfg);
        let data = result.data.unwrap();
        assert_eq!(data.ticks, 0);
        assert_abs_diff_eq!(data.fin_pressure, data.mix_pressure, epsilon = 1e-9);
    }
}
