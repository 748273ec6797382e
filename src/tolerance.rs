// src/tolerance.rs - Tolerance measurement around a best result
//
// Walks each input coordinate outward, one rounding step at a time,
// until the re-evaluated score degrades past the tolerance fraction of
// the base score. The same evaluator drives both the search and this
// diagnostic.

use crate::bomb::{do_sim, BombArgs, BombData};
use crate::config::current_config;
use crate::constants::TOLERANCE_MAX_STEPS;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ToleranceInterval {
    pub label: String,
    pub value: f64,
    pub lo: f64,
    pub hi: f64,
}

#[derive(Debug, Clone)]
pub struct ToleranceReport {
    pub tol: f64,
    pub base_score: f64,
    pub intervals: Vec<ToleranceInterval>,
}

impl fmt::Display for ToleranceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x tolerances around score {:.4}:",
            self.tol, self.base_score
        )?;
        for interval in &self.intervals {
            writeln!(
                f,
                "  {:<24} {:>12.4}  [{:.4}, {:.4}]",
                interval.label, interval.value, interval.lo, interval.hi
            )?;
        }
        Ok(())
    }
}

/// Measure per-coordinate tolerance intervals for any scored objective.
/// `steps` gives the walk granularity per coordinate; zero-step
/// coordinates collapse to a point interval.
pub fn measure<F>(
    objective: &F,
    params: &[f64],
    steps: &[f64],
    labels: &[String],
    tol: f64,
    maximise: bool,
) -> Result<ToleranceReport, String>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if params.len() != steps.len() || params.len() != labels.len() {
        return Err("config error: mismatched tolerance inputs".to_string());
    }
    let base_score = objective(params)
        .ok_or_else(|| "config error: tolerance base point is infeasible".to_string())?;

    let threshold = if maximise {
        base_score * tol
    } else {
        base_score / tol
    };
    let degraded = |score: Option<f64>| match score {
        None => true,
        Some(s) => {
            if maximise {
                s < threshold
            } else {
                s > threshold
            }
        }
    };

    let mut intervals = Vec::with_capacity(params.len());
    for d in 0..params.len() {
        let step = steps[d].abs();
        let mut lo = params[d];
        let mut hi = params[d];
        if step > 0.0 {
            let mut probe = params.to_vec();
            for _ in 0..TOLERANCE_MAX_STEPS {
                probe[d] = hi + step;
                if degraded(objective(&probe)) {
                    break;
                }
                hi = probe[d];
            }
            for _ in 0..TOLERANCE_MAX_STEPS {
                probe[d] = lo - step;
                if degraded(objective(&probe)) {
                    break;
                }
                lo = probe[d];
            }
        }
        intervals.push(ToleranceInterval {
            label: labels[d].clone(),
            value: params[d],
            lo,
            hi,
        });
    }

    Ok(ToleranceReport {
        tol,
        base_score,
        intervals,
    })
}

/// Host contract: tolerance report for a serialized bomb, re-simulated
/// with its stored gas groups and the default evaluation settings. A
/// non-positive `tol` falls back to the configured default tolerance.
pub fn measure_tolerances(serialized: &str, tol: f64) -> Result<ToleranceReport, String> {
    let cfg = current_config();
    let tol = if tol > 0.0 { tol } else { cfg.default_tol };
    let data = BombData::deserialize(serialized)?;
    let args = BombArgs::for_data(&data);
    if data.params.len() != args.dimension() {
        return Err("parse error: bomb parameter vector does not match its gas groups".to_string());
    }

    let objective = |p: &[f64]| do_sim(p, &args, &cfg).score;
    measure(
        &objective,
        &data.params,
        &args.resolutions(),
        &args.param_labels(),
        tol,
        true,
    )
}
