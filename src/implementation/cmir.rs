// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The complemented mixed-integer-rounding heuristic (`spec.md` §4.6), used
//! whenever at least one integer variable survived preprocessing unbounded
//! (the lifted-cover procedures require every integer to be finitely
//! bounded). Searches a small deduplicated set of candidate divisors `δ`
//! for the MIR formula that maximizes efficacy, then refines the winner by
//! doubling and by flipping the complementation of individual bounded
//! integers.

use crate::implementation::row::WorkingRow;
use crate::Tolerances;

/// The divisor-search bounds and dynamism cutoff of `spec.md` §9's Open
/// Question, carried on `CutEngineConfig` rather than hard-coded.
#[derive(Copy, Clone, Debug)]
pub struct CMirConfig {
    pub delta_min: f64,
    pub delta_max: f64,
    pub max_dynamism: f64,
}

/// A candidate cut produced by evaluating one divisor `δ` against the
/// row's current (possibly already complemented) coefficients.
struct Candidate {
    vals: Vec<f64>,
    rhs: f64,
    efficacy: f64,
}

/// `f0 = frac(rhs / delta)`, plus the acceptance test of step 3: `f0` must
/// land strictly inside `[0.01, 0.99]` and `1 / ((1 - f0) * delta)` must
/// not exceed `max_dynamism`.
fn f0_of(rhs: f64, delta: f64, max_dynamism: f64) -> Option<f64> {
    let ratio = rhs / delta;
    let f0 = ratio - ratio.floor();
    if !(0.01..=0.99).contains(&f0) {
        return None;
    }
    if 1.0 / ((1.0 - f0) * delta) > max_dynamism {
        return None;
    }
    Some(f0)
}

/// Builds the MIR inequality for one divisor `delta` against `row`'s
/// current coefficients, without mutating `row`. Returns `None` if `delta`
/// fails the `f0`/dynamism acceptance test.
fn evaluate(row: &WorkingRow, delta: f64, tol: Tolerances, max_dynamism: f64) -> Option<Candidate> {
    let rhs = row.rhs.value();
    let f0 = f0_of(rhs, delta, max_dynamism)?;
    let new_rhs = rhs - f0 * delta;

    let n = row.len();
    let mut vals = vec![0.0_f64; n];
    for i in 0..n {
        let v = row.vals[i];
        if v.abs() <= tol.epsilon {
            continue;
        }
        if row.integral[i] {
            let ratio = v / delta;
            let base = ratio.floor();
            let fj = ratio - base;
            let extra = (fj - f0).max(0.0) / (1.0 - f0);
            vals[i] = delta * (base + extra);
        } else if v < 0.0 {
            // A negative continuous coefficient may be driven more
            // negative without loss of validity: for x_j >= 0, increasing
            // |coefficient| on a negative term only relaxes the row as
            // x_j grows. A positive continuous coefficient has no such
            // headroom (dividing it by (1 - f0) would tighten the row
            // along that variable), so it is dropped instead, the same
            // "zero the positive continuous contribution" rule the
            // lifted-cover procedures use.
            vals[i] = v / (1.0 - f0);
        }
    }

    let mut activity = 0.0_f64;
    let mut norm_sq = 0.0_f64;
    for i in 0..n {
        activity += vals[i] * row.solval[i];
        norm_sq += vals[i] * vals[i];
    }
    let violation = activity - new_rhs;
    if norm_sq <= 0.0 {
        return None;
    }
    let efficacy = violation / norm_sq.sqrt();

    Some(Candidate {
        vals,
        rhs: new_rhs,
        efficacy,
    })
}

/// Builds the deduplicated candidate divisor set of step 2: every `|vals[i]|`
/// of an integer with `solval > feastol` and magnitude in `[delta_min,
/// delta_max]`, plus `maxAbs + 1` (if it falls in range) and `1.0`.
fn candidate_deltas(row: &WorkingRow, tol: Tolerances, cfg: CMirConfig) -> Vec<f64> {
    let max_abs = row.vals.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let mut raw: Vec<f64> = row
        .inds
        .iter()
        .enumerate()
        .filter(|&(i, _)| row.integral[i] && row.solval[i] > tol.feastol)
        .map(|(i, _)| row.vals[i].abs())
        .filter(|&d| d >= cfg.delta_min && d <= cfg.delta_max)
        .collect();

    let plus_one = max_abs + 1.0;
    if plus_one >= cfg.delta_min && plus_one <= cfg.delta_max {
        raw.push(plus_one);
    }
    if 1.0 >= cfg.delta_min && 1.0 <= cfg.delta_max {
        raw.push(1.0);
    }

    raw.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mut deduped: Vec<f64> = Vec::with_capacity(raw.len());
    for d in raw {
        if deduped.last().map(|&last| (d - last).abs() > tol.feastol).unwrap_or(true) {
            deduped.push(d);
        }
    }
    deduped
}

/// Runs the full c-MIR heuristic of `spec.md` §4.6 over `row`, in place.
/// Requires `row.has_unbounded_ints` to be set (callers route here instead
/// of to the lifted-cover procedures exactly when that flag is set).
/// Returns false if no candidate divisor is acceptable.
pub fn apply_cmir(row: &mut WorkingRow, tol: Tolerances, cfg: CMirConfig) -> bool {
    // Step 1: complement integers closer to their upper bound than to zero.
    let n = row.len();
    for i in 0..n {
        if row.integral[i] && row.upper[i].is_finite() && row.upper[i] < 2.0 * row.solval[i] {
            row.complement_at(i);
        }
    }

    let deltas = candidate_deltas(row, tol, cfg);
    if deltas.is_empty() {
        tracing::debug!(reason = "cmir_no_candidate_delta", "c-MIR rejected");
        return false;
    }

    let mut best_delta = None;
    let mut best: Option<Candidate> = None;
    for delta in &deltas {
        if let Some(cand) = evaluate(row, *delta, tol, cfg.max_dynamism) {
            let improves = best.as_ref().map(|b| cand.efficacy > b.efficacy).unwrap_or(true);
            if improves {
                best_delta = Some(*delta);
                best = Some(cand);
            }
        }
    }

    let mut best_delta = match best_delta {
        Some(d) => d,
        None => {
            tracing::debug!(reason = "cmir_no_acceptable_delta", "c-MIR rejected");
            return false;
        }
    };

    // Step 4: try doubling the winning delta.
    for mult in [2.0, 4.0, 8.0] {
        let candidate_delta = best_delta * mult;
        if let Some(cand) = evaluate(row, candidate_delta, tol, cfg.max_dynamism) {
            if cand.efficacy > best.as_ref().unwrap().efficacy {
                best_delta = candidate_delta;
                best = Some(cand);
            }
        }
    }

    // Step 5: try flipping the complementation of each bounded integer.
    for i in 0..n {
        if !(row.integral[i] && row.upper[i].is_finite()) {
            continue;
        }
        if !row.complement_at(i) {
            continue;
        }
        let flipped = evaluate(row, best_delta, tol, cfg.max_dynamism);
        let keeps = match &flipped {
            Some(cand) => cand.efficacy > best.as_ref().unwrap().efficacy,
            None => false,
        };
        if keeps {
            best = flipped;
        } else {
            row.complement_at(i);
        }
    }

    let winner = best.unwrap();
    let mut integral_support = true;
    for i in 0..n {
        if !row.integral[i] && winner.vals[i].abs() > tol.epsilon {
            integral_support = false;
            break;
        }
    }
    row.vals = winner.vals;
    row.rhs = crate::CompensatedSum::from_f64(winner.rhs);
    row.integral_support = integral_support;
    true
}
