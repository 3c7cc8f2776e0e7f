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

//! Preprocessing of the base inequality: rescale by a power of two, drop
//! tiny coefficients (bound-substituting them into `rhs`), classify the
//! surviving variables, cancel excess length when the row is too long, and
//! compact.

use crate::implementation::row::WorkingRow;
use crate::Tolerances;

/// `frexp`-equivalent: decomposes `x` into `mantissa * 2^exponent` with
/// `mantissa` in `[0.5, 1)` (or `(-1, -0.5]` for negative `x`). `f64::frexp`
/// is not part of stable Rust, so this is done by hand through the IEEE-754
/// bit layout rather than via a less precise `ln`/`log2`-based computation.
pub(crate) fn frexp(x: f64) -> (f64, i32) {
    if x == 0.0 || !x.is_finite() {
        return (x, 0);
    }
    let bits = x.to_bits();
    let sign = bits & (1u64 << 63);
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let mantissa = bits & 0x000f_ffff_ffff_ffff;
    if exp_bits == 0 {
        // subnormal: scale up by 2^64 (exact) and recurse once.
        let (m, e) = frexp(x * 18446744073709551616.0_f64);
        return (m, e - 64);
    }
    let exponent = exp_bits - 1022;
    let frac_bits = sign | (1022u64 << 52) | mantissa;
    (f64::from_bits(frac_bits), exponent)
}

/// `ldexp`-equivalent: `x * 2^exp`, computed via an exact power-of-two
/// scale factor whenever the result stays within the normal double range.
pub(crate) fn ldexp(x: f64, exp: i32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let scale_bits: i64 = 1023 + exp as i64;
    if (1..=2046).contains(&scale_bits) {
        let scale = f64::from_bits((scale_bits as u64) << 52);
        x * scale
    } else {
        // Extreme exponent: split the scaling in two exact steps so we
        // never multiply by a subnormal/overflowing power of two directly.
        let half = exp / 2;
        ldexp(ldexp(x, half), exp - half)
    }
}

/// Cancellation slack of position `i`: how close `solval[i]` is to the
/// bound that would make dropping this coefficient free of any rhs
/// adjustment. Positive coefficients: `solval[i]`; negative: `upper[i] -
/// solval[i]`.
fn cancellation_slack(val: f64, upper: f64, solval: f64) -> f64 {
    if val >= 0.0 {
        solval
    } else {
        upper - solval
    }
}

/// Preprocesses `row` in place per the algorithm above. `num_cols` is the
/// total number of structural columns (used for the `maxLen` formula).
/// Returns `false` (row state undefined for further use by the caller
/// beyond inspecting flags) if the row is trivially redundant/infeasible
/// in the current space, or if tiny coefficients or excess length could
/// not be cancelled without an unbounded variable getting in the way.
pub fn preprocess(
    row: &mut WorkingRow,
    num_cols: usize,
    tol: Tolerances,
    max_len_base: usize,
    max_len_fraction: f64,
) -> bool {
    if row.is_empty() {
        tracing::debug!(reason = "empty_row", "preprocess rejected");
        return false;
    }

    // Step 1: rescale by a power of two so that maxAbs in [0.5, 1).
    let max_abs = row
        .vals
        .iter()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 {
        tracing::debug!(reason = "all_zero_coefficients", "preprocess rejected");
        return false;
    }
    let (_, e) = frexp(max_abs);
    if e != 0 {
        for v in row.vals.iter_mut() {
            *v = ldexp(*v, -e);
        }
        let rhs_value = row.rhs.value();
        row.rhs = crate::CompensatedSum::from_f64(ldexp(rhs_value, -e));
    }

    // Step 2: drop tiny coefficients, bound-substituting negative ones.
    let n = row.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        if row.vals[i].abs() <= tol.feastol {
            if row.vals[i] < 0.0 {
                if !row.upper[i].is_finite() {
                    tracing::debug!(reason = "cannot_cancel_tiny_term", col = i, "preprocess rejected");
                    return false;
                }
                row.rhs.sub(row.vals[i] * row.upper[i]);
            }
            keep[i] = false;
        }
    }

    // Step 3: classify and accumulate maxact over the surviving positions.
    let mut has_unbounded_ints = false;
    let mut has_general_ints = false;
    let mut has_continuous = false;
    let mut maxact = crate::CompensatedSum::ZERO;
    let mut maxact_inf = false;
    for i in 0..n {
        if !keep[i] {
            continue;
        }
        if !row.integral[i] {
            has_continuous = true;
        } else if !row.upper[i].is_finite() {
            has_unbounded_ints = true;
            has_general_ints = true;
        } else if row.upper[i] != 1.0 {
            has_general_ints = true;
        }
        if row.vals[i] > 0.0 {
            if !row.upper[i].is_finite() {
                maxact_inf = true;
            } else {
                maxact.add(row.vals[i] * row.upper[i]);
            }
        }
    }

    // Step 4: cancel excess length.
    let max_len = max_len_base + ((max_len_fraction * num_cols as f64).floor() as usize);
    let survivors: Vec<usize> = (0..n).filter(|&i| keep[i]).collect();
    if survivors.len() > max_len {
        let k = survivors.len() - max_len;
        let mut candidates: Vec<usize> = survivors
            .iter()
            .copied()
            .filter(|&i| {
                cancellation_slack(row.vals[i], row.upper[i], row.solval[i]) <= tol.feastol
            })
            .collect();
        if candidates.len() < k {
            tracing::debug!(
                reason = "over_long_row_insufficient_cancellable_positions",
                needed = k,
                available = candidates.len(),
                "preprocess rejected"
            );
            return false;
        }
        candidates.sort_by(|&a, &b| {
            row.vals[a]
                .abs()
                .partial_cmp(&row.vals[b].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for &i in candidates.iter().take(k) {
            if row.vals[i] < 0.0 {
                if !row.upper[i].is_finite() {
                    tracing::debug!(reason = "cannot_cancel_tiny_term", col = i, "preprocess rejected");
                    return false;
                }
                row.rhs.sub(row.vals[i] * row.upper[i]);
            } else if !maxact_inf {
                maxact.sub(row.vals[i] * row.upper[i]);
            }
            keep[i] = false;
        }
    }

    // Step 5: compact and report.
    row.retain_mask(&keep);
    row.has_unbounded_ints = has_unbounded_ints;
    row.has_general_ints = has_general_ints;
    row.has_continuous = has_continuous;

    if maxact_inf {
        return true;
    }
    maxact.value() > row.rhs.value()
}
