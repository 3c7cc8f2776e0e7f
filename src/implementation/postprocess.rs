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

//! Postprocessing of a finished cut (`spec.md` §4.7): rescale to
//! (near-)integral coefficients whenever the support allows it, otherwise
//! normalize by binary exponent; in both cases drop residual tiny
//! coefficients conservatively (bound-substituting negatives into `rhs`).

use crate::implementation::preprocess::{frexp, ldexp};
use crate::implementation::row::WorkingRow;
use crate::{CompensatedSum, Tolerances};

/// Upper bound on the denominator searched while looking for an integral
/// scale. Kept small so the search stays within the bounded-time contract
/// of `spec.md` §5; coefficients produced by the lifting/c-MIR stages are
/// combinations of a handful of cover weights and rarely need a larger one
/// to become exactly representable.
const MAX_DENOMINATOR: u64 = 1000;

/// Greatest common divisor of two non-negative integers.
fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Drops every coefficient with `|vals[i]| < threshold`, bound-substituting
/// negative ones into `rhs`. Returns false if a negative coefficient below
/// the threshold belongs to an unbounded variable (cannot be dropped
/// without losing validity).
fn drop_tiny(row: &mut WorkingRow, threshold: f64) -> bool {
    let n = row.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        if row.vals[i].abs() < threshold {
            if row.vals[i] < 0.0 {
                if !row.upper[i].is_finite() {
                    tracing::debug!(reason = "postprocess_cannot_drop_unbounded", col = i, "postprocess rejected");
                    return false;
                }
                row.rhs.sub(row.vals[i] * row.upper[i]);
            }
            keep[i] = false;
        }
    }
    row.retain_mask(&keep);
    true
}

/// Smallest `d <= MAX_DENOMINATOR` such that `d*v` is within `feastol` of an
/// integer, or `None` if no such `d` exists within the bound.
fn minimal_denominator(v: f64, feastol: f64) -> Option<u64> {
    for d in 1..=MAX_DENOMINATOR {
        let scaled = v * d as f64;
        if (scaled - scaled.round()).abs() <= feastol {
            return Some(d);
        }
    }
    None
}

/// Searches for a scalar `s` such that every nonzero `vals[i]` becomes
/// (near-)integral once multiplied by `s`, and `s * max(1, maxAbs) <=
/// 2^53`. First finds a common denominator `D` across all coefficients
/// (via each coefficient's own minimal denominator, combined through a
/// capped LCM), then divides `D` by the GCD of the resulting integers so
/// that already-integral-but-non-primitive coefficients (e.g. all even)
/// are reduced to their primitive form rather than left needlessly large.
fn find_integral_scale(vals: &[f64], max_abs: f64, tol: Tolerances) -> Option<f64> {
    let cap = (1u64 << 53) as f64 / max_abs.max(1.0);

    let mut d: u64 = 1;
    for &v in vals {
        if v == 0.0 {
            continue;
        }
        let dv = minimal_denominator(v, tol.feastol)?;
        let g = gcd(d, dv);
        let candidate = (d / g).checked_mul(dv)?;
        if candidate as f64 > cap {
            return None;
        }
        d = candidate;
    }

    let mut g = 0u64;
    for &v in vals {
        if v == 0.0 {
            continue;
        }
        let scaled = (v * d as f64).round();
        let as_int = scaled.unsigned_abs() as u64;
        g = gcd(g, as_int);
    }
    if g == 0 {
        return Some(1.0);
    }
    Some(d as f64 / g as f64)
}

/// Postprocesses `row` in place per `spec.md` §4.7. Requires
/// `row.integral_support` to already be set by the routing stage (c-MIR or
/// one of the three lifted-cover procedures). Returns false if a tiny
/// coefficient could not be dropped without an unbounded variable getting
/// in the way.
pub fn postprocess(row: &mut WorkingRow, tol: Tolerances) -> bool {
    let max_abs = row.vals.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 {
        row.integral_coefficients = row.integral_support;
        return true;
    }

    if row.integral_support {
        let threshold = (max_abs * 100.0 * tol.feastol).max(tol.epsilon);
        if !drop_tiny(row, threshold) {
            return false;
        }
        let max_abs = row.vals.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if max_abs == 0.0 {
            row.integral_coefficients = true;
            return true;
        }

        if let Some(s) = find_integral_scale(&row.vals, max_abs, tol) {
            // Work entirely in the scaled space so that the `delta`
            // compensation below and `rhs` stay in the same units.
            let mut new_rhs = row.rhs.mul(s);
            for i in 0..row.len() {
                let scaled = s * row.vals[i];
                let rounded = scaled.round();
                let delta = rounded - scaled;
                if delta < 0.0 {
                    if !row.upper[i].is_finite() {
                        tracing::debug!(reason = "postprocess_cannot_drop_unbounded", col = i, "postprocess rejected");
                        return false;
                    }
                    new_rhs.sub(delta * row.upper[i]);
                }
                row.vals[i] = rounded;
            }
            new_rhs = CompensatedSum::from_f64((new_rhs.value() + tol.epsilon).floor());
            row.rhs = new_rhs;
            row.integral_coefficients = s * max_abs * tol.feastol <= 1.0;
        } else {
            let (_, e) = frexp(max_abs);
            if e != 0 {
                for v in row.vals.iter_mut() {
                    *v = ldexp(*v, -e);
                }
                let rhs_value = row.rhs.value();
                row.rhs = CompensatedSum::from_f64(ldexp(rhs_value, -e));
            }
            row.integral_coefficients = false;
        }
    } else {
        let (_, e) = frexp(max_abs);
        if e != 0 {
            for v in row.vals.iter_mut() {
                *v = ldexp(*v, -e);
            }
            let rhs_value = row.rhs.value();
            row.rhs = CompensatedSum::from_f64(ldexp(rhs_value, -e));
        }
        let max_abs = row.vals.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let threshold = (max_abs * 100.0 * tol.feastol).max(tol.epsilon);
        if !drop_tiny(row, threshold) {
            return false;
        }
        row.integral_coefficients = false;
    }

    true
}
