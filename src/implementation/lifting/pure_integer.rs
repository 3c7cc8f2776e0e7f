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

//! Pure integer knapsack cover lifting (`spec.md` §4.3): applies when every
//! non-cover variable is binary with `upper == 1` and no continuous
//! variable survived preprocessing.
//!
//! Cover members always settle at coefficient 1 -- that is the definition
//! of the base cover inequality `Σ_{j∈cover} x_j <= |cover| - 1`. Every
//! *non-cover* binary column is lifted in through the superadditive step
//! function `g`, built from the cover's own partial sums `S[]`. `g`
//! occasionally has to return a half-integer, exactly at the point where
//! the naive `z/ābar` rounding disagrees with the true cumulative count
//! found by walking `S[]`; that is why the whole row is doubled afterwards
//! whenever it happened even once.

use crate::implementation::row::WorkingRow;
use crate::{CompensatedSum, Tolerances};

/// Lifts the knapsack cover already stored in `row.cover` into a full
/// inequality over every surviving position. Requires `row.cover` to be
/// non-empty and `row.lambda` to already hold the cover excess. Returns
/// false if `ābar` degenerates to a non-positive or non-finite value.
pub fn lift_pure_integer_cover(row: &mut WorkingRow, tol: Tolerances) -> bool {
    if row.cover.is_empty() {
        return false;
    }
    let t = row.cover.len();
    row.cover.sort_by(|&a, &b| {
        row.vals[b]
            .partial_cmp(&row.vals[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let sigma = row.lambda.value();
    let rhs = row.rhs.value();
    let v0 = row.vals[row.cover[0]];

    let mut abar = None;
    let mut i = 1usize;
    while i < t {
        let lhs = i as f64 * (v0 - row.vals[row.cover[i]]);
        if lhs < sigma {
            i += 1;
        } else {
            abar = Some(row.vals[row.cover[i - 1]] - sigma / i as f64);
            break;
        }
    }
    let abar = abar.unwrap_or(rhs / t as f64);
    if !abar.is_finite() || abar <= 0.0 {
        tracing::debug!(reason = "pure_integer_lift_degenerate_abar", "lifting rejected");
        return false;
    }

    // Partial sums S[k] = sum_{j<=k} min(abar, vals[cover[j]]).
    let mut s = vec![0.0_f64; t];
    let mut running = CompensatedSum::ZERO;
    for k in 0..t {
        running.add(row.vals[row.cover[k]].min(abar));
        s[k] = running.value();
    }
    let c_plus_count = row
        .cover
        .iter()
        .filter(|&&j| row.vals[j] > abar + tol.epsilon)
        .count();

    // `g(z)`: how many `ābar`-sized chunks of cover capacity a weight `z`
    // consumes. `h0` is the naive round-to-nearest estimate; `h` is the
    // exact count found by walking the cumulative `S[]`. When `z` falls
    // short of the chunk boundary `h0` assumed, the superadditive envelope
    // is only valid half-way between the two candidate integers, and `g`
    // returns `h + 0.5` instead.
    let mut any_half = false;
    let mut g = |z: f64| -> f64 {
        let h0 = (z / abar + 0.5).floor();
        let mut h = (h0 as i64 - 1).max(0) as usize;
        while h < t && z > s[h] + tol.epsilon {
            h += 1;
        }
        let mut coef = 0.0_f64;
        if h0 >= 1.0
            && (h0 as usize) <= c_plus_count.saturating_sub(1)
            && (h as f64 - h0).abs() > tol.epsilon
        {
            coef = 0.5;
            any_half = true;
        }
        if h >= t {
            h = t - 1;
        }
        coef + h as f64
    };

    let is_cover = {
        let mut flags = vec![false; row.len()];
        for &j in &row.cover {
            flags[j] = true;
        }
        flags
    };
    for i in 0..row.len() {
        row.vals[i] = if is_cover[i] { 1.0 } else { g(row.vals[i]) };
    }

    let mut new_rhs = (t as f64) - 1.0;
    if any_half {
        for v in row.vals.iter_mut() {
            *v *= 2.0;
        }
        new_rhs *= 2.0;
    }
    row.rhs = CompensatedSum::from_f64(new_rhs);
    row.integral_support = true;
    true
}
