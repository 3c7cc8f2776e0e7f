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

//! Cover determination: selects the subset of integer-variable positions
//! whose combined upper-bound weight exceeds `rhs`, the starting point for
//! every lifted-cover procedure.

use compare::Compare;
use ordered_float::OrderedFloat;

use crate::implementation::hash::tiebreak_hash;
use crate::implementation::row::WorkingRow;
use crate::Tolerances;

/// Orders cover candidates by descending activity contribution
/// (`solval[j] * vals[j]`), then by descending `vals[j]`, then by the
/// deterministic tie-break hash of `(col, pool_size)` — the same
/// primary/secondary/tie-break chaining idiom used elsewhere in this crate
/// for ranking candidates by more than one key.
struct CoverOrder<'a> {
    row: &'a WorkingRow,
    pool_size: usize,
}

impl Compare<usize> for CoverOrder<'_> {
    fn compare(&self, &a: &usize, &b: &usize) -> std::cmp::Ordering {
        let act_a = self.row.solval[a] * self.row.vals[a];
        let act_b = self.row.solval[b] * self.row.vals[b];
        OrderedFloat(act_b)
            .cmp(&OrderedFloat(act_a))
            .then_with(|| OrderedFloat(self.row.vals[b]).cmp(&OrderedFloat(self.row.vals[a])))
            .then_with(|| {
                let col_a = self.row.inds[a].id();
                let col_b = self.row.inds[b].id();
                tiebreak_hash(col_b, self.pool_size).cmp(&tiebreak_hash(col_a, self.pool_size))
            })
    }
}

/// Determines a knapsack cover over the integer-variable positions of
/// `row`, filling `row.cover`, `row.coverweight` and `row.lambda`.
/// `lp_sol` selects the LP-separation variant (at-upper-bound positions are
/// seeded first) versus the conflict-path variant. `pool_size` feeds the
/// tie-break hash. Returns false if no valid cover exists.
pub fn determine_cover(row: &mut WorkingRow, tol: Tolerances, lp_sol: bool, pool_size: usize) -> bool {
    let rhs = row.rhs.value();
    if rhs <= 10.0 * tol.feastol {
        tracing::debug!(reason = "rhs_too_small", "determine_cover rejected");
        return false;
    }

    let n = row.len();
    let candidates: Vec<usize> = (0..n)
        .filter(|&j| row.integral[j] && row.solval[j] > tol.feastol)
        .collect();

    let mut at_upper = Vec::new();
    let mut remainder = Vec::new();
    if lp_sol {
        for &j in &candidates {
            if row.solval[j] >= row.upper[j] - tol.feastol {
                at_upper.push(j);
            } else {
                remainder.push(j);
            }
        }
    } else {
        remainder = candidates;
    }

    let order = CoverOrder { row, pool_size };
    remainder.sort_by(|a, b| order.compare(a, b));

    let mut cover: Vec<usize> = at_upper.into_iter().chain(remainder).collect();
    let min_lambda = (10.0 * tol.feastol).max(tol.feastol * rhs.abs());

    // Greedily trim the tail: keep adding until lambda exceeds min_lambda;
    // anything appended beyond that point is unnecessary and is trimmed.
    let mut accepted_len = None;
    let mut running = crate::CompensatedSum::ZERO;
    for (idx, &j) in cover.iter().enumerate() {
        running.add(row.vals[j] * row.upper[j]);
        let mut l = running;
        l.sub(rhs);
        if l.value() > min_lambda {
            accepted_len = Some(idx + 1);
            break;
        }
    }

    let len = match accepted_len {
        Some(len) => len,
        None => {
            tracing::debug!(reason = "no_valid_cover", "determine_cover rejected");
            return false;
        }
    };

    cover.truncate(len);
    let mut coverweight = crate::CompensatedSum::ZERO;
    for &j in &cover {
        coverweight.add(row.vals[j] * row.upper[j]);
    }
    coverweight.renormalize();
    let mut lambda = coverweight;
    lambda.sub(rhs);
    lambda.renormalize();

    if cover.is_empty() || lambda.value() <= min_lambda {
        tracing::debug!(reason = "no_valid_cover", "determine_cover rejected");
        return false;
    }

    row.cover = cover;
    row.coverweight = coverweight;
    row.lambda = lambda;
    true
}
