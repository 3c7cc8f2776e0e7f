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

//! The mutable working inequality every pipeline stage reads from and
//! writes to. A single `WorkingRow` is owned by the `CutEngine` and reset
//! (not reallocated) at the start of every `generate_cut`/`generate_conflict`
//! call, so that repeated separation calls do not pay for fresh heap
//! allocations of their scratch buffers.

use crate::{Column, CompensatedSum};

/// The working inequality `Σ vals_i x_i <= rhs` together with the per-column
/// bookkeeping (`upper`, `solval`, `complementation`, `integral`) and the
/// cover-related auxiliary state computed once a cover has been determined.
#[derive(Debug, Default)]
pub struct WorkingRow {
    /// Column indices, unique within a call.
    pub inds: Vec<Column>,
    /// Coefficients in the working (possibly complemented, possibly scaled)
    /// space.
    pub vals: Vec<f64>,
    /// Finite upper bound of each variable in the working space, or
    /// `f64::INFINITY`.
    pub upper: Vec<f64>,
    /// Value of each variable at the point being separated.
    pub solval: Vec<f64>,
    /// Per-variable complementation bit: `true` iff `x` was replaced by
    /// `u - x`.
    pub complementation: Vec<bool>,
    /// Per-variable integrality, as reported by the LP relaxation at load
    /// time (column identity is unaffected by complementation).
    pub integral: Vec<bool>,
    /// Right-hand side, held in a compensated accumulator.
    pub rhs: CompensatedSum,

    /// Positions (into `inds`/`vals`/...) that form the chosen cover.
    pub cover: Vec<usize>,
    /// `Σ_{j in cover} vals[j] * upper[j]`.
    pub coverweight: CompensatedSum,
    /// `coverweight - rhs`, strictly positive for a valid cover.
    pub lambda: CompensatedSum,

    /// Set by the preprocessing stage.
    pub has_unbounded_ints: bool,
    /// Set by the preprocessing stage.
    pub has_general_ints: bool,
    /// Set by the preprocessing stage.
    pub has_continuous: bool,

    /// Advertised by the lifting/c-MIR stage: no continuous variable
    /// survived with a non-zero coefficient.
    pub integral_support: bool,
    /// Advertised by the postprocessing stage.
    pub integral_coefficients: bool,
}

impl WorkingRow {
    /// A fresh, empty working row.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of surviving positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.inds.len()
    }

    /// True iff no position survives.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inds.is_empty()
    }

    /// Clears every buffer (without shrinking capacity) and resets the
    /// scalar state. Called at the top of every pipeline entry point.
    pub fn reset(&mut self) {
        self.inds.clear();
        self.vals.clear();
        self.upper.clear();
        self.solval.clear();
        self.complementation.clear();
        self.integral.clear();
        self.rhs = CompensatedSum::ZERO;
        self.cover.clear();
        self.coverweight = CompensatedSum::ZERO;
        self.lambda = CompensatedSum::ZERO;
        self.has_unbounded_ints = false;
        self.has_general_ints = false;
        self.has_continuous = false;
        self.integral_support = false;
        self.integral_coefficients = false;
    }

    /// Loads a fresh working inequality, reusing this row's buffers.
    /// `integral[i]` must report whether `inds[i]` is an integer column.
    pub fn load(
        &mut self,
        inds: &[Column],
        vals: &[f64],
        rhs: f64,
        upper: &[f64],
        solval: &[f64],
        integral: &[bool],
    ) {
        self.reset();
        self.inds.extend_from_slice(inds);
        self.vals.extend_from_slice(vals);
        self.upper.extend_from_slice(upper);
        self.solval.extend_from_slice(solval);
        self.integral.extend_from_slice(integral);
        self.complementation.resize(inds.len(), false);
        self.rhs = CompensatedSum::from_f64(rhs);
    }

    /// Complements position `i`: replaces `x` by `u - x`, negating its
    /// coefficient and adjusting `rhs` by `vals[i] * upper[i]`. Returns
    /// false (leaving the row untouched) if `upper[i]` is infinite, since
    /// an unbounded variable cannot be complemented.
    ///
    /// Applying this twice in a row to the same position is an exact
    /// involution: `vals[i]`, `solval[i]` and `rhs` return to their
    /// original values (modulo the accumulator's `renormalize`).
    pub fn complement_at(&mut self, i: usize) -> bool {
        let u = self.upper[i];
        if !u.is_finite() {
            return false;
        }
        let old_val = self.vals[i];
        self.rhs.sub(old_val * u);
        self.vals[i] = -old_val;
        self.solval[i] = u - self.solval[i];
        self.complementation[i] = !self.complementation[i];
        true
    }

    /// Compacts the row in place, keeping exactly the positions for which
    /// `keep[r]` is true. Relative order of kept positions is preserved.
    pub fn retain_mask(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.inds.len());
        let mut w = 0;
        for r in 0..keep.len() {
            if keep[r] {
                if w != r {
                    self.inds.swap(w, r);
                    self.vals.swap(w, r);
                    self.upper.swap(w, r);
                    self.solval.swap(w, r);
                    self.complementation.swap(w, r);
                    self.integral.swap(w, r);
                }
                w += 1;
            }
        }
        self.inds.truncate(w);
        self.vals.truncate(w);
        self.upper.truncate(w);
        self.solval.truncate(w);
        self.complementation.truncate(w);
        self.integral.truncate(w);
    }

    /// Copies the current `inds`/`vals`/`rhs` out into caller-owned buffers,
    /// in the working-row's current variable space (i.e. before
    /// untransform). Used by the pipeline's final step.
    pub fn write_row(&self, inds: &mut Vec<Column>, vals: &mut Vec<f64>, rhs: &mut f64) {
        inds.clear();
        inds.extend_from_slice(&self.inds);
        vals.clear();
        vals.extend_from_slice(&self.vals);
        *rhs = self.rhs.value();
    }
}
