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

use crate::Column;

/// This trait abstracts away the data every cut-generation call needs from
/// the owning MIP solver: the two tolerances of `spec.md` §3 and a handle on
/// the global/local variable domain.
pub trait MipData {
    /// The feasibility tolerance `ε_f`.
    fn feastol(&self) -> f64;
    /// The base epsilon `ε_0 <= ε_f`.
    fn epsilon(&self) -> f64;
    /// The domain (bound) collaborator.
    fn domain(&self) -> &dyn Domain;
    /// The debug-solution checker. Returns the no-op implementation when
    /// debugging is disabled (the common case).
    fn debug_solution(&self) -> &dyn super::DebugSolution;
}

/// This trait abstracts away the global/local variable domain: the bound
/// propagation collaborator that the cut-generation core only ever reads
/// from, or asks to tighten a finished cut's coefficients.
pub trait Domain {
    /// The (global, for conflicts: local) lower bound of `col`.
    fn col_lower(&self, col: Column) -> f64;
    /// The (global, for conflicts: local) upper bound of `col`, or
    /// `f64::INFINITY` when unbounded above.
    fn col_upper(&self, col: Column) -> f64;
    /// Attempts to tighten the coefficients of a finished cut `Σ vals_i x_i
    /// <= rhs` in place, using the domain's bound-strengthening logic.
    /// `rhs` is updated through the returned value.
    fn tighten_coefficients(&self, inds: &mut [Column], vals: &mut [f64], rhs: f64) -> f64;
}
