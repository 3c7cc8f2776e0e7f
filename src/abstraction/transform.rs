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

/// This trait abstracts away the LP-to-cut variable transform: bound
/// substitution and implicit slack elimination that rewrites an arbitrary
/// `Σ a_i x_i <= rhs` row into the complemented non-negative space the
/// lifting and c-MIR routines operate on, and back again.
pub trait TransformedLp {
    /// Rewrites `inds`/`vals`/`rhs` in place into the complemented
    /// non-negative space, filling `upper` (the working-space finite upper
    /// bound of each surviving column, or `f64::INFINITY`) and `solval` (the
    /// value of each column at the point being separated). `ints_positive`
    /// is set to true iff every integer column's coefficient is already
    /// non-negative in the returned space. Returns false if the row cannot
    /// be transformed (e.g. an implicit slack could not be eliminated).
    #[allow(clippy::too_many_arguments)]
    fn transform(
        &self,
        inds: &mut Vec<Column>,
        vals: &mut Vec<f64>,
        rhs: &mut f64,
        upper: &mut Vec<f64>,
        solval: &mut Vec<f64>,
        ints_positive: &mut bool,
    ) -> bool;

    /// Undoes `transform`, rewriting `inds`/`vals`/`rhs` back into the
    /// original variable space. `integral` hints whether the caller has
    /// established that every coefficient is (near-)integral, which some
    /// transforms use to pick an exact rational path. Returns false if the
    /// untransform could not be completed.
    fn untransform(
        &self,
        inds: &mut Vec<Column>,
        vals: &mut Vec<f64>,
        rhs: &mut f64,
        integral: bool,
    ) -> bool;
}
