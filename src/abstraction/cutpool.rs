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

/// This trait abstracts away the destination a finished cut is submitted to:
/// the host solver's cut pool, which owns deduplication against cuts already
/// known to it.
pub trait CutPool {
    /// Submits `Σ vals_i x_i <= rhs` to the pool. Returns the index the cut
    /// was stored under, or `None` if the pool rejected it (e.g. as a
    /// duplicate of an already-known cut).
    fn add_cut(&mut self, inds: &[Column], vals: &[f64], rhs: f64) -> Option<usize>;
    /// The number of cuts currently held by the pool.
    fn num_cuts(&self) -> usize;
}
