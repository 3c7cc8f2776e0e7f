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

/// This trait abstracts away the (optional) debug-solution checker that a
/// host solver may wire in during development builds: a known feasible
/// solution that every cut produced along the way must not cut off. Hosts
/// that do not track a debug solution use [`NoDebugSolution`], the default
/// no-op implementation.
pub trait DebugSolution {
    /// Checks that the cut `Σ vals_i x_i <= rhs` does not separate the
    /// tracked debug solution. Implementations that have no debug solution
    /// loaded should simply return true.
    fn check_cut(&self, inds: &[Column], vals: &[f64], rhs: f64) -> bool;
}

/// The default, no-op [`DebugSolution`] used whenever a host has no debug
/// solution loaded. Always reports the cut as valid.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDebugSolution;

impl DebugSolution for NoDebugSolution {
    fn check_cut(&self, _inds: &[Column], _vals: &[f64], _rhs: f64) -> bool {
        true
    }
}
