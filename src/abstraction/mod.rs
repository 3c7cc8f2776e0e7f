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

//! This module (and its submodules) provide the abstractions for the
//! external collaborators a `CutEngine` needs but does not own: the LP
//! relaxation being separated, the owning MIP solver's tolerances and
//! variable domain, the row transform/untransform step, the cut pool a
//! finished cut is submitted to, and the optional debug-solution checker.
//! A host wiring up a `CutEngine` must implement [`LpRelaxation`],
//! [`MipData`], [`Domain`], [`TransformedLp`] and [`CutPool`]; it may rely
//! on [`NoDebugSolution`] for [`DebugSolution`] unless it tracks one.

mod lp;
mod mip;
mod transform;
mod cutpool;
mod debug;

pub use lp::*;
pub use mip::*;
pub use transform::*;
pub use cutpool::*;
pub use debug::*;
