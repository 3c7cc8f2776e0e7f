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

//! The three superadditive lifted-cover procedures: pure integer knapsack,
//! mixed binary, and mixed integer. `CutEngine::generate_cut` picks exactly
//! one of these (or the c-MIR heuristic) per call, based on the booleans
//! [`crate::WorkingRow::has_continuous`] / [`crate::WorkingRow::has_general_ints`]
//! produced by preprocessing.

mod pure_integer;
mod mixed_binary;
mod mixed_integer;

pub use pure_integer::lift_pure_integer_cover;
pub use mixed_binary::lift_mixed_binary_cover;
pub use mixed_integer::lift_mixed_integer_cover;
