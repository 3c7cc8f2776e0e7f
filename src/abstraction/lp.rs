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
use crate::abstraction::MipData;

/// This trait abstracts away the LP relaxation that a `CutEngine` is attached
/// to. It is the sole source of the reference point being separated (the
/// current LP solution) and of the integrality of each column.
pub trait LpRelaxation {
    /// Returns true iff `col` is required to take an integer value.
    fn is_col_integral(&self, col: Column) -> bool;
    /// Returns the number of structural columns in the relaxation.
    fn num_cols(&self) -> usize;
    /// Returns the value of `col` in the current LP solution.
    fn col_value(&self, col: Column) -> f64;
    /// Returns a handle on the owning MIP solver's tolerances and domain.
    fn mip_data(&self) -> &dyn MipData;
}
