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

//! This module defines the most basic data types that are used throughout all
//! the code of this crate (both at the abstraction and implementation
//! levels): column indices, the tolerance pair every numeric routine is
//! parameterized on, and the compensated (double-double) accumulator that
//! the spec requires for `rhs`, `coverweight`, `lambda` and every partial sum
//! derived from them.

use std::cmp::Ordering;
use std::fmt;

// ----------------------------------------------------------------------------
// --- COLUMN -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a column (structural variable) of the LP relaxation.
/// Columns are identified with an integer ranging from 0 until
/// `LpRelaxation::num_cols()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Column(pub usize);
impl Column {
    #[inline]
    /// Returns the numeric id of the column.
    ///
    /// # Examples
    /// ```
    /// # use mip_cutgen::Column;
    /// assert_eq!(0, Column(0).id());
    /// assert_eq!(3, Column(3).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- TOLERANCES ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// The pair of numeric tolerances that a host MIP solver supplies and that
/// remain constant for the lifetime of a `CutEngine`: a feasibility
/// tolerance `feastol` and a base `epsilon <= feastol`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerances {
    /// feasibility tolerance `ε_f`
    pub feastol: f64,
    /// base epsilon `ε_0 <= ε_f`
    pub epsilon: f64,
}

impl Tolerances {
    /// Builds a tolerance pair, clamping `epsilon` to `feastol` if the
    /// caller passed an inconsistent (larger) value.
    pub fn new(feastol: f64, epsilon: f64) -> Self {
        Tolerances {
            feastol,
            epsilon: epsilon.min(feastol),
        }
    }
}

// ----------------------------------------------------------------------------
// --- COMPENSATED SUM ------------------------------------------------------
// ----------------------------------------------------------------------------
/// A compensated (double-double) accumulator, used everywhere the spec
/// requires numerically careful summation: `rhs`, `coverweight`, `lambda`,
/// and the partial sums computed by the lifting and c-MIR routines.
///
/// The representation follows Neumaier's variant of Kahan summation: `hi`
/// holds the running sum and `lo` the compensation term that would
/// otherwise be lost to rounding. `lo` is folded back into `hi` explicitly
/// via `renormalize`, never silently, so that callers can reason about
/// when the pair is in canonical form (`|lo| <= ulp(hi)`).
#[derive(Copy, Clone, Debug, Default)]
pub struct CompensatedSum {
    hi: f64,
    lo: f64,
}

impl CompensatedSum {
    /// A compensated sum initialized to zero.
    pub const ZERO: CompensatedSum = CompensatedSum { hi: 0.0, lo: 0.0 };

    /// Builds a compensated sum from a single plain `f64`.
    pub fn from_f64(v: f64) -> Self {
        CompensatedSum { hi: v, lo: 0.0 }
    }

    /// Returns the current value as a plain `f64` (`hi + lo`).
    #[inline]
    pub fn value(self) -> f64 {
        self.hi + self.lo
    }

    /// Adds `delta` to this accumulator using Neumaier's compensated
    /// summation so that the error term is preserved in `lo`.
    pub fn add(&mut self, delta: f64) {
        let t = self.hi + delta;
        if self.hi.abs() >= delta.abs() {
            self.lo += (self.hi - t) + delta;
        } else {
            self.lo += (delta - t) + self.hi;
        }
        self.hi = t;
        self.renormalize();
    }

    /// Subtracts `delta` from this accumulator.
    pub fn sub(&mut self, delta: f64) {
        self.add(-delta);
    }

    /// Multiplies the accumulated value by a plain scalar, folding the
    /// compensation term along with it.
    pub fn mul(self, scalar: f64) -> CompensatedSum {
        CompensatedSum {
            hi: self.hi * scalar,
            lo: self.lo * scalar,
        }
    }

    /// Divides the accumulated value by a plain scalar.
    pub fn div(self, scalar: f64) -> CompensatedSum {
        CompensatedSum {
            hi: self.hi / scalar,
            lo: self.lo / scalar,
        }
    }

    /// Folds `lo` back into `hi` whenever keeping it separate no longer
    /// buys precision. This never changes `value()`, only the split.
    pub fn renormalize(&mut self) {
        let t = self.hi + self.lo;
        let err = self.lo - (t - self.hi);
        self.hi = t;
        self.lo = err;
    }

    /// Largest integer `<= value()`.
    pub fn floor(self) -> f64 {
        self.value().floor()
    }

    /// Nearest integer to `value()`, ties away from zero.
    pub fn round(self) -> f64 {
        self.value().round()
    }

    /// Smallest integer `>= value()`.
    pub fn ceil(self) -> f64 {
        self.value().ceil()
    }
}

impl From<f64> for CompensatedSum {
    fn from(v: f64) -> Self {
        CompensatedSum::from_f64(v)
    }
}

impl PartialEq<f64> for CompensatedSum {
    fn eq(&self, other: &f64) -> bool {
        self.value() == *other
    }
}

impl PartialOrd<f64> for CompensatedSum {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.value().partial_cmp(other)
    }
}

impl fmt::Display for CompensatedSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl std::ops::AddAssign<f64> for CompensatedSum {
    fn add_assign(&mut self, rhs: f64) {
        self.add(rhs);
    }
}

impl std::ops::SubAssign<f64> for CompensatedSum {
    fn sub_assign(&mut self, rhs: f64) {
        self.sub(rhs);
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_column {
    use crate::Column;

    #[test]
    fn test_column_id() {
        assert_eq!(0, Column(0).id());
        assert_eq!(1, Column(1).id());
        assert_eq!(2, Column(2).id());
    }
}

#[cfg(test)]
mod test_compensated_sum {
    use crate::CompensatedSum;

    #[test]
    fn zero_is_zero() {
        assert_eq!(0.0, CompensatedSum::ZERO.value());
    }

    #[test]
    fn add_accumulates_exactly_for_plain_values() {
        let mut s = CompensatedSum::ZERO;
        s.add(1.0);
        s.add(2.0);
        s.add(3.0);
        assert_eq!(6.0, s.value());
    }

    #[test]
    fn compensated_sum_beats_naive_summation_on_a_classic_case() {
        // 1e16 + 1.0 - 1e16 loses the 1.0 term under naive f64 summation;
        // the compensated accumulator keeps it in the correction term.
        let mut s = CompensatedSum::ZERO;
        s.add(1e16);
        s.add(1.0);
        s.sub(1e16);
        assert_eq!(1.0, s.value());
    }

    #[test]
    fn mul_and_div_scale_both_lanes() {
        let mut s = CompensatedSum::ZERO;
        s.add(3.0);
        assert_eq!(6.0, s.mul(2.0).value());
        assert_eq!(1.5, s.div(2.0).value());
    }

    #[test]
    fn ordering_against_plain_f64() {
        let s = CompensatedSum::from_f64(5.0);
        assert!(s > 4.0);
        assert!(s < 6.0);
        assert_eq!(s, 5.0);
    }
}
