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

//! A deterministic tie-break hash for the cover sort of
//! [`crate::determine_cover`]. It must be a pure function of exactly
//! `(colIndex, poolSize)` so that two calls with identical inputs and
//! identical `CutPool::num_cuts()` compare two candidates in the same
//! order — this is what makes the engine's output bit-reproducible
//! (testable property 8).

/// The 64-bit splitmix mixer, applied twice below to fold both inputs in.
#[inline]
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A stable pseudo-random but reproducible 64-bit mix of a column index and
/// the current cut-pool size, used to break exact ties when sorting cover
/// candidates by activity contribution. Never depends on anything but its
/// two arguments: no platform hashing, no iteration order, no time.
pub fn tiebreak_hash(col: usize, pool_size: usize) -> u64 {
    let a = splitmix64(col as u64);
    splitmix64(a ^ (pool_size as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        assert_eq!(tiebreak_hash(3, 7), tiebreak_hash(3, 7));
        assert_eq!(tiebreak_hash(0, 0), tiebreak_hash(0, 0));
    }

    #[test]
    fn differing_columns_usually_differ() {
        let a = tiebreak_hash(1, 10);
        let b = tiebreak_hash(2, 10);
        assert_ne!(a, b);
    }

    #[test]
    fn differing_pool_sizes_usually_differ() {
        let a = tiebreak_hash(5, 0);
        let b = tiebreak_hash(5, 1);
        assert_ne!(a, b);
    }
}
