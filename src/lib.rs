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

//! # mip-cutgen
//! `mip-cutgen` is the cut-generation core of a mixed-integer programming
//! solver: given a row of the current LP relaxation and the bounds/
//! integrality of its columns, it produces a valid, violated inequality
//! (a "cut") strengthening the relaxation, or a strengthened infeasibility
//! proof from domain propagation (a "conflict").
//!
//! The crate does not own an LP, a branch-and-bound tree, or a cut pool; it
//! is driven entirely through the five small traits of the [`abstraction`]
//! module that a host solver implements: [`LpRelaxation`], [`MipData`],
//! [`Domain`], [`TransformedLp`] and [`CutPool`]. Everything else --
//! superadditive lifting of a knapsack cover (pure integer, mixed binary,
//! mixed integer) and complemented mixed-integer rounding -- lives in
//! [`implementation`] behind the single [`CutEngine`] entry point.
//!
//! ## Quick example
//! ```no_run
//! use mip_cutgen::{Column, CutEngine, CutEngineConfigBuilder};
//! # use mip_cutgen::{CutPool, Domain, LpRelaxation, MipData, TransformedLp, DebugSolution, NoDebugSolution};
//! # struct MyLp;
//! # impl LpRelaxation for MyLp {
//! #     fn is_col_integral(&self, _col: Column) -> bool { true }
//! #     fn num_cols(&self) -> usize { 3 }
//! #     fn col_value(&self, _col: Column) -> f64 { 0.0 }
//! #     fn mip_data(&self) -> &dyn MipData { unimplemented!() }
//! # }
//! # struct MyPool;
//! # impl CutPool for MyPool {
//! #     fn add_cut(&mut self, _inds: &[Column], _vals: &[f64], _rhs: f64) -> Option<usize> { Some(0) }
//! #     fn num_cuts(&self) -> usize { 0 }
//! # }
//! # let lp = MyLp;
//! # let mut pool = MyPool;
//! let config = CutEngineConfigBuilder::default()
//!     .feastol(1e-6)
//!     .epsilon(1e-9)
//!     .build()
//!     .unwrap();
//! let engine = CutEngine::new(&lp, &mut pool, config);
//! assert!(engine.is_ok());
//! ```

mod common;
mod abstraction;
mod implementation;

pub use common::*;
pub use abstraction::*;
pub use implementation::*;
