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

//! This module (and its submodules) provide the cut-generation pipeline
//! itself: a deterministic sequence of stages threaded through one mutable
//! [`WorkingRow`], tying together a tie-breaking hash, preprocessing, cover
//! selection, the three lifted-cover procedures, complemented MIR, and
//! postprocessing behind the public [`CutEngine`] entry point.

mod hash;
mod row;
mod preprocess;
mod cover;
mod lifting;
mod cmir;
mod postprocess;
mod engine;

pub use row::WorkingRow;
pub use engine::{CutEngine, CutEngineConfig, CutEngineConfigBuilder, CutEngineConfigBuilderError, CutEngineError};
