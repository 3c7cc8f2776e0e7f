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

//! The `CutEngine` pipeline glue (`spec.md` §4.8): the five-stage pipeline
//! shared by `generate_cut` (LP separation) and `generate_conflict`
//! (domain-propagation proof strengthening).

use derive_builder::Builder;
use thiserror::Error;

use crate::abstraction::{CutPool, Domain, LpRelaxation, TransformedLp};
use crate::implementation::cmir::{apply_cmir, CMirConfig};
use crate::implementation::cover::determine_cover;
use crate::implementation::lifting::{
    lift_mixed_binary_cover, lift_mixed_integer_cover, lift_pure_integer_cover,
};
use crate::implementation::postprocess::postprocess;
use crate::implementation::preprocess::preprocess;
use crate::implementation::row::WorkingRow;
use crate::{Column, Tolerances};

/// Raised when a `CutEngineConfig` is constructed with internally
/// inconsistent tolerances or c-MIR search bounds. This is the only place
/// in the crate that raises rather than silently returning `false` -- it
/// guards a programmer/host-wiring error caught once at setup, not a
/// per-call numerical outcome (see `spec.md` §7).
#[derive(Debug, Error)]
pub enum CutEngineError {
    /// `feastol` was not strictly positive.
    #[error("feastol must be strictly positive, got {0}")]
    NonPositiveFeastol(f64),
    /// `epsilon` was not strictly positive.
    #[error("epsilon must be strictly positive, got {0}")]
    NonPositiveEpsilon(f64),
    /// `epsilon` exceeded `feastol`.
    #[error("epsilon ({epsilon}) must not exceed feastol ({feastol})")]
    EpsilonExceedsFeastol { epsilon: f64, feastol: f64 },
    /// The c-MIR divisor search bounds were non-positive or unordered.
    #[error(
        "c-MIR delta bounds must be positive and ordered (delta_min={delta_min}, delta_max={delta_max})"
    )]
    InvalidDeltaBounds { delta_min: f64, delta_max: f64 },
    /// `max_dynamism` was not strictly positive.
    #[error("max_dynamism must be strictly positive, got {0}")]
    NonPositiveMaxDynamism(f64),
}

/// Configuration bundle for a `CutEngine`, built with a `derive_builder`
/// builder the way this codebase's visualisation config is assembled
/// (`VizConfigBuilder` in `ddo-viz`): every field but the two tolerances
/// has a sensible default, and the builder is fallible.
#[derive(Debug, Clone, Builder)]
pub struct CutEngineConfig {
    /// The feasibility tolerance `ε_f`.
    pub feastol: f64,
    /// The base epsilon `ε_0 <= ε_f`.
    pub epsilon: f64,
    /// Lower bound of the c-MIR divisor search (`spec.md` §4.6 step 2).
    #[builder(default = "1e-4")]
    pub delta_min: f64,
    /// Upper bound of the c-MIR divisor search.
    #[builder(default = "1e4")]
    pub delta_max: f64,
    /// The c-MIR dynamism cutoff of `spec.md` §4.6 step 3.
    #[builder(default = "1e4")]
    pub max_dynamism: f64,
    /// Base term of the `maxLen` formula of `spec.md` §4.1.
    #[builder(default = "100")]
    pub max_len_base: usize,
    /// Fractional term of the `maxLen` formula, multiplied by `num_cols`.
    #[builder(default = "0.15")]
    pub max_len_fraction: f64,
}

impl CutEngineConfig {
    /// Checks the cross-field invariants the builder alone cannot express:
    /// both tolerances strictly positive and ordered, and the c-MIR search
    /// bounds strictly positive and ordered.
    pub fn validate(&self) -> Result<(), CutEngineError> {
        if !(self.feastol > 0.0) {
            return Err(CutEngineError::NonPositiveFeastol(self.feastol));
        }
        if !(self.epsilon > 0.0) {
            return Err(CutEngineError::NonPositiveEpsilon(self.epsilon));
        }
        if self.epsilon > self.feastol {
            return Err(CutEngineError::EpsilonExceedsFeastol {
                epsilon: self.epsilon,
                feastol: self.feastol,
            });
        }
        if !(self.delta_min > 0.0) || !(self.delta_max > self.delta_min) {
            return Err(CutEngineError::InvalidDeltaBounds {
                delta_min: self.delta_min,
                delta_max: self.delta_max,
            });
        }
        if !(self.max_dynamism > 0.0) {
            return Err(CutEngineError::NonPositiveMaxDynamism(self.max_dynamism));
        }
        Ok(())
    }

    fn tolerances(&self) -> Tolerances {
        Tolerances::new(self.feastol, self.epsilon)
    }

    fn cmir_config(&self) -> CMirConfig {
        CMirConfig {
            delta_min: self.delta_min,
            delta_max: self.delta_max,
            max_dynamism: self.max_dynamism,
        }
    }
}

/// The stateful engine attached to one LP relaxation and one cut pool
/// (`spec.md` §3 "Lifecycle"). Holds only non-owning references to its
/// external collaborators plus its own scratch `WorkingRow`, reset (not
/// reallocated) at the top of every call.
pub struct CutEngine<'a> {
    lp: &'a dyn LpRelaxation,
    pool: &'a mut dyn CutPool,
    config: CutEngineConfig,
    row: WorkingRow,
}

impl<'a> CutEngine<'a> {
    /// Builds a new engine attached to `lp` and `pool`, validating `config`.
    /// Returns `Err` iff `config`'s tolerances or c-MIR bounds are
    /// internally inconsistent; this is the sole fallible construction
    /// point in the crate (`spec.md` §7's silent-rejection contract covers
    /// every per-call operation from here on).
    pub fn new(
        lp: &'a dyn LpRelaxation,
        pool: &'a mut dyn CutPool,
        config: CutEngineConfig,
    ) -> Result<Self, CutEngineError> {
        config.validate()?;
        Ok(CutEngine {
            lp,
            pool,
            config,
            row: WorkingRow::new(),
        })
    }

    /// Separates a violated row of the current LP relaxation. `trans_lp`
    /// rewrites `inds`/`vals`/`rhs` into the complemented non-negative
    /// space the lifting/c-MIR routines operate on. On success, `inds`,
    /// `vals` and `rhs` are overwritten with the strengthened cut in the
    /// original variable space and `true` is returned.
    pub fn generate_cut(
        &mut self,
        trans_lp: &dyn TransformedLp,
        inds: &mut Vec<Column>,
        vals: &mut Vec<f64>,
        rhs: &mut f64,
    ) -> bool {
        tracing::debug!(len = inds.len(), "generate_cut: enter");
        let tol = self.config.tolerances();
        let num_cols = self.lp.num_cols();

        let mut upper = Vec::new();
        let mut solval = Vec::new();
        let mut ints_positive = false;
        if !trans_lp.transform(inds, vals, rhs, &mut upper, &mut solval, &mut ints_positive) {
            tracing::debug!(reason = "transform_failed", "generate_cut rejected");
            return false;
        }

        let integral: Vec<bool> = inds.iter().map(|&c| self.lp.is_col_integral(c)).collect();
        self.row.load(inds, vals, *rhs, &upper, &solval, &integral);

        if !preprocess(
            &mut self.row,
            num_cols,
            tol,
            self.config.max_len_base,
            self.config.max_len_fraction,
        ) {
            return false;
        }

        // The lifting routines require every integer coefficient to be
        // non-negative; if preprocessing left unbounded integers with a
        // negative coefficient and the transform did not already arrange
        // for non-negative integer coefficients, complement them now.
        if self.row.has_unbounded_ints && !ints_positive {
            for i in 0..self.row.len() {
                if self.row.integral[i] && self.row.vals[i] < 0.0 {
                    self.row.complement_at(i);
                }
            }
        }

        if !self.route(tol) {
            return false;
        }
        if !postprocess(&mut self.row, tol) {
            return false;
        }

        self.undo_complementation();
        self.row.write_row(inds, vals, rhs);

        if !trans_lp.untransform(inds, vals, rhs, self.row.integral_coefficients) {
            tracing::debug!(reason = "untransform_failed", "generate_cut rejected");
            return false;
        }

        let activity: f64 = inds
            .iter()
            .zip(vals.iter())
            .map(|(&c, &v)| v * self.lp.col_value(c))
            .sum();
        self.finish(inds, vals, *rhs, activity, tol)
    }

    /// Strengthens a domain-propagation infeasibility proof into a cut.
    /// `local_domain` supplies the local (propagated) bounds that define the
    /// witness point the proof was derived against; the global bounds used
    /// for the bound-substitution transform itself come from the owning MIP
    /// solver's domain (`self.lp.mip_data().domain()`).
    pub fn generate_conflict(
        &mut self,
        local_domain: &dyn Domain,
        proof_inds: &mut Vec<Column>,
        proof_vals: &mut Vec<f64>,
        proof_rhs: &mut f64,
    ) -> bool {
        tracing::debug!(len = proof_inds.len(), "generate_conflict: enter");
        let tol = self.config.tolerances();
        let num_cols = self.lp.num_cols();
        let global = self.lp.mip_data().domain();

        // Inline transform: shift every position by its global lower bound.
        // Positions with a negative coefficient and a finite global upper
        // bound are then complemented via `WorkingRow::complement_at` below
        // (after `load`), so that the complementation bit is tracked and
        // can be undone the same way as any other complementation.
        let n = proof_inds.len();
        let mut upper = vec![0.0_f64; n];
        let mut solval = vec![0.0_f64; n];
        let mut rhs = *proof_rhs;
        for i in 0..n {
            let col = proof_inds[i];
            let lo = global.col_lower(col);
            let hi = global.col_upper(col);
            let witness = if proof_vals[i] > 0.0 {
                local_domain.col_upper(col)
            } else {
                local_domain.col_lower(col)
            };
            rhs -= proof_vals[i] * lo;
            upper[i] = hi - lo;
            solval[i] = witness - lo;
        }

        let integral: Vec<bool> = proof_inds
            .iter()
            .map(|&c| self.lp.is_col_integral(c))
            .collect();
        self.row.load(proof_inds, proof_vals, rhs, &upper, &solval, &integral);

        for i in 0..self.row.len() {
            if self.row.vals[i] < 0.0 && self.row.upper[i].is_finite() {
                self.row.complement_at(i);
            }
        }

        if !preprocess(
            &mut self.row,
            num_cols,
            tol,
            self.config.max_len_base,
            self.config.max_len_fraction,
        ) {
            return false;
        }

        if self.row.has_unbounded_ints {
            for i in 0..self.row.len() {
                if self.row.integral[i] && self.row.vals[i] < 0.0 {
                    self.row.complement_at(i);
                }
            }
        }

        if !self.route(tol) {
            return false;
        }
        if !postprocess(&mut self.row, tol) {
            return false;
        }

        self.undo_complementation();
        self.row.write_row(proof_inds, proof_vals, proof_rhs);

        // Undo the inline shift-by-lower-bound applied above (the
        // complementation bit, if any, was already undone).
        for i in 0..proof_inds.len() {
            let lo = global.col_lower(proof_inds[i]);
            *proof_rhs += proof_vals[i] * lo;
        }

        let activity: f64 = proof_inds
            .iter()
            .zip(proof_vals.iter())
            .map(|(&c, &v)| {
                let witness = if v > 0.0 {
                    local_domain.col_upper(c)
                } else {
                    local_domain.col_lower(c)
                };
                v * witness
            })
            .sum();
        self.finish(proof_inds, proof_vals, *proof_rhs, activity, tol)
    }

    /// Routes the preprocessed row to c-MIR or one of the three lifted
    /// cover procedures, per `spec.md` §4.8 step 3.
    fn route(&mut self, tol: Tolerances) -> bool {
        if self.row.has_unbounded_ints {
            tracing::debug!(route = "cmir", "generate_cut: routing");
            return apply_cmir(&mut self.row, tol, self.config.cmir_config());
        }
        if !determine_cover(&mut self.row, tol, true, self.pool.num_cuts()) {
            return false;
        }
        if self.row.has_general_ints {
            tracing::debug!(route = "mixed_integer", "generate_cut: routing");
            lift_mixed_integer_cover(&mut self.row, tol)
        } else if self.row.has_continuous {
            tracing::debug!(route = "mixed_binary", "generate_cut: routing");
            lift_mixed_binary_cover(&mut self.row, tol)
        } else {
            tracing::debug!(route = "pure_integer", "generate_cut: routing");
            lift_pure_integer_cover(&mut self.row, tol)
        }
    }

    /// Undoes every surviving complementation bit, in place, exploiting
    /// `WorkingRow::complement_at`'s involution property.
    fn undo_complementation(&mut self) {
        for i in 0..self.row.len() {
            if self.row.complementation[i] {
                self.row.complement_at(i);
            }
        }
    }

    /// Shared tail of both entry points (`spec.md` §4.8 step 5): checks the
    /// final violation, applies the domain's coefficient tightening, runs
    /// the (no-op by default) debug-solution check, and submits to the
    /// pool.
    fn finish(
        &mut self,
        inds: &mut Vec<Column>,
        vals: &mut Vec<f64>,
        mut rhs: f64,
        activity: f64,
        tol: Tolerances,
    ) -> bool {
        let violation = activity - rhs;
        if violation <= 10.0 * tol.feastol {
            tracing::debug!(reason = "cut_not_violated", violation, "generate_cut rejected");
            return false;
        }

        let domain = self.lp.mip_data().domain();
        rhs = domain.tighten_coefficients(inds, vals, rhs);

        let debug = self.lp.mip_data().debug_solution();
        if !debug.check_cut(inds, vals, rhs) {
            tracing::debug!("generate_cut: debug solution check failed (no required effect)");
        }

        match self.pool.add_cut(inds, vals, rhs) {
            Some(idx) => {
                tracing::debug!(idx, "generate_cut: accepted");
                true
            }
            None => {
                tracing::debug!(reason = "duplicate_in_pool", "generate_cut rejected");
                false
            }
        }
    }
}
