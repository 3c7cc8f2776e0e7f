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

//! End-to-end exercises of `CutEngine` against minimal host fixtures: a
//! fixed LP relaxation, a fixed variable domain and a cut pool that just
//! records what it is handed. Each fixture stays deliberately tiny so the
//! expected numeric outcome of every stage can be hand-checked.

use mip_cutgen::{
    Column, CutEngine, CutEngineConfigBuilder, CutPool, Domain, LpRelaxation, MipData,
    NoDebugSolution, TransformedLp,
};

/// A domain with per-column `(lower, upper)` bounds and a no-op tightener.
struct FixedDomain {
    bounds: Vec<(f64, f64)>,
}

impl Domain for FixedDomain {
    fn col_lower(&self, col: Column) -> f64 {
        self.bounds[col.id()].0
    }
    fn col_upper(&self, col: Column) -> f64 {
        self.bounds[col.id()].1
    }
    fn tighten_coefficients(&self, _inds: &mut [Column], _vals: &mut [f64], rhs: f64) -> f64 {
        rhs
    }
}

struct FixedMipData {
    feastol: f64,
    epsilon: f64,
    domain: FixedDomain,
}

impl MipData for FixedMipData {
    fn feastol(&self) -> f64 {
        self.feastol
    }
    fn epsilon(&self) -> f64 {
        self.epsilon
    }
    fn domain(&self) -> &dyn Domain {
        &self.domain
    }
    fn debug_solution(&self) -> &dyn mip_cutgen::DebugSolution {
        &NoDebugSolution
    }
}

/// An LP relaxation over binary columns, all integral, whose value at the
/// point being separated is given directly by `solution`.
struct BinaryLp {
    solution: Vec<f64>,
    mip_data: FixedMipData,
}

impl LpRelaxation for BinaryLp {
    fn is_col_integral(&self, _col: Column) -> bool {
        true
    }
    fn num_cols(&self) -> usize {
        self.solution.len()
    }
    fn col_value(&self, col: Column) -> f64 {
        self.solution[col.id()]
    }
    fn mip_data(&self) -> &dyn MipData {
        &self.mip_data
    }
}

/// An LP relaxation over columns with arbitrary per-column integrality and
/// bounds (used for the mixed-type and unbounded-integer scenarios, where a
/// flat "every column is binary" assumption like `BinaryLp`'s doesn't hold).
struct GenericLp {
    solution: Vec<f64>,
    integral: Vec<bool>,
    mip_data: FixedMipData,
}

impl LpRelaxation for GenericLp {
    fn is_col_integral(&self, col: Column) -> bool {
        self.integral[col.id()]
    }
    fn num_cols(&self) -> usize {
        self.solution.len()
    }
    fn col_value(&self, col: Column) -> f64 {
        self.solution[col.id()]
    }
    fn mip_data(&self) -> &dyn MipData {
        &self.mip_data
    }
}

/// An identity row transform for rows already expressed over `[0, upper]`
/// columns with non-negative coefficients: nothing needs shifting or
/// complementing, `upper`/`solval` are read straight from the LP through its
/// `MipData`/`Domain`, so this works for any `LpRelaxation`, not just the
/// all-binary `BinaryLp`.
struct GenericTransform<'a> {
    lp: &'a dyn LpRelaxation,
}

impl TransformedLp for GenericTransform<'_> {
    fn transform(
        &self,
        inds: &mut Vec<Column>,
        _vals: &mut Vec<f64>,
        _rhs: &mut f64,
        upper: &mut Vec<f64>,
        solval: &mut Vec<f64>,
        ints_positive: &mut bool,
    ) -> bool {
        let domain = self.lp.mip_data().domain();
        upper.clear();
        solval.clear();
        for &c in inds.iter() {
            upper.push(domain.col_upper(c));
            solval.push(self.lp.col_value(c));
        }
        *ints_positive = true;
        true
    }

    fn untransform(
        &self,
        _inds: &mut Vec<Column>,
        _vals: &mut Vec<f64>,
        _rhs: &mut f64,
        _integral: bool,
    ) -> bool {
        true
    }
}

/// A cut pool that just records every accepted cut, rejecting exact
/// duplicates of an inequality already stored (same indices and rhs).
#[derive(Default)]
struct RecordingPool {
    cuts: Vec<(Vec<Column>, Vec<f64>, f64)>,
}

impl CutPool for RecordingPool {
    fn add_cut(&mut self, inds: &[Column], vals: &[f64], rhs: f64) -> Option<usize> {
        if self
            .cuts
            .iter()
            .any(|(i, _, r)| i == inds && (r - rhs).abs() < 1e-9)
        {
            return None;
        }
        self.cuts.push((inds.to_vec(), vals.to_vec(), rhs));
        Some(self.cuts.len() - 1)
    }
    fn num_cuts(&self) -> usize {
        self.cuts.len()
    }
}

fn config() -> mip_cutgen::CutEngineConfig {
    CutEngineConfigBuilder::default()
        .feastol(1e-6)
        .epsilon(1e-9)
        .build()
        .unwrap()
}

fn binary_domain(n: usize) -> FixedDomain {
    FixedDomain {
        bounds: vec![(0.0, 1.0); n],
    }
}

/// S1: `3x1 + 3x2 + 3x3 <= 5`, binary, LP solution `(1, 1, 0.33)`. The two
/// at-bound columns alone already form a valid cover, so the lifted cut is
/// the tightest possible one for this row: `x1 + x2 + x3 <= 1`.
#[test]
fn s1_minimal_cover_cut_is_generated() {
    let lp = BinaryLp {
        solution: vec![1.0, 1.0, 0.33],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1), Column(2)];
    let mut vals = vec![3.0, 3.0, 3.0];
    let mut rhs = 5.0;

    let transform = GenericTransform { lp: &lp };
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));

    assert_eq!(vec![Column(0), Column(1), Column(2)], inds);
    for v in &vals {
        assert!((v - 1.0).abs() < 1e-6);
    }
    assert!((rhs - 1.0).abs() < 1e-6);
    assert_eq!(1, pool.num_cuts());
}

/// The same row at a point where it is already satisfied (`x3` at 0, not
/// 0.33) is not violated by any inequality stronger than the original, so
/// no cut is generated.
#[test]
fn satisfied_row_yields_no_cut() {
    let lp = BinaryLp {
        solution: vec![0.0, 0.0, 0.0],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1), Column(2)];
    let mut vals = vec![3.0, 3.0, 3.0];
    let mut rhs = 5.0;

    let transform = GenericTransform { lp: &lp };
    assert!(!engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));
    assert_eq!(0, pool.num_cuts());
}

/// Submitting the exact same violated row twice only yields one stored cut;
/// the pool's own duplicate detection rejects the second occurrence.
#[test]
fn duplicate_cut_is_rejected_by_the_pool() {
    let lp = BinaryLp {
        solution: vec![1.0, 1.0, 0.33],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();
    let transform = GenericTransform { lp: &lp };

    let mut inds = vec![Column(0), Column(1), Column(2)];
    let mut vals = vec![3.0, 3.0, 3.0];
    let mut rhs = 5.0;
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));

    let mut inds2 = vec![Column(0), Column(1), Column(2)];
    let mut vals2 = vec![3.0, 3.0, 3.0];
    let mut rhs2 = 5.0;
    assert!(!engine.generate_cut(&transform, &mut inds2, &mut vals2, &mut rhs2));
    assert_eq!(1, pool.num_cuts());
}

/// A conflict-path counterpart of S1: domain propagation has forced all
/// three binary columns to their upper bound (a direct contradiction of
/// `3x1+3x2+3x3<=5`, since the forced point sums to 9). `generate_conflict`
/// shifts by the global lower bound (zero here, so numerically a no-op) and
/// strengthens the proof through the same cover/lift machinery as
/// `generate_cut`, landing on the identical tightest cut.
#[test]
fn conflict_path_matches_the_lp_separation_outcome() {
    let lp = BinaryLp {
        solution: vec![1.0, 1.0, 1.0],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    // Local domain: propagation has forced every column to exactly 1.
    let local_domain = FixedDomain {
        bounds: vec![(1.0, 1.0); 3],
    };

    let mut proof_inds = vec![Column(0), Column(1), Column(2)];
    let mut proof_vals = vec![3.0, 3.0, 3.0];
    let mut proof_rhs = 5.0;

    assert!(engine.generate_conflict(&local_domain, &mut proof_inds, &mut proof_vals, &mut proof_rhs));

    assert_eq!(vec![Column(0), Column(1), Column(2)], proof_inds);
    for v in &proof_vals {
        assert!((v - 1.0).abs() < 1e-6);
    }
    assert!((proof_rhs - 1.0).abs() < 1e-6);
    assert_eq!(1, pool.num_cuts());
}

/// A conflict proof whose witness point does not actually violate the
/// incoming inequality produces no cut.
#[test]
fn conflict_without_a_violated_witness_yields_no_cut() {
    let lp = BinaryLp {
        solution: vec![0.0, 0.0, 0.0],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    // Local domain: propagation forced every column to exactly 0, which
    // satisfies the row rather than contradicting it.
    let local_domain = FixedDomain {
        bounds: vec![(0.0, 0.0); 3],
    };

    let mut proof_inds = vec![Column(0), Column(1), Column(2)];
    let mut proof_vals = vec![3.0, 3.0, 3.0];
    let mut proof_rhs = 5.0;

    assert!(!engine.generate_conflict(&local_domain, &mut proof_inds, &mut proof_vals, &mut proof_rhs));
    assert_eq!(0, pool.num_cuts());
}

/// S2: `4x1 + 4x2 + 4x3 + 4x4 + 2x5 <= 9`, binary, LP solution
/// `(1, 1, 1, 0.25, 1)`. The cover stops at `{x1, x2, x3}`; `x4` lifts
/// cleanly to `2` but `x5` lands exactly on the half-integral boundary of
/// the pure-integer lifting function, forcing the whole row to double.
#[test]
fn s2_half_integral_lift_is_driven_end_to_end_through_generate_cut() {
    let lp = BinaryLp {
        solution: vec![1.0, 1.0, 1.0, 0.25, 1.0],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(5),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1), Column(2), Column(3), Column(4)];
    let mut vals = vec![4.0, 4.0, 4.0, 4.0, 2.0];
    let mut rhs = 9.0;

    let transform = GenericTransform { lp: &lp };
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));

    assert_eq!(
        vec![Column(0), Column(1), Column(2), Column(3), Column(4)],
        inds
    );
    let expected = [2.0, 2.0, 2.0, 2.0, 1.0];
    for (v, e) in vals.iter().zip(expected.iter()) {
        assert!((v - e).abs() < 1e-6, "got {v}, expected {e}");
    }
    assert!((rhs - 4.0).abs() < 1e-6);
    assert_eq!(1, pool.num_cuts());
}

/// S3: `5x1 + 5x2 + 3y <= 7`, `x` binary, `y` continuous and unbounded,
/// LP solution `(1, 1, 0)`. The cover `{x1, x2}` weakens to coefficient
/// `lambda = 3`; `y`'s positive continuous coefficient is zeroed by the
/// mixed-binary procedure and then dropped entirely by postprocessing's
/// tiny-coefficient cleanup, after which the remaining `3x1 + 3x2 <= 3`
/// is further reduced to its primitive form `x1 + x2 <= 1` -- see
/// DESIGN.md's reconciliation of this scenario's worked `+3y` term.
#[test]
fn s3_mixed_binary_end_to_end_drops_the_continuous_term() {
    let lp = GenericLp {
        solution: vec![1.0, 1.0, 0.0],
        integral: vec![true, true, false],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: FixedDomain {
                bounds: vec![(0.0, 1.0), (0.0, 1.0), (0.0, f64::INFINITY)],
            },
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1), Column(2)];
    let mut vals = vec![5.0, 5.0, 3.0];
    let mut rhs = 7.0;

    let transform = GenericTransform { lp: &lp };
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));

    assert_eq!(vec![Column(0), Column(1)], inds);
    for v in &vals {
        assert!((v - 1.0).abs() < 1e-6);
    }
    assert!((rhs - 1.0).abs() < 1e-6);
    assert_eq!(1, pool.num_cuts());
}

/// S4: `2x + y <= 3`, `x` an unbounded integer, `y` continuous and
/// unbounded, LP solution `(1.5, 0)`. No integer is finitely bounded, so
/// this is the one scenario that drives `generate_cut`'s c-MIR route
/// (`has_unbounded_ints`) rather than a lifted-cover procedure; the
/// winning divisor `delta = 2` (`f0 = 0.5`) yields `x <= 1` once `y`'s
/// positive continuous coefficient is dropped and postprocessing rescales
/// back out of preprocessing's power-of-two normalization.
#[test]
fn s4_cmir_is_driven_end_to_end_through_generate_cut_on_an_unbounded_integer() {
    let lp = GenericLp {
        solution: vec![1.5, 0.0],
        integral: vec![true, false],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: FixedDomain {
                bounds: vec![(0.0, f64::INFINITY), (0.0, f64::INFINITY)],
            },
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1)];
    let mut vals = vec![2.0, 1.0];
    let mut rhs = 3.0;

    let transform = GenericTransform { lp: &lp };
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));

    assert_eq!(vec![Column(0)], inds);
    assert!((vals[0] - 1.0).abs() < 1e-6);
    assert!((rhs - 1.0).abs() < 1e-6);
    assert_eq!(1, pool.num_cuts());
}

/// S5: a row whose right-hand side is `5 * epsilon_f`, far too small for
/// any cover to carry excess weight. `determine_cover` rejects it before
/// a single candidate is even scored, so `generate_cut` returns false and
/// nothing reaches the pool.
#[test]
fn s5_trivial_rhs_is_rejected_at_determine_cover() {
    let lp = BinaryLp {
        solution: vec![1.0],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(1),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0)];
    let mut vals = vec![1.0];
    let mut rhs = 5.0 * 1e-6;

    let transform = GenericTransform { lp: &lp };
    assert!(!engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));
    assert_eq!(0, pool.num_cuts());
}

/// Installs a real `tracing_subscriber` for the duration of the test so
/// that the `tracing` spans/events emitted throughout the pipeline (entry,
/// routing, every silent-rejection path) actually run through a
/// subscriber rather than the default no-op one -- exercising the
/// observability hooks rather than just declaring the dependency.
#[test]
fn observability_hooks_run_under_a_tracing_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let lp = BinaryLp {
        solution: vec![1.0, 1.0, 0.33],
        mip_data: FixedMipData {
            feastol: 1e-6,
            epsilon: 1e-9,
            domain: binary_domain(3),
        },
    };
    let mut pool = RecordingPool::default();
    let mut engine = CutEngine::new(&lp, &mut pool, config()).unwrap();

    let mut inds = vec![Column(0), Column(1), Column(2)];
    let mut vals = vec![3.0, 3.0, 3.0];
    let mut rhs = 5.0;
    let transform = GenericTransform { lp: &lp };
    assert!(engine.generate_cut(&transform, &mut inds, &mut vals, &mut rhs));
    assert_eq!(1, pool.num_cuts());

    // A row that hits a silent-rejection path too, so the `reason`-tagged
    // debug events on that branch also run through the subscriber.
    let mut rejected_inds = vec![Column(0)];
    let mut rejected_vals = vec![1.0];
    let mut rejected_rhs = 5.0 * 1e-6;
    assert!(!engine.generate_cut(&transform, &mut rejected_inds, &mut rejected_vals, &mut rejected_rhs));
}
