use approx::assert_abs_diff_eq;
use kgate_msm::{
    CoarseGrainer, DirectSolver, MsmError, PowerSolver, RateMatrix, TransitionMatrix,
    cluster_weights, coarse_grain, crisp_membership, stationary_distribution,
};
use ndarray::{Array1, Array2, array};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random dense generator with off-diagonal rates in `[0, max_rate)`.
fn random_generator(n: usize, max_rate: f64, seed: u64) -> RateMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let off = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            0.0
        } else {
            rng.random_range(0.0..max_rate)
        }
    });
    RateMatrix::from_off_diagonal(off).expect("random generator is valid")
}

/// Birth-death generator, reversible with respect to its stationary distribution.
fn birth_death(n: usize) -> RateMatrix {
    let off = Array2::from_shape_fn((n, n), |(i, j)| {
        if j == i + 1 {
            0.3 + 0.1 * i as f64
        } else if i == j + 1 {
            0.2 + 0.05 * j as f64
        } else {
            0.0
        }
    });
    RateMatrix::from_off_diagonal(off).unwrap()
}

fn assert_close(a: &Array2<f64>, b: &Array2<f64>, eps: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = eps);
    }
}

// ---------------------------------------------------------------------------
// 1. exponentials are row-stochastic over a range of lags
// ---------------------------------------------------------------------------
#[test]
fn exponential_is_stochastic_for_many_lags() {
    for seed in 0..10 {
        let q = random_generator(6, 2.0, seed);
        for &lag in &[1e-3, 0.1, 1.0, 10.0, 250.0] {
            let t = TransitionMatrix::from_generator(&q, lag).unwrap_or_else(|e| {
                panic!("seed {seed}, lag {lag}: {e}");
            });
            for i in 0..t.n_states() {
                assert_abs_diff_eq!(t.row(i).sum(), 1.0, epsilon = 1e-8);
                for &p in t.row(i) {
                    assert!((-1e-8..=1.0 + 1e-8).contains(&p), "entry {p} out of range");
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 2. semigroup: P(s + t) = P(s) P(t)
// ---------------------------------------------------------------------------
#[test]
fn semigroup_property() {
    let q = random_generator(5, 1.5, 42);
    for &(s, t) in &[(0.3, 0.7), (1.0, 2.5), (5.0, 5.0)] {
        let joint = TransitionMatrix::from_generator(&q, s + t).unwrap();
        let ps = TransitionMatrix::from_generator(&q, s).unwrap();
        let pt = TransitionMatrix::from_generator(&q, t).unwrap();
        let composed = ps.compose(&pt).unwrap();
        assert_close(joint.as_array(), composed.as_array(), 1e-10);
    }
}

// ---------------------------------------------------------------------------
// 3. long lags converge to rows equal to the stationary distribution
// ---------------------------------------------------------------------------
#[test]
fn long_lag_rows_approach_stationary() {
    let q = random_generator(4, 1.0, 7);
    let short = TransitionMatrix::from_generator(&q, 1.0).unwrap();
    let pi = stationary_distribution(&short).unwrap();
    let long = TransitionMatrix::from_generator(&q, 500.0).unwrap();
    for i in 0..4 {
        for j in 0..4 {
            assert_abs_diff_eq!(long.prob(i, j), pi[j], epsilon = 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// 4. stationary distribution is independent of lag
// ---------------------------------------------------------------------------
#[test]
fn stationary_independent_of_lag() {
    let q = random_generator(5, 1.0, 11);
    let a = stationary_distribution(&TransitionMatrix::from_generator(&q, 0.5).unwrap()).unwrap();
    let b = stationary_distribution(&TransitionMatrix::from_generator(&q, 3.0).unwrap()).unwrap();
    for i in 0..5 {
        assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-10);
    }
}

// ---------------------------------------------------------------------------
// 5. coarse stationary distribution equals χᵗ π, crisp and fuzzy
// ---------------------------------------------------------------------------
#[test]
fn coarse_graining_preserves_stationary_weights() {
    let q = random_generator(6, 1.0, 3);
    let t = TransitionMatrix::from_generator(&q, 1.0).unwrap();
    let pi = stationary_distribution(&t).unwrap();

    let crisp = crisp_membership(&[0, 0, 1, 1, 2, 2], 3).unwrap();
    let fuzzy = array![
        [0.8, 0.2, 0.0],
        [0.6, 0.4, 0.0],
        [0.1, 0.8, 0.1],
        [0.0, 0.5, 0.5],
        [0.0, 0.3, 0.7],
        [0.2, 0.0, 0.8],
    ];

    for chi in [crisp, fuzzy] {
        let coarse = TransitionMatrix::new(coarse_grain(&t, chi.view()).unwrap()).unwrap();
        let pi_c = stationary_distribution(&coarse).unwrap();
        let expected = cluster_weights(chi.view(), pi.view());
        for c in 0..3 {
            assert_abs_diff_eq!(pi_c[c], expected[c], epsilon = 1e-10);
        }
    }
}

// ---------------------------------------------------------------------------
// 6. reversibility carries over to the coarse chain
// ---------------------------------------------------------------------------
#[test]
fn detailed_balance_transfers() {
    let q = birth_death(6);
    let t = TransitionMatrix::from_generator(&q, 2.0).unwrap();
    let pi = stationary_distribution(&t).unwrap();
    for i in 0..6 {
        for j in 0..6 {
            assert_abs_diff_eq!(pi[i] * t.prob(i, j), pi[j] * t.prob(j, i), epsilon = 1e-12);
        }
    }

    let chi = crisp_membership(&[0, 0, 1, 1, 1, 2], 3).unwrap();
    let coarse = coarse_grain(&t, chi.view()).unwrap();
    let pi_c: Array1<f64> = cluster_weights(chi.view(), pi.view());
    for a in 0..3 {
        for b in 0..3 {
            assert_abs_diff_eq!(
                pi_c[a] * coarse[[a, b]],
                pi_c[b] * coarse[[b, a]],
                epsilon = 1e-12
            );
        }
    }
}

// ---------------------------------------------------------------------------
// 7. injected solvers agree end to end
// ---------------------------------------------------------------------------
#[test]
fn solvers_agree_through_projection() {
    let q = random_generator(5, 1.0, 99);
    let t = TransitionMatrix::from_generator(&q, 1.0).unwrap();
    let chi = crisp_membership(&[0, 1, 0, 1, 1], 2).unwrap();
    let direct = CoarseGrainer::new(DirectSolver::new())
        .project(&t, chi.view())
        .unwrap();
    let power = CoarseGrainer::new(PowerSolver::new())
        .project(&t, chi.view())
        .unwrap();
    assert_close(&direct, &power, 1e-9);
}

// ---------------------------------------------------------------------------
// 8. an unused coarse cluster is reported, not divided by zero
// ---------------------------------------------------------------------------
#[test]
fn unused_cluster_is_degenerate() {
    let q = random_generator(4, 1.0, 5);
    let t = TransitionMatrix::from_generator(&q, 1.0).unwrap();
    let chi = crisp_membership(&[0, 0, 2, 2], 3).unwrap();
    assert!(matches!(
        coarse_grain(&t, chi.view()),
        Err(MsmError::DegenerateCluster { cluster: 1, .. })
    ));
}
