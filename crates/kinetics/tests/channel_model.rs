use approx::assert_abs_diff_eq;
use kgate_kinetics::{ChannelModel, ChannelState, RateConfig, kchannel_params};
use kgate_msm::{
    CoarseGrainer, DirectSolver, TransitionMatrix, cluster_weights, coarse_grain,
    stationary_distribution,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const VOLTAGES: [f64; 7] = [-90.0, -65.0, -30.0, 0.0, 10.0, 35.0, 80.0];

// ---------------------------------------------------------------------------
// 1. generator invariants for arbitrary non-negative rates
// ---------------------------------------------------------------------------
#[test]
fn generator_invariants_for_random_rates() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..200 {
        let alpha = rng.random_range(0.0..5.0);
        let beta = rng.random_range(0.0..5.0);
        let q = ChannelModel::new(alpha, beta).rate_matrix().unwrap();
        for i in 0..5 {
            assert_abs_diff_eq!(q.row(i).sum(), 0.0, epsilon = 1e-10);
            for j in 0..5 {
                if i == j {
                    assert!(q.rate(i, j) <= 1e-12);
                } else {
                    assert!(q.rate(i, j) >= -1e-12);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 2. transition matrices are row-stochastic across voltages and lags
// ---------------------------------------------------------------------------
#[test]
fn transition_is_stochastic_across_voltages() {
    let cfg = RateConfig::new();
    for &v in &VOLTAGES {
        let model = ChannelModel::at_voltage(v, &cfg).unwrap();
        for &lag in &[0.01, 1.0, 10.0, 1000.0] {
            for t in [
                model.transition_matrix(lag).unwrap(),
                model.transition_matrix_singlet(lag).unwrap(),
            ] {
                for i in 0..t.n_states() {
                    assert_abs_diff_eq!(t.row(i).sum(), 1.0, epsilon = 1e-8);
                    for &p in t.row(i) {
                        assert!((-1e-8..=1.0 + 1e-8).contains(&p));
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 3. zero lag gives the identity
// ---------------------------------------------------------------------------
#[test]
fn zero_lag_is_identity() {
    let t = ChannelModel::new(0.05, 0.07).transition_matrix(0.0).unwrap();
    let eye = Array2::<f64>::eye(5);
    for (x, y) in t.as_array().iter().zip(eye.iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-15);
    }
}

// ---------------------------------------------------------------------------
// 4. semigroup property
// ---------------------------------------------------------------------------
#[test]
fn semigroup_property() {
    let model = ChannelModel::at_voltage(-20.0, &RateConfig::new()).unwrap();
    for &(s, t) in &[(0.5, 1.5), (2.0, 8.0)] {
        let joint = model.transition_matrix(s + t).unwrap();
        let composed = model
            .transition_matrix(s)
            .unwrap()
            .compose(&model.transition_matrix(t).unwrap())
            .unwrap();
        for (x, y) in joint.as_array().iter().zip(composed.as_array().iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-10);
        }
    }
}

// ---------------------------------------------------------------------------
// 5. closed/open lumping preserves stationary weights
// ---------------------------------------------------------------------------
#[test]
fn closed_open_lumping_preserves_stationary() {
    let chi = ChannelModel::open_cluster_membership();
    let grainer = CoarseGrainer::new(DirectSolver::new());
    for &v in &[-90.0, -70.0, -65.0, -50.0, -20.0, 0.0, 10.0, 35.0, 80.0] {
        let model = ChannelModel::at_voltage(v, &RateConfig::new()).unwrap();
        let t = model.transition_matrix(1.0).unwrap();
        // Exact π; at -90 mV the open weight (~2e-16) is below solver resolution.
        let pi = model.binomial_occupancy().unwrap();
        let coarse = grainer
            .project_with_stationary(&t, chi.view(), pi.view())
            .unwrap_or_else(|e| panic!("V = {v}: {e}"));
        let coarse = TransitionMatrix::new(coarse).unwrap();
        let pi_c = stationary_distribution(&coarse).unwrap();
        let expected = cluster_weights(chi.view(), pi.view());
        assert_abs_diff_eq!(pi_c[0], expected[0], epsilon = 1e-10);
        assert_abs_diff_eq!(pi_c[1], expected[1], epsilon = 1e-10);

        // The open weight is n∞⁴.
        let n_inf = model.steady_state().unwrap();
        assert_abs_diff_eq!(expected[1], n_inf.powi(4), epsilon = 1e-10);
    }
}

#[test]
fn solver_lumping_matches_analytic_weights() {
    let chi = ChannelModel::open_cluster_membership();
    for &v in &[-80.0, -70.0, -65.0, -50.0, 0.0, 35.0] {
        let model = ChannelModel::at_voltage(v, &RateConfig::new()).unwrap();
        let t = model.transition_matrix(1.0).unwrap();
        let pi = stationary_distribution(&t).unwrap();
        let coarse = coarse_grain(&t, chi.view()).unwrap_or_else(|e| panic!("V = {v}: {e}"));
        for row in coarse.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-10);
        }
        // A singleton open cluster keeps the fine open row.
        let open_to_closed: f64 = (0..4).map(|j| t.prob(4, j)).sum();
        assert_abs_diff_eq!(coarse[[1, 0]], open_to_closed, epsilon = 1e-12);

        let weights = cluster_weights(chi.view(), pi.view());
        let n_inf4 = model.steady_state().unwrap().powi(4);
        assert!(weights[1] > 0.0);
        assert_abs_diff_eq!(weights[1], n_inf4, epsilon = 1e-12);
    }
}

// ---------------------------------------------------------------------------
// 6. reference scenario α = 0.05, β = 0.07, lag = 1
// ---------------------------------------------------------------------------
#[test]
fn reference_scenario() {
    let model = ChannelModel::new(0.05, 0.07);
    let q = model.rate_matrix().unwrap();
    let row0: Vec<f64> = q.row(0).to_vec();
    for (got, want) in row0.iter().zip([-0.2, 0.2, 0.0, 0.0, 0.0]) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-15);
    }

    let t = model.transition_matrix(1.0).unwrap();
    let eye = Array2::<f64>::eye(5);
    let projected = CoarseGrainer::new(DirectSolver::new())
        .project(&t, eye.view())
        .unwrap();
    for (x, y) in projected.iter().zip(t.as_array().iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
    }
}

// ---------------------------------------------------------------------------
// 7. the singular voltage yields the limiting rate
// ---------------------------------------------------------------------------
#[test]
fn singular_voltage_is_finite() {
    let p = kchannel_params(10.0).unwrap();
    assert!(p.alpha.is_finite());
    assert_abs_diff_eq!(p.alpha, 0.1, epsilon = 1e-15);
    assert!(p.steady_state.is_finite() && p.tau.is_finite());
    assert!(ChannelModel::at_voltage(10.0, &RateConfig::new())
        .unwrap()
        .transition_matrix(1.0)
        .is_ok());
}

#[test]
fn labels_cover_every_row() {
    let labels: Vec<&str> = ChannelState::ALL.iter().map(|s| s.label()).collect();
    assert_eq!(labels, ["C1", "C2", "C3", "C4", "O"]);
}

