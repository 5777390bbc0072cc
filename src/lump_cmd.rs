//! Lump command: coarse-grain the five-state chain.

use anyhow::{Context, Result, bail};
use ndarray::{Array1, Array2};
use serde::Serialize;
use tracing::{info, info_span};

use kgate_msm::{
    CoarseGrainer, DirectSolver, PowerSolver, StationarySolver, TransitionMatrix, cluster_weights,
};

use crate::cli::LumpArgs;
use crate::convert;
use crate::matrix_cmd;
use crate::output::write_json;

#[derive(Serialize)]
struct LumpReport {
    alpha: f64,
    beta: f64,
    lag: f64,
    solver: &'static str,
    labels: Vec<&'static str>,
    fine_stationary: Vec<f64>,
    binomial_occupancy: Option<Vec<f64>>,
    membership: Vec<Vec<f64>>,
    cluster_weights: Vec<f64>,
    coarse_matrix: Vec<Vec<f64>>,
    coarse_stationary: Vec<f64>,
}

struct Lumped {
    fine_stationary: Array1<f64>,
    coarse: TransitionMatrix,
    coarse_stationary: Array1<f64>,
}

fn lump_with<S: StationarySolver>(
    grainer: &CoarseGrainer<S>,
    t: &TransitionMatrix,
    chi: &Array2<f64>,
) -> Result<Lumped> {
    let pi = grainer
        .solver()
        .stationary_distribution(t)
        .context("failed to solve fine stationary distribution")?;
    let coarse = grainer
        .project_with_stationary(t, chi.view(), pi.view())
        .context("coarse graining failed")?;
    let coarse = TransitionMatrix::new(coarse).context("coarse matrix is not row-stochastic")?;
    let coarse_pi = grainer
        .solver()
        .stationary_distribution(&coarse)
        .context("failed to solve coarse stationary distribution")?;
    Ok(Lumped {
        fine_stationary: pi,
        coarse,
        coarse_stationary: coarse_pi,
    })
}

pub fn run(args: LumpArgs) -> Result<()> {
    let _cmd = info_span!("lump").entered();
    let (mut config, built) = matrix_cmd::build(&args.model)?;
    if built.singlet {
        bail!("lump operates on the five-state model; drop --singlet");
    }
    if let Some(assignment) = args.assignment {
        config.lump.assignment = Some(assignment);
        config.lump.n_clusters = None;
    }
    let chi = convert::build_membership(&config.lump)?;

    let (solver, lumped) = if args.power {
        let grainer = CoarseGrainer::new(PowerSolver::new());
        ("power", lump_with(&grainer, &built.transition, &chi)?)
    } else {
        let grainer = CoarseGrainer::new(DirectSolver::new());
        ("direct", lump_with(&grainer, &built.transition, &chi)?)
    };
    let weights = cluster_weights(chi.view(), lumped.fine_stationary.view());
    info!(
        solver,
        n_clusters = chi.ncols(),
        weights = ?weights.to_vec(),
        "chain lumped"
    );

    let report = LumpReport {
        alpha: built.model.alpha(),
        beta: built.model.beta(),
        lag: built.lag,
        solver,
        labels: built.labels(),
        fine_stationary: lumped.fine_stationary.to_vec(),
        binomial_occupancy: built.model.binomial_occupancy().map(|p| p.to_vec()),
        membership: chi.rows().into_iter().map(|r| r.to_vec()).collect(),
        cluster_weights: weights.to_vec(),
        coarse_matrix: lumped.coarse.to_rows(),
        coarse_stationary: lumped.coarse_stationary.to_vec(),
    };
    write_json(&report, args.model.output.as_deref())
}
