//! Matrix command: rate and transition matrices of the channel model.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use kgate_kinetics::{ChannelModel, STATE_LABELS, SingletState};
use kgate_msm::{RateMatrix, TransitionMatrix};

use crate::cli::ModelArgs;
use crate::config::KgateConfig;
use crate::convert;
use crate::output::write_json;

#[derive(Serialize)]
struct MatrixReport {
    alpha: f64,
    beta: f64,
    lag: f64,
    labels: Vec<&'static str>,
    rate_matrix: Vec<Vec<f64>>,
    transition_matrix: Vec<Vec<f64>>,
}

/// Model resolved from config file and flags, plus its matrices.
pub struct BuiltModel {
    pub model: ChannelModel,
    pub lag: f64,
    pub singlet: bool,
    pub rate_matrix: RateMatrix,
    pub transition: TransitionMatrix,
}

impl BuiltModel {
    /// State labels in row order.
    pub fn labels(&self) -> Vec<&'static str> {
        if self.singlet {
            SingletState::ALL.iter().map(|s| s.label()).collect()
        } else {
            STATE_LABELS.to_vec()
        }
    }
}

/// Loads the configuration, applies `args` and builds the model matrices.
pub fn build(args: &ModelArgs) -> Result<(KgateConfig, BuiltModel)> {
    let mut config = KgateConfig::load(args.config.as_deref())?;
    convert::apply_model_overrides(&mut config, args);
    let rate_cfg = convert::build_rate_config(&config.rates)?;
    let model = convert::build_channel_model(&config.model, &rate_cfg)?;
    let lag = config.model.lag;
    let singlet = config.model.singlet;

    let (rate_matrix, transition) = if singlet {
        let q = model.rate_matrix_singlet().context("failed to build singlet generator")?;
        let t = model
            .transition_matrix_singlet(lag)
            .context("failed to exponentiate singlet generator")?;
        (q, t)
    } else {
        let q = model.rate_matrix().context("failed to build generator")?;
        let t = model
            .transition_matrix(lag)
            .context("failed to exponentiate generator")?;
        (q, t)
    };
    info!(
        alpha = model.alpha(),
        beta = model.beta(),
        lag,
        n_states = transition.n_states(),
        "model built"
    );

    let built = BuiltModel {
        model,
        lag,
        singlet,
        rate_matrix,
        transition,
    };
    Ok((config, built))
}

pub fn run(args: ModelArgs) -> Result<()> {
    let _cmd = info_span!("matrix").entered();
    let (_, built) = build(&args)?;

    let report = MatrixReport {
        alpha: built.model.alpha(),
        beta: built.model.beta(),
        lag: built.lag,
        labels: built.labels(),
        rate_matrix: built.rate_matrix.to_rows(),
        transition_matrix: built.transition.to_rows(),
    };
    write_json(&report, args.output.as_deref())
}
