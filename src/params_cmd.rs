//! Params command: rate parameters at one voltage.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span};

use kgate_kinetics::{RateParams, kchannel_params_with};

use crate::cli::ParamsArgs;
use crate::config::KgateConfig;
use crate::convert;
use crate::output::write_json;

#[derive(Serialize)]
struct ParamsReport {
    voltage: f64,
    #[serde(flatten)]
    params: RateParams,
}

pub fn run(args: ParamsArgs) -> Result<()> {
    let _cmd = info_span!("params").entered();
    let config = KgateConfig::load(args.config.as_deref())?;
    let rate_cfg = convert::build_rate_config(&config.rates)?;

    let params = kchannel_params_with(args.voltage, &rate_cfg)
        .with_context(|| format!("failed to evaluate rates at {} mV", args.voltage))?;
    info!(voltage = args.voltage, alpha = params.alpha, beta = params.beta, "rates evaluated");

    let report = ParamsReport {
        voltage: args.voltage,
        params,
    };
    write_json(&report, args.output.as_deref())
}
