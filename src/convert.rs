//! Pure conversion functions: TOML config structs and CLI overrides -> crate API types.

use anyhow::{Context, Result, bail};
use ndarray::Array2;

use kgate_kinetics::{ChannelModel, ChannelState, RateConfig, SingletState, SingularityPolicy};
use kgate_msm::crisp_membership;

use crate::cli::ModelArgs;
use crate::config::{KgateConfig, LumpToml, ModelToml, RatesToml};

/// Parses a singularity policy name into the corresponding enum variant.
pub fn parse_policy(s: &str) -> Result<SingularityPolicy> {
    match s.to_lowercase().as_str() {
        "limit" => Ok(SingularityPolicy::Limit),
        "reject" => Ok(SingularityPolicy::Reject),
        other => bail!("unknown singularity policy: {other:?}"),
    }
}

/// Builds and validates a [`RateConfig`] from its TOML section.
pub fn build_rate_config(rates: &RatesToml) -> Result<RateConfig> {
    let cfg = RateConfig::new()
        .with_guard_band(rates.guard_band)
        .with_policy(parse_policy(&rates.policy)?);
    cfg.validate().context("invalid [rates] section")?;
    Ok(cfg)
}

/// Applies command-line model flags on top of the file configuration.
///
/// A voltage on the command line replaces explicit rates from the file and
/// vice versa.
pub fn apply_model_overrides(config: &mut KgateConfig, args: &ModelArgs) {
    let model = &mut config.model;
    if let Some(v) = args.voltage {
        model.voltage = Some(v);
        model.alpha = None;
        model.beta = None;
    }
    if let (Some(a), Some(b)) = (args.alpha, args.beta) {
        model.alpha = Some(a);
        model.beta = Some(b);
        model.voltage = None;
    }
    if let Some(lag) = args.lag {
        model.lag = lag;
    }
    if args.singlet {
        model.singlet = true;
    }
}

/// Resolves the `[model]` section into a [`ChannelModel`].
pub fn build_channel_model(model: &ModelToml, rates: &RateConfig) -> Result<ChannelModel> {
    match (model.voltage, model.alpha, model.beta) {
        (None, Some(alpha), Some(beta)) => Ok(ChannelModel::new(alpha, beta)),
        (Some(v), None, None) => ChannelModel::at_voltage(v, rates)
            .with_context(|| format!("failed to evaluate rates at {v} mV")),
        (Some(_), _, _) => bail!("set either [model].voltage or alpha/beta, not both"),
        (None, Some(_), None) | (None, None, Some(_)) => {
            bail!("[model].alpha and [model].beta must be set together")
        }
        (None, None, None) => {
            bail!("no model rates: set [model].voltage or alpha/beta, or pass --voltage")
        }
    }
}

/// Builds the membership matrix for the five-state chain.
///
/// Without an assignment the four closed states form cluster 0 and the open
/// state cluster 1.
pub fn build_membership(lump: &LumpToml) -> Result<Array2<f64>> {
    let Some(assignment) = &lump.assignment else {
        return Ok(ChannelModel::open_cluster_membership());
    };
    if assignment.len() != ChannelState::COUNT {
        bail!(
            "assignment has {} entries, expected one per state ({})",
            assignment.len(),
            ChannelState::COUNT
        );
    }
    let n_clusters = match lump.n_clusters {
        Some(n) => n,
        None => assignment.iter().max().map_or(0, |&m| m + 1),
    };
    crisp_membership(assignment, n_clusters).context("invalid [lump] assignment")
}

/// Parses an initial state label into a state index.
pub fn parse_initial(label: &str, singlet: bool) -> Result<usize> {
    let index = if singlet {
        label.parse::<SingletState>()?.as_index()
    } else {
        label.parse::<ChannelState>()?.as_index()
    };
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn model_args() -> ModelArgs {
        ModelArgs {
            config: None::<PathBuf>,
            voltage: None,
            alpha: None,
            beta: None,
            lag: None,
            singlet: false,
            output: None,
        }
    }

    #[test]
    fn policy_names() {
        assert_eq!(parse_policy("Limit").unwrap(), SingularityPolicy::Limit);
        assert_eq!(parse_policy("reject").unwrap(), SingularityPolicy::Reject);
        assert!(parse_policy("clamp").is_err());
    }

    #[test]
    fn rate_config_is_validated() {
        let rates = RatesToml {
            guard_band: -1.0,
            policy: "limit".to_string(),
        };
        assert!(build_rate_config(&rates).is_err());
        assert!(build_rate_config(&RatesToml::default()).is_ok());
    }

    #[test]
    fn voltage_override_replaces_file_rates() {
        let mut cfg = KgateConfig::default();
        cfg.model.alpha = Some(0.1);
        cfg.model.beta = Some(0.2);
        let args = ModelArgs {
            voltage: Some(-30.0),
            lag: Some(2.0),
            ..model_args()
        };
        apply_model_overrides(&mut cfg, &args);
        assert_eq!(cfg.model.voltage, Some(-30.0));
        assert!(cfg.model.alpha.is_none() && cfg.model.beta.is_none());
        assert_eq!(cfg.model.lag, 2.0);
    }

    #[test]
    fn explicit_rates() {
        let model = ModelToml {
            alpha: Some(0.05),
            beta: Some(0.07),
            ..ModelToml::default()
        };
        let m = build_channel_model(&model, &RateConfig::new()).unwrap();
        assert_eq!((m.alpha(), m.beta()), (0.05, 0.07));
    }

    #[test]
    fn incomplete_model_is_rejected() {
        let rates = RateConfig::new();
        assert!(build_channel_model(&ModelToml::default(), &rates).is_err());
        let half = ModelToml {
            alpha: Some(0.05),
            ..ModelToml::default()
        };
        assert!(build_channel_model(&half, &rates).is_err());
        let both = ModelToml {
            voltage: Some(0.0),
            alpha: Some(0.05),
            beta: Some(0.07),
            ..ModelToml::default()
        };
        assert!(build_channel_model(&both, &rates).is_err());
    }

    #[test]
    fn default_membership_is_closed_open() {
        let chi = build_membership(&LumpToml::default()).unwrap();
        assert_eq!(chi, ChannelModel::open_cluster_membership());
    }

    #[test]
    fn membership_infers_cluster_count() {
        let lump = LumpToml {
            assignment: Some(vec![0, 0, 1, 1, 2]),
            n_clusters: None,
        };
        assert_eq!(build_membership(&lump).unwrap().dim(), (5, 3));
    }

    #[test]
    fn membership_length_is_checked() {
        let lump = LumpToml {
            assignment: Some(vec![0, 1]),
            n_clusters: None,
        };
        assert!(build_membership(&lump).is_err());
    }

    #[test]
    fn initial_labels() {
        assert_eq!(parse_initial("O", false).unwrap(), 4);
        assert_eq!(parse_initial("open", true).unwrap(), 1);
        assert!(parse_initial("open", false).is_err());
    }
}
