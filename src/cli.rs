use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kgate potassium channel kinetics toolkit.
#[derive(Parser)]
#[command(
    name = "kgate",
    version,
    about = "Markov models of voltage-gated potassium channel kinetics"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the gating rate parameters at one voltage.
    Params(ParamsArgs),
    /// Print the rate and transition matrices of the channel model.
    Matrix(ModelArgs),
    /// Lump the five-state chain and print the coarse matrix.
    Lump(LumpArgs),
    /// Sample a state trajectory from the transition matrix.
    Simulate(SimulateArgs),
}

/// Arguments for the `params` subcommand.
#[derive(clap::Args)]
pub struct ParamsArgs {
    /// Membrane voltage (mV).
    #[arg(long, allow_hyphen_values = true)]
    pub voltage: f64,

    /// Path to TOML configuration file (only `[rates]` is read).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Model selection shared by the matrix-producing subcommands.
#[derive(clap::Args)]
pub struct ModelArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Membrane voltage (mV); overrides `[model]` rates from the config.
    #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["alpha", "beta"])]
    pub voltage: Option<f64>,

    /// Explicit forward rate (ms⁻¹).
    #[arg(long, requires = "beta")]
    pub alpha: Option<f64>,

    /// Explicit backward rate (ms⁻¹).
    #[arg(long, requires = "alpha")]
    pub beta: Option<f64>,

    /// Lag time (ms).
    #[arg(long)]
    pub lag: Option<f64>,

    /// Use the single-subunit model.
    #[arg(long)]
    pub singlet: bool,

    /// Write JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `lump` subcommand.
#[derive(clap::Args)]
pub struct LumpArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Cluster index for each fine state, e.g. `0,0,0,0,1`.
    #[arg(long, value_delimiter = ',')]
    pub assignment: Option<Vec<usize>>,

    /// Use power iteration instead of the direct stationary solve.
    #[arg(long)]
    pub power: bool,
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of lag steps to sample.
    #[arg(short = 'n', long)]
    pub steps: Option<usize>,

    /// Initial state label (`C1`..`O`, or `closed`/`open` for the singlet).
    #[arg(long)]
    pub initial: Option<String>,

    /// Override RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
