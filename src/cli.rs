use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "guardband",
    about = "Guard-band QBER / throughput evaluation for Gaussian-modulated CVQKD",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct GuardbandCli {
    /// Global: path to config (TOML); default: ~/.guardband/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: debug logging to stderr (same as GUARDBAND_DEBUG=1)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

/// Channel description shared by the single-point commands.
#[derive(Debug, Clone, Copy, Args)]
pub struct ChannelArgs {
    /// Source standard deviation
    #[arg(long = "sigma-x", value_name = "F", default_value_t = 1.0)]
    pub sigma_x: f64,
    /// Additive noise standard deviation
    #[arg(long = "sigma-noise", value_name = "F", default_value_t = 0.25)]
    pub sigma_noise: f64,
    /// Source mean, also the decision threshold
    #[arg(long = "mu-x", value_name = "F", default_value_t = 0.0, allow_hyphen_values = true)]
    pub mu_x: f64,
    /// Guard-band half-width
    #[arg(long = "beta", value_name = "F", default_value_t = 0.3)]
    pub beta: f64,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analytic gamma (QBER) and tau (1 - throughput) by 2-D quadrature
    ///
    /// Examples:
    ///   guardband evaluate --sigma-noise 0.25 --beta 0.3
    ///   guardband evaluate --beta 0.1 --json
    Evaluate {
        #[command(flatten)]
        channel: ChannelArgs,
        /// Print JSON instead of a table
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Cross-check the quadrature against Monte-Carlo sampling
    Compare {
        #[command(flatten)]
        channel: ChannelArgs,
        /// Monte-Carlo sample count (default from config)
        #[arg(long = "samples", value_name = "N")]
        samples: Option<u64>,
        /// Root seed for the sampler (default from config)
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
        /// Print JSON instead of a table
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Sweep beta (or the beta x sigma_noise grid) from the config's sweep section
    Sweep {
        /// Sweep the 2-D beta x sigma_noise grid instead of beta alone
        #[arg(long = "grid", action = ArgAction::SetTrue)]
        grid: bool,
        /// Fixed noise level for the 1-D sweep (default: first grid point)
        #[arg(long = "sigma-noise", value_name = "F")]
        sigma_noise: Option<f64>,
        /// Output file; prints to stdout when absent and config has none
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Find the guard band that meets a target BER at a given noise level
    Band {
        /// Noise standard deviation
        #[arg(value_name = "NOISE")]
        noise: f64,
        /// Target bit error rate (fraction, e.g. 0.02)
        #[arg(value_name = "BER")]
        ber: f64,
        #[arg(long = "sigma-x", value_name = "F", default_value_t = 1.0)]
        sigma_x: f64,
        /// Upper end of the beta search range
        #[arg(long = "beta-max", value_name = "F", default_value_t = 5.0)]
        beta_max: f64,
    },

    /// Write simulated (x, bit, y) samples as CSV for external post-processing
    Generate {
        /// Noise standard deviation
        #[arg(value_name = "NOISE")]
        noise: f64,
        #[arg(long = "sigma-x", value_name = "F", default_value_t = 1.0)]
        sigma_x: f64,
        #[arg(long = "mu-x", value_name = "F", default_value_t = 0.0, allow_hyphen_values = true)]
        mu_x: f64,
        #[arg(long = "samples", value_name = "N", default_value_t = 1_000_000)]
        samples: u64,
        #[arg(long = "seed", value_name = "N")]
        seed: Option<u64>,
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}
