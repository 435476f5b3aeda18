//! Handedness CLI
//!
//! Plots and summarizes the prior, likelihood, posterior and predictive
//! distributions of left-handedness in a finite population.
//!
//! # Commands
//!
//! - `plot`: write the 2×3 figure as SVG
//! - `summary`: print parameter and distribution tables
//! - `export`: write the laid-out grid as JSON
//! - `interactive`: line-oriented controls that recompute on every change

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use handedness_models::{
    DEFAULT_POPULATION, DEFAULT_RESOLUTION, EngineOptions, MAX_POPULATION, ParameterRequest,
};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod error;
mod interactive;

use error::CliExitCode;

/// Bayesian handedness explorer
#[derive(Parser)]
#[command(name = "handedness")]
#[command(version)]
#[command(about = "Explore the distribution of handedness in a finite population")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// The five controls of the input surface plus grid resolution.
#[derive(Debug, Clone, Args)]
pub struct ParameterArgs {
    /// Prior shape for left-handed people
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,
    /// Prior shape for right-handed people
    #[arg(long, default_value_t = 1.0)]
    pub beta: f64,
    /// Observed left-handed count
    #[arg(long, default_value_t = 0)]
    pub left: u64,
    /// Observed right-handed count
    #[arg(long, default_value_t = 0)]
    pub right: u64,
    /// Total population size (raised to the observed total if smaller, at most 1000000)
    #[arg(long, default_value_t = DEFAULT_POPULATION, value_parser = clap::value_parser!(u64).range(1..=MAX_POPULATION))]
    pub population: u64,
    /// Grid points for the Beta curves
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: usize,
}

impl ParameterArgs {
    pub const fn request(&self) -> ParameterRequest {
        ParameterRequest {
            alpha: self.alpha,
            beta: self.beta,
            left_count: self.left,
            right_count: self.right,
            requested_population: self.population,
        }
    }

    pub const fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            resolution: self.resolution,
        }
    }
}

/// Figure geometry and colour.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,
    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
    /// Curve and bar colour as #rrggbb
    #[arg(long, default_value = "#36acc6")]
    pub color: String,
}

/// Table formatting.
#[derive(Debug, Clone, Args)]
pub struct SummaryArgs {
    /// Probability mass inside the reported intervals
    #[arg(long, default_value_t = 0.95)]
    pub credible_mass: f64,
    /// Decimal places in tables
    #[arg(long, default_value_t = 3)]
    pub precision: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the 2x3 distribution figure as SVG
    Plot {
        #[command(flatten)]
        params: ParameterArgs,
        #[command(flatten)]
        render: RenderArgs,
        /// Output path
        #[arg(short, long, default_value = "handedness.svg")]
        output: PathBuf,
    },
    /// Print parameter and distribution summary tables
    Summary {
        #[command(flatten)]
        params: ParameterArgs,
        #[command(flatten)]
        summary: SummaryArgs,
    },
    /// Write the laid-out chart grid as JSON
    Export {
        #[command(flatten)]
        params: ParameterArgs,
        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Read `name=value` controls from stdin and recompute on every change
    Interactive {
        #[command(flatten)]
        params: ParameterArgs,
        #[command(flatten)]
        render: RenderArgs,
        #[command(flatten)]
        summary: SummaryArgs,
        /// Rewrite this SVG after every successful update
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Plot {
            params,
            render,
            output,
        } => commands::plot(&params, &render, &output),
        Commands::Summary { params, summary } => commands::summary(&params, &summary),
        Commands::Export {
            params,
            output,
            pretty,
        } => commands::export(&params, output.as_deref(), pretty),
        Commands::Interactive {
            params,
            render,
            summary,
            output,
        } => commands::interactive(&params, &render, &summary, output.as_deref()),
    };

    match result {
        Ok(()) => CliExitCode::Success.into(),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            CliExitCode::from(&err).into()
        }
    }
}
