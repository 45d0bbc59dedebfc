//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! weldpredict serve --config weldpredict.yaml --port 8080
//! weldpredict train hardness --data data/hardness.csv
//! weldpredict train oxidation --data data/oxidation.csv --estimator forest --trees 200
//! weldpredict evaluate hardness --data data/hardness.csv
//! weldpredict predict --payload '{"Material": "EN-8", "Current": 140, ...}'
//! ```

use crate::io::ModelFormat;
use crate::pipeline::EstimatorKind;
use crate::schema::Target;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Weld hardness and oxidation-rate prediction
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "weldpredict")]
#[command(version)]
#[command(about = "Hardness and oxidation-rate regression for welded materials")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "WELDPREDICT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the HTTP prediction server
    Serve(ServeArgs),

    /// Train a model from a CSV dataset
    Train(TrainArgs),

    /// Score a saved model against a CSV dataset
    Evaluate(EvaluateArgs),

    /// Predict both targets for one JSON payload
    Predict(PredictArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug, Clone, PartialEq, Default)]
pub struct ServeArgs {
    /// Override bind address
    #[arg(long)]
    pub bind: Option<String>,

    /// Override port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override model directory
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,

    /// Load both models at startup
    #[arg(long)]
    pub eager: bool,
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Target to train (hardness or oxidation)
    #[arg(value_name = "TARGET")]
    pub target: Target,

    /// CSV dataset with a header row
    #[arg(short, long)]
    pub data: PathBuf,

    /// Output directory for the artifact and metadata
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,

    /// Estimator (linear or forest); defaults per target
    #[arg(short, long)]
    pub estimator: Option<EstimatorKind>,

    /// Artifact format (json or yaml)
    #[arg(short, long, default_value = "json")]
    pub format: ModelFormat,

    /// Random seed for the split and the forest
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Number of trees for the forest estimator
    #[arg(long)]
    pub trees: Option<usize>,
}

/// Arguments for the evaluate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct EvaluateArgs {
    /// Target to evaluate (hardness or oxidation)
    #[arg(value_name = "TARGET")]
    pub target: Target,

    /// CSV dataset with a header row
    #[arg(short, long)]
    pub data: PathBuf,

    /// Directory holding the artifact
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,
}

/// Arguments for the predict command
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(group(ArgGroup::new("input").required(true).args(["payload", "file"])))]
pub struct PredictArgs {
    /// Inline JSON payload
    #[arg(long)]
    pub payload: Option<String>,

    /// File containing a JSON payload
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Directory holding the artifacts
    #[arg(short, long)]
    pub model_dir: Option<PathBuf>,
}

/// Parse command-line arguments
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
