//! weldpredict CLI
//!
//! # Usage
//!
//! ```bash
//! # Serve predictions
//! weldpredict serve --config weldpredict.yaml
//!
//! # Train both models
//! weldpredict train hardness --data data/hardness.csv
//! weldpredict train oxidation --data data/oxidation.csv
//!
//! # Score a saved model
//! weldpredict evaluate hardness --data data/hardness.csv
//!
//! # One-off prediction
//! weldpredict predict --file payload.json
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use weldpredict::config::{
    apply_overrides, load_or_default, AppConfig, Cli, Command, EvaluateArgs, LogFormat,
    PredictArgs, ServeArgs, TrainArgs,
};
use weldpredict::io::load_metadata;
use weldpredict::pipeline::{EstimatorKind, EstimatorSpec, ForestParams, LinearParams};
use weldpredict::registry::{FsArtifactSource, LoadState, ModelPaths};
use weldpredict::server::PredictServer;
use weldpredict::train::{evaluate_artifact, train_target, TrainOptions};
use weldpredict::validate::Payload;
use weldpredict::{ModelRegistry, Predictor};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&cli, &config);

    let result = match cli.command {
        Command::Serve(args) => run_serve(args, config),
        Command::Train(args) => run_train(args, &config, cli.quiet),
        Command::Evaluate(args) => run_evaluate(args, &config, cli.quiet),
        Command::Predict(args) => run_predict(args, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise -q / -v / `logging.level`
fn init_tracing(cli: &Cli, config: &AppConfig) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.logging.format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {e}");
    }
}

fn model_paths(config: &AppConfig, model_dir: Option<&PathBuf>) -> ModelPaths {
    match model_dir {
        Some(dir) => ModelPaths::from_dir(dir),
        None => config.model_paths(),
    }
}

fn run_serve(args: ServeArgs, mut config: AppConfig) -> Result<(), String> {
    apply_overrides(&mut config, &args);
    let server_config = config.server_config().map_err(|e| e.to_string())?;

    let registry = Arc::new(ModelRegistry::new(FsArtifactSource::new(
        config.model_paths(),
    )));
    if config.models.eager_load {
        for status in registry.load_all() {
            if status.state != LoadState::Loaded {
                tracing::warn!(
                    target_model = %status.target,
                    error = status.error.as_deref().unwrap_or("unknown"),
                    "model unavailable at startup"
                );
            }
        }
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {e}"))?;

    let server = PredictServer::new(server_config, registry);
    runtime
        .block_on(server.run())
        .map_err(|e| e.to_string())
}

fn run_train(args: TrainArgs, config: &AppConfig, quiet: bool) -> Result<(), String> {
    let model_dir = args
        .model_dir
        .clone()
        .unwrap_or_else(|| config.models.dir.clone());

    let kind = args
        .estimator
        .unwrap_or_else(|| EstimatorSpec::default_for(args.target).kind());
    let estimator = match kind {
        EstimatorKind::Linear => EstimatorSpec::Linear(LinearParams::default()),
        EstimatorKind::Forest => {
            let defaults = ForestParams::default();
            EstimatorSpec::Forest(ForestParams {
                n_trees: args.trees.unwrap_or(defaults.n_trees),
                seed: args.seed,
                ..defaults
            })
        }
    };

    let options = TrainOptions::new(args.target, &args.data, model_dir)
        .with_estimator(estimator)
        .with_format(args.format)
        .with_test_size(args.test_size)
        .with_seed(args.seed);

    let report = train_target(&options).map_err(|e| e.to_string())?;

    if !quiet {
        println!("\n{} Model Metrics:", args.target.display_name());
        println!("MAE: {:.4}", report.metrics.mae);
        println!("RMSE: {:.4}", report.metrics.rmse);
        println!("R2: {:.4}", report.metrics.r2);
        println!(
            "Trained on {} rows, evaluated on {} ({:.2}s)",
            report.train_rows, report.test_rows, report.elapsed_secs
        );
        println!("Model saved to: {}", report.artifact_path.display());
        println!("Metadata saved to: {}", report.metadata_path.display());
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs, config: &AppConfig, quiet: bool) -> Result<(), String> {
    let paths = model_paths(config, args.model_dir.as_ref());
    let artifact_path = paths.get(args.target);

    let report =
        evaluate_artifact(args.target, artifact_path, &args.data).map_err(|e| e.to_string())?;

    if !quiet {
        println!(
            "\n{} evaluation on {} rows:",
            args.target.display_name(),
            report.rows
        );
        println!("MAE: {:.4}", report.metrics.mae);
        println!("RMSE: {:.4}", report.metrics.rmse);
        println!("R2: {:.4}", report.metrics.r2);

        let metadata_path = artifact_path.with_file_name(args.target.metadata_file_name());
        if let Ok(metadata) = load_metadata(&metadata_path) {
            println!(
                "Trained at {} (held-out R2 {:.4})",
                metadata.trained_at, metadata.metrics.r2
            );
        }
    }
    Ok(())
}

fn run_predict(args: PredictArgs, config: &AppConfig) -> Result<(), String> {
    let text = match (&args.payload, &args.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        (None, None) => return Err("either --payload or --file is required".to_string()),
    };

    let payload = match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => Payload::new(),
        Err(_) => return Err("Invalid JSON".to_string()),
    };

    let paths = model_paths(config, args.model_dir.as_ref());
    let predictor = Predictor::new(Arc::new(ModelRegistry::new(FsArtifactSource::new(paths))));
    let response = predictor.predict_both(&payload);

    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
