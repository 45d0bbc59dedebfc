//! Configuration file and command line
//!
//! # Example
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0
//!   port: 5001
//!   cors_enabled: true
//!   reload_endpoint: true
//!
//! models:
//!   dir: models
//!   eager_load: false
//!
//! logging:
//!   level: info
//!   format: text
//! ```
//!
//! Command-line flags override file values; `RUST_LOG` overrides
//! `logging.level`.

mod cli;
mod load;
mod schema;



pub use cli::{parse_args, Cli, Command, EvaluateArgs, PredictArgs, ServeArgs, TrainArgs};
pub use load::{apply_overrides, load_config, load_or_default, parse_config, validate_config};
pub use schema::{AppConfig, LogFormat, LoggingSection, ModelsSection, ServerSection};
