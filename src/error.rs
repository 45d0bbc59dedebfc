//! Error types for weldpredict

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Model file does not exist: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Feature mismatch: model expects {expected:?}, got {got:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("Dataset error at row {row}: {message}")]
    Dataset { row: usize, message: String },

    #[error("Training error: {0}")]
    Training(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found_message() {
        let err = Error::ModelNotFound(PathBuf::from("models/hardness_model.json"));
        assert_eq!(
            err.to_string(),
            "Model file does not exist: models/hardness_model.json"
        );
    }

    #[test]
    fn test_dataset_error_message() {
        let err = Error::Dataset {
            row: 3,
            message: "Missing required value for 'Carbon'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Dataset error at row 3: Missing required value for 'Carbon'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
