//! Regression pipelines
//!
//! A [`Pipeline`] is the body of a model artifact: a one-hot encoder for the
//! categorical column, a standard scaler for the numeric columns and a fitted
//! estimator. The transformed vector is the encoded category columns followed
//! by the scaled numeric columns in schema order.
//!
//! Pipelines are order-sensitive. [`Pipeline::predict_record`] rejects records
//! whose field names or order differ from the feature list seen at fit time.

mod encoder;
mod forest;
mod linear;
mod scaler;

pub use encoder::OneHotEncoder;
pub use forest::{ForestParams, Node, RandomForest, RegressionTree};
pub use linear::{LinearParams, LinearRegression};
pub use scaler::StandardScaler;

use crate::schema::{FeatureRecord, FeatureValue, Schema, Target};
use crate::{Error, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anything that maps one ordered feature record to one number
pub trait Regressor: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<f64>;

    /// Short description for logs and status reports
    fn describe(&self) -> String {
        "regressor".to_string()
    }
}

/// Estimator family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    Linear,
    Forest,
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimatorKind::Linear => write!(f, "linear"),
            EstimatorKind::Forest => write!(f, "forest"),
        }
    }
}

impl std::str::FromStr for EstimatorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(EstimatorKind::Linear),
            "forest" | "random_forest" | "rf" => Ok(EstimatorKind::Forest),
            _ => Err(format!(
                "Unknown estimator: {s}. Valid estimators: linear, forest"
            )),
        }
    }
}

/// Estimator choice plus hyperparameters, used at fit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    Linear(LinearParams),
    Forest(ForestParams),
}

impl EstimatorSpec {
    /// Linear regression for hardness, random forest for oxidation
    pub fn default_for(target: Target) -> Self {
        match target {
            Target::Hardness => EstimatorSpec::Linear(LinearParams::default()),
            Target::Oxidation => EstimatorSpec::Forest(ForestParams::default()),
        }
    }

    pub fn kind(&self) -> EstimatorKind {
        match self {
            EstimatorSpec::Linear(_) => EstimatorKind::Linear,
            EstimatorSpec::Forest(_) => EstimatorKind::Forest,
        }
    }
}

/// Fitted estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearRegression),
    Forest(RandomForest),
}

impl Estimator {
    pub fn kind(&self) -> EstimatorKind {
        match self {
            Estimator::Linear(_) => EstimatorKind::Linear,
            Estimator::Forest(_) => EstimatorKind::Forest,
        }
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        match self {
            Estimator::Linear(m) => m.predict(x),
            Estimator::Forest(m) => m.predict(x),
        }
    }
}

/// Preprocessing plus estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Feature names in the order records must present them
    pub features: Vec<String>,
    pub encoder: OneHotEncoder,
    pub scaler: StandardScaler,
    pub estimator: Estimator,
}

impl Pipeline {
    /// Fit preprocessing and estimator on validated records
    pub fn fit(
        schema: &Schema,
        records: &[FeatureRecord],
        labels: &[f64],
        spec: &EstimatorSpec,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::Training("no training records".to_string()));
        }
        if records.len() != labels.len() {
            return Err(Error::Training(format!(
                "{} records but {} labels",
                records.len(),
                labels.len()
            )));
        }

        let features: Vec<String> = schema.field_names().into_iter().map(String::from).collect();
        for record in records {
            ensure_order(&features, record)?;
        }

        let category_column = schema
            .categorical_fields()
            .next()
            .ok_or_else(|| Error::Training("schema has no categorical field".to_string()))?;
        let numeric_columns: Vec<String> = schema.numeric_fields().map(String::from).collect();

        let categories = records
            .iter()
            .map(|r| category_of(r, category_column))
            .collect::<Result<Vec<_>>>()?;
        let encoder = OneHotEncoder::fit(category_column, categories);

        let numeric_rows = records
            .iter()
            .map(|r| numerics_of(r, &numeric_columns))
            .collect::<Result<Vec<_>>>()?;
        let scaler = StandardScaler::fit(numeric_columns, &numeric_rows);

        let rows = records
            .iter()
            .map(|r| encode(&features, &encoder, &scaler, r))
            .collect::<Result<Vec<_>>>()?;

        let estimator = match spec {
            EstimatorSpec::Linear(params) => {
                let width = encoder.width() + scaler.width();
                let flat: Vec<f64> = rows.into_iter().flatten().collect();
                let x = Array2::from_shape_vec((records.len(), width), flat)
                    .map_err(|e| Error::Training(format!("design matrix: {e}")))?;
                let y = Array1::from(labels.to_vec());
                Estimator::Linear(LinearRegression::fit(&x, &y, params)?)
            }
            EstimatorSpec::Forest(params) => {
                Estimator::Forest(RandomForest::fit(&rows, labels, params)?)
            }
        };

        Ok(Self {
            features,
            encoder,
            scaler,
            estimator,
        })
    }

    /// Width of the transformed vector
    pub fn width(&self) -> usize {
        self.encoder.width() + self.scaler.width()
    }

    /// Encode and scale a record
    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        encode(&self.features, &self.encoder, &self.scaler, record)
    }

    /// Predict one record
    pub fn predict_record(&self, record: &FeatureRecord) -> Result<f64> {
        let x = self.transform(record)?;
        let value = self.estimator.predict(&x)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::Prediction(format!("estimator produced {value}")))
        }
    }
}

impl Regressor for Pipeline {
    fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        self.predict_record(record)
    }

    fn describe(&self) -> String {
        format!("{} pipeline over {} features", self.estimator.kind(), self.features.len())
    }
}

fn encode(
    features: &[String],
    encoder: &OneHotEncoder,
    scaler: &StandardScaler,
    record: &FeatureRecord,
) -> Result<Vec<f64>> {
    ensure_order(features, record)?;

    let mut out = Vec::with_capacity(encoder.width() + scaler.width());
    encoder.transform_into(category_of(record, &encoder.column)?, &mut out);
    scaler.transform_into(&numerics_of(record, &scaler.columns)?, &mut out);
    Ok(out)
}

fn ensure_order(features: &[String], record: &FeatureRecord) -> Result<()> {
    if record.matches_order(features) {
        Ok(())
    } else {
        Err(Error::FeatureMismatch {
            expected: features.to_vec(),
            got: record.names().map(String::from).collect(),
        })
    }
}

fn category_of<'a>(record: &'a FeatureRecord, column: &str) -> Result<&'a str> {
    match record.get(column) {
        Some(FeatureValue::Category(c)) => Ok(c),
        Some(FeatureValue::Number(_)) => Err(Error::Prediction(format!(
            "expected a category for '{column}', got a number"
        ))),
        None => Err(Error::Prediction(format!("record has no '{column}' field"))),
    }
}

fn numerics_of(record: &FeatureRecord, columns: &[String]) -> Result<Vec<f64>> {
    columns
        .iter()
        .map(|column| match record.get(column) {
            Some(FeatureValue::Number(v)) => Ok(*v),
            Some(FeatureValue::Category(_)) => Err(Error::Prediction(format!(
                "expected a number for '{column}', got a category"
            ))),
            None => Err(Error::Prediction(format!("record has no '{column}' field"))),
        })
        .collect()
}
