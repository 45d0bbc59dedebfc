//! Shared fixtures for unit tests

use crate::io::ModelArtifact;
use crate::pipeline::{EstimatorSpec, ForestParams, LinearParams, Pipeline, Regressor};
use crate::registry::{ArtifactSource, SharedModel};
use crate::schema::{FeatureRecord, FeatureValue, Target};
use crate::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn record(target: Target, material: &str, values: [f64; 5]) -> FeatureRecord {
    let [current, heat, soak, carbon, mn] = values;
    let mut r = FeatureRecord::new()
        .with("Material", FeatureValue::Category(material.to_string()))
        .with("Current", FeatureValue::Number(current))
        .with("Heat_Input", FeatureValue::Number(heat));
    if target == Target::Oxidation {
        r.push("Soaking_Time", FeatureValue::Number(soak));
    }
    r.with("Carbon", FeatureValue::Number(carbon))
        .with("Manganese", FeatureValue::Number(mn))
}

/// Deterministic labelled records for a target
pub(crate) fn synthetic_dataset(target: Target, n: usize) -> (Vec<FeatureRecord>, Vec<f64>) {
    let mut records = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let material = if i % 2 == 0 { "EN-8" } else { "Mild Steel" };
        let values = [
            100.0 + (i * 7 % 60) as f64,
            0.5 + (i % 5) as f64 * 0.1,
            5.0 + (i % 6) as f64 * 2.5,
            0.1 + (i % 4) as f64 * 0.09,
            0.5 + (i % 3) as f64 * 0.2,
        ];
        let offset = if material == "Mild Steel" { -10.0 } else { 0.0 };
        let label = match target {
            Target::Hardness => {
                120.0 + 0.5 * values[0] + 30.0 * values[1] + 100.0 * values[3] + 20.0 * values[4]
                    + offset
            }
            Target::Oxidation => 2.0 + 0.01 * values[0] + 0.3 * values[2] + offset / 10.0,
        };
        records.push(record(target, material, values));
        labels.push(label);
    }
    (records, labels)
}

/// A small fitted artifact with the target's default estimator family
pub(crate) fn fitted_artifact(target: Target) -> ModelArtifact {
    let (records, labels) = synthetic_dataset(target, 30);
    let spec = match target {
        Target::Hardness => EstimatorSpec::Linear(LinearParams::default()),
        Target::Oxidation => EstimatorSpec::Forest(ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        }),
    };
    let pipeline = Pipeline::fit(target.schema(), &records, &labels, &spec)
        .expect("fixture pipeline fits");
    ModelArtifact::new(target, pipeline)
}

/// The canonical example input, as a record for `target`
pub(crate) fn sample_record(target: Target) -> FeatureRecord {
    record(target, "EN-8", [140.0, 0.864, 10.0, 0.37, 0.8])
}

/// The canonical example input as a JSON payload
pub(crate) fn sample_payload() -> crate::validate::Payload {
    match serde_json::json!({
        "Material": "EN-8",
        "Current": 140,
        "Heat_Input": 0.864,
        "Soaking_Time": 10,
        "Carbon": 0.37,
        "Manganese": 0.8
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Always predicts the same value
pub(crate) struct ConstantModel(pub f64);

impl Regressor for ConstantModel {
    fn predict(&self, _record: &FeatureRecord) -> crate::Result<f64> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("constant {}", self.0)
    }
}

/// Fails every prediction
pub(crate) struct FailingModel;

impl Regressor for FailingModel {
    fn predict(&self, _record: &FeatureRecord) -> crate::Result<f64> {
        Err(Error::Prediction("matrix exploded".to_string()))
    }
}

/// Panics on every prediction
pub(crate) struct PanickingModel;

impl Regressor for PanickingModel {
    fn predict(&self, _record: &FeatureRecord) -> crate::Result<f64> {
        panic!("estimator panicked")
    }
}

/// In-memory artifact source; clones share state
#[derive(Clone, Default)]
pub(crate) struct MockSource {
    models: Arc<Mutex<HashMap<Target, SharedModel>>>,
    loads: Arc<AtomicUsize>,
}

impl MockSource {
    pub(crate) fn with(self, target: Target, model: impl Regressor + 'static) -> Self {
        self.set(target, model);
        self
    }

    pub(crate) fn set(&self, target: Target, model: impl Regressor + 'static) {
        self.models.lock().unwrap().insert(target, Arc::new(model));
    }

    pub(crate) fn remove(&self, target: Target) {
        self.models.lock().unwrap().remove(&target);
    }

    /// Number of load attempts so far
    pub(crate) fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ArtifactSource for MockSource {
    fn load(&self, target: Target) -> crate::Result<SharedModel> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.models
            .lock()
            .unwrap()
            .get(&target)
            .cloned()
            .ok_or_else(|| Error::ModelNotFound(PathBuf::from(self.location(target))))
    }

    fn location(&self, target: Target) -> String {
        format!("mock/{}", target.artifact_file_name())
    }
}
