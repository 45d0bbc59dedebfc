//! End-to-end training tests

use super::*;
use crate::io::{load_artifact, load_metadata, ModelFormat};
use crate::pipeline::{EstimatorKind, EstimatorSpec, ForestParams, Regressor};
use crate::schema::Target;
use crate::testing::{sample_record, synthetic_dataset};
use crate::Error;
use approx::assert_abs_diff_eq;
use std::fmt::Write as _;
use std::path::Path;

/// Write the synthetic dataset for `target` as CSV
fn write_csv(dir: &Path, target: Target, n: usize) -> std::path::PathBuf {
    let (records, labels) = synthetic_dataset(target, n);
    let schema = target.schema();

    let mut out = schema.field_names().join(",");
    write!(out, ",{}", target.label_column()).unwrap();
    out.push('\n');
    for (record, label) in records.iter().zip(labels) {
        let cells: Vec<String> = record
            .iter()
            .map(|(_, v)| match v {
                crate::schema::FeatureValue::Number(x) => x.to_string(),
                crate::schema::FeatureValue::Category(c) => c.clone(),
            })
            .collect();
        writeln!(out, "{},{label}", cells.join(",")).unwrap();
    }

    let path = dir.join(format!("{target}.csv"));
    std::fs::write(&path, out).unwrap();
    path
}

#[test]
fn test_train_hardness_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), Target::Hardness, 40);
    let model_dir = dir.path().join("models");

    let report = train_target(&TrainOptions::new(Target::Hardness, &data, &model_dir)).unwrap();

    assert_eq!(report.train_rows + report.test_rows, 40);
    assert_eq!(report.test_rows, 8);
    assert_eq!(report.artifact_path, model_dir.join("hardness_model.json"));
    // Synthetic hardness is exactly linear
    assert!(report.metrics.r2 > 0.999, "r2 = {}", report.metrics.r2);
    assert!(report.metrics.mae < 1e-2);

    let artifact = load_artifact(&report.artifact_path).unwrap();
    assert_eq!(artifact.metadata.estimator, EstimatorKind::Linear);

    let metadata = load_metadata(model_dir.join("hardness_metadata.json")).unwrap();
    assert_eq!(metadata.model_name, "Hardness Model");
    assert_eq!(metadata.features, artifact.metadata.features);
    assert_eq!(metadata.metrics, report.metrics);
}

#[test]
fn test_train_oxidation_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), Target::Oxidation, 30);

    let options = TrainOptions::new(Target::Oxidation, &data, dir.path())
        .with_format(ModelFormat::Yaml)
        .with_estimator(EstimatorSpec::Forest(ForestParams {
            n_trees: 15,
            ..ForestParams::default()
        }));
    let report = train_target(&options).unwrap();

    assert_eq!(report.artifact_path, dir.path().join("oxidation_model.yaml"));
    let artifact = load_artifact(&report.artifact_path).unwrap();
    assert_eq!(artifact.target(), Target::Oxidation);
    assert!(artifact
        .predict(&sample_record(Target::Oxidation))
        .unwrap()
        .is_finite());

    // The model directory alone is enough to serve and evaluate it
    let registry = crate::registry::ModelRegistry::from_dir(dir.path());
    assert!(registry.ensure_loaded(Target::Oxidation).is_ok());
    let eval = evaluate_artifact(
        Target::Oxidation,
        crate::registry::ModelPaths::from_dir(dir.path()).get(Target::Oxidation),
        &data,
    )
    .unwrap();
    assert_eq!(eval.rows, 30);
}

#[test]
fn test_forest_training_is_deterministic() {
    let (records, labels) = synthetic_dataset(Target::Oxidation, 30);
    let dataset = Dataset {
        target: Target::Oxidation,
        records,
        labels,
    };
    let spec = EstimatorSpec::Forest(ForestParams {
        n_trees: 8,
        ..ForestParams::default()
    });

    let a = fit_and_evaluate(&dataset, &spec, 0.2, 42).unwrap();
    let b = fit_and_evaluate(&dataset, &spec, 0.2, 42).unwrap();
    assert_eq!(a.artifact, b.artifact);
    assert_eq!(a.metrics, b.metrics);
}

#[test]
fn test_train_bad_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("bad.csv");
    std::fs::write(
        &data,
        "Material,Current,Heat_Input,Carbon,Manganese,Hardness\nEN-8,abc,0.8,0.3,0.8,200\n",
    )
    .unwrap();

    let err = train_target(&TrainOptions::new(Target::Hardness, &data, dir.path())).unwrap_err();
    assert!(matches!(err, Error::Dataset { row: 1, .. }));
    assert_eq!(
        err.to_string(),
        "Dataset error at row 1: Field 'Current' must be numeric. Got 'abc'"
    );
    assert!(!dir.path().join("hardness_model.json").exists());
}

#[test]
fn test_train_too_few_rows() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), Target::Hardness, 1);
    let err = train_target(&TrainOptions::new(Target::Hardness, &data, dir.path())).unwrap_err();
    assert!(matches!(err, Error::Training(_)));
}

#[test]
fn test_evaluate_saved_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_csv(dir.path(), Target::Hardness, 40);
    let report = train_target(&TrainOptions::new(Target::Hardness, &data, dir.path())).unwrap();

    let eval = evaluate_artifact(Target::Hardness, &report.artifact_path, &data).unwrap();
    assert_eq!(eval.rows, 40);
    assert_abs_diff_eq!(eval.metrics.r2, 1.0, epsilon = 1e-3);

    // Wrong target for the artifact
    let err = evaluate_artifact(Target::Oxidation, &report.artifact_path, &data).unwrap_err();
    assert!(err.to_string().contains("trained for hardness"));
}
