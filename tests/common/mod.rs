//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use weldpredict::train::{train_target, TrainOptions, TrainReport};
use weldpredict::Target;

pub const EXAMPLE_PAYLOAD: &str = r#"{"Material":"EN-8","Current":140,"Heat_Input":0.864,"Soaking_Time":10,"Carbon":0.37,"Manganese":0.8}"#;

/// Deterministic process parameters for row `i`
fn row(i: usize) -> (&'static str, f64, f64, f64, f64, f64) {
    let material = if i % 2 == 0 { "EN-8" } else { "Mild Steel" };
    let current = 100.0 + (i % 9) as f64 * 10.0;
    let heat_input = 0.5 + (i % 7) as f64 * 0.1;
    let soaking = 5.0 + (i % 5) as f64 * 5.0;
    let carbon = 0.15 + (i % 4) as f64 * 0.08;
    let manganese = 0.6 + (i % 3) as f64 * 0.2;
    (material, current, heat_input, soaking, carbon, manganese)
}

/// Hardness is exactly linear in the encoded features, scaled by `gain`
pub fn hardness_label(material: &str, current: f64, heat: f64, carbon: f64, mn: f64, gain: f64) -> f64 {
    let offset = if material == "EN-8" { 15.0 } else { 0.0 };
    gain * (100.0 + 0.5 * current + 20.0 * heat + 50.0 * carbon + 10.0 * mn + offset)
}

fn oxidation_label(material: &str, current: f64, heat: f64, soaking: f64) -> f64 {
    let offset = if material == "EN-8" { 0.5 } else { 1.5 };
    0.01 * current + 2.0 * heat + 0.1 * soaking + offset
}

/// Write an `n`-row CSV for `target` into `dir`
pub fn write_dataset(dir: &Path, target: Target, n: usize, gain: f64) -> PathBuf {
    let mut out = String::new();
    match target {
        Target::Hardness => {
            out.push_str("Material,Current,Heat_Input,Carbon,Manganese,Hardness\n");
            for i in 0..n {
                let (m, c, h, _, cb, mn) = row(i);
                let y = hardness_label(m, c, h, cb, mn, gain);
                writeln!(out, "{m},{c},{h},{cb},{mn},{y}").unwrap();
            }
        }
        Target::Oxidation => {
            out.push_str("Material,Current,Heat_Input,Soaking_Time,Carbon,Manganese,Oxidation_Rate\n");
            for i in 0..n {
                let (m, c, h, s, cb, mn) = row(i);
                let y = gain * oxidation_label(m, c, h, s);
                writeln!(out, "{m},{c},{h},{s},{cb},{mn},{y}").unwrap();
            }
        }
    }

    let path = dir.join(format!("{target}.csv"));
    std::fs::write(&path, out).unwrap();
    path
}

/// Train both targets with default estimators into `model_dir`
pub fn train_both(data_dir: &Path, model_dir: &Path, gain: f64) -> (TrainReport, TrainReport) {
    let hardness = write_dataset(data_dir, Target::Hardness, 60, gain);
    let oxidation = write_dataset(data_dir, Target::Oxidation, 60, gain);
    (
        train_target(&TrainOptions::new(Target::Hardness, hardness, model_dir)).unwrap(),
        train_target(&TrainOptions::new(Target::Oxidation, oxidation, model_dir)).unwrap(),
    )
}
