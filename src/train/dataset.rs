//! CSV training datasets
//!
//! Cells are validated with the same rules as request payloads, so a dataset
//! row that would be rejected over HTTP is rejected here too.

use crate::schema::{FeatureRecord, Target};
use crate::validate::{validate, validate_numeric, Payload};
use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Validated feature records with their labels
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub target: Target,
    pub records: Vec<FeatureRecord>,
    pub labels: Vec<f64>,
}

impl Dataset {
    /// Load a CSV file with a header row
    ///
    /// Row numbers in errors count data rows from 1; row 0 is the file or its
    /// header.
    pub fn from_csv_path(target: Target, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Dataset {
            row: 0,
            message: format!("cannot open {}: {e}", path.display()),
        })?;
        Self::from_reader(target, file)
    }

    pub fn from_reader<R: Read>(target: Target, reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let headers = csv.headers()?.clone();

        let schema = target.schema();
        let label = target.label_column();
        for column in schema.field_names().into_iter().chain([label]) {
            if !headers.iter().any(|h| h == column) {
                return Err(Error::Dataset {
                    row: 0,
                    message: format!("missing column '{column}'"),
                });
            }
        }

        let mut records = Vec::new();
        let mut labels = Vec::new();
        for (i, row) in csv.records().enumerate() {
            let row_number = i + 1;
            let row = row?;

            let payload: Payload = headers
                .iter()
                .zip(row.iter())
                .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
                .collect();

            let record = validate(schema, &payload).map_err(|e| Error::Dataset {
                row: row_number,
                message: e.to_string(),
            })?;
            let value = validate_numeric(label, payload.get(label)).map_err(|e| Error::Dataset {
                row: row_number,
                message: e.to_string(),
            })?;

            records.push(record);
            labels.push(value);
        }

        if records.is_empty() {
            return Err(Error::Dataset {
                row: 0,
                message: "no data rows".to_string(),
            });
        }

        Ok(Self {
            target,
            records,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows at `indices`, in that order
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            target: self.target,
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FeatureValue;

    const HARDNESS_CSV: &str = "\
Material,Current,Heat_Input,Carbon,Manganese,Hardness
EN-8,140,0.864,0.37,0.8,210.5
Mild Steel, 120 ,0.7,0.2,0.9,180
";

    #[test]
    fn test_load_hardness_csv() {
        let dataset = Dataset::from_reader(Target::Hardness, HARDNESS_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels, vec![210.5, 180.0]);
        assert_eq!(
            dataset.records[1].get("Current"),
            Some(&FeatureValue::Number(120.0))
        );
        assert_eq!(
            dataset.records[0].names().collect::<Vec<_>>(),
            vec!["Material", "Current", "Heat_Input", "Carbon", "Manganese"]
        );
    }

    #[test]
    fn test_column_order_in_file_does_not_matter() {
        let csv = "Hardness,Manganese,Carbon,Heat_Input,Current,Material,Notes\n\
                   200,0.8,0.3,0.9,130,EN-8,first run\n";
        let dataset = Dataset::from_reader(Target::Hardness, csv.as_bytes()).unwrap();
        assert!(dataset.records[0].matches_order(&Target::Hardness.schema().field_names()));
    }

    #[test]
    fn test_missing_column() {
        let err = Dataset::from_reader(Target::Oxidation, HARDNESS_CSV.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dataset error at row 0: missing column 'Soaking_Time'"
        );
    }

    #[test]
    fn test_invalid_row_reports_row_number() {
        let csv = format!("{HARDNESS_CSV}Titanium,140,0.8,0.3,0.8,200\n");
        let err = Dataset::from_reader(Target::Hardness, csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dataset error at row 3: Invalid material 'Titanium'. Must be one of: ['EN-8', 'Mild Steel']"
        );
    }

    #[test]
    fn test_missing_label() {
        let csv = "Material,Current,Heat_Input,Carbon,Manganese,Hardness\nEN-8,140,0.8,0.3,0.8,\n";
        let err = Dataset::from_reader(Target::Hardness, csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing required value for 'Hardness'"));
    }

    #[test]
    fn test_empty_dataset() {
        let csv = "Material,Current,Heat_Input,Carbon,Manganese,Hardness\n";
        assert!(Dataset::from_reader(Target::Hardness, csv.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Dataset::from_csv_path(Target::Hardness, "/nonexistent/hardness.csv").unwrap_err();
        assert!(err.to_string().contains("cannot open /nonexistent/hardness.csv"));
    }

    #[test]
    fn test_subset() {
        let dataset = Dataset::from_reader(Target::Hardness, HARDNESS_CSV.as_bytes()).unwrap();
        let subset = dataset.subset(&[1]);
        assert_eq!(subset.labels, vec![180.0]);
        assert_eq!(subset.len(), 1);
    }
}
