//! Feature schemas for the two prediction targets
//!
//! Each target declares its required fields in the exact order the fitted
//! pipelines consume them. Hardness uses five features; oxidation adds
//! `Soaking_Time` after `Heat_Input`.

mod record;

pub use record::{FeatureRecord, FeatureValue};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Valid material categories, sorted.
pub const MATERIALS: [&str; 2] = ["EN-8", "Mild Steel"];

/// Name of the categorical field shared by both schemas.
pub const MATERIAL_FIELD: &str = "Material";

/// Kind of value a field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// One of [`MATERIALS`], passed through as the raw string
    Categorical,
    /// Parsed to `f64`
    Numeric,
}

/// A single schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    const fn categorical(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Categorical,
        }
    }

    const fn numeric(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Numeric,
        }
    }
}

/// Ordered field list for one target
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub target: Target,
    pub fields: &'static [Field],
}

impl Schema {
    /// Field names in declared order
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the numeric fields, in order
    pub fn numeric_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Numeric)
            .map(|f| f.name)
    }

    /// Names of the categorical fields, in order
    pub fn categorical_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Categorical)
            .map(|f| f.name)
    }
}

static HARDNESS_FIELDS: [Field; 5] = [
    Field::categorical(MATERIAL_FIELD),
    Field::numeric("Current"),
    Field::numeric("Heat_Input"),
    Field::numeric("Carbon"),
    Field::numeric("Manganese"),
];

static OXIDATION_FIELDS: [Field; 6] = [
    Field::categorical(MATERIAL_FIELD),
    Field::numeric("Current"),
    Field::numeric("Heat_Input"),
    Field::numeric("Soaking_Time"),
    Field::numeric("Carbon"),
    Field::numeric("Manganese"),
];

pub static HARDNESS_SCHEMA: Schema = Schema {
    target: Target::Hardness,
    fields: &HARDNESS_FIELDS,
};

pub static OXIDATION_SCHEMA: Schema = Schema {
    target: Target::Oxidation,
    fields: &OXIDATION_FIELDS,
};

/// Prediction target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Hardness,
    Oxidation,
}

impl Target {
    /// Both targets, in response order
    pub const ALL: [Target; 2] = [Target::Hardness, Target::Oxidation];

    /// Schema for this target
    pub fn schema(&self) -> &'static Schema {
        match self {
            Target::Hardness => &HARDNESS_SCHEMA,
            Target::Oxidation => &OXIDATION_SCHEMA,
        }
    }

    /// Lowercase identifier used in paths and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Hardness => "hardness",
            Target::Oxidation => "oxidation",
        }
    }

    /// Capitalized name used in user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Target::Hardness => "Hardness",
            Target::Oxidation => "Oxidation",
        }
    }

    /// Dataset column holding the training label
    pub fn label_column(&self) -> &'static str {
        match self {
            Target::Hardness => "Hardness",
            Target::Oxidation => "Oxidation_Rate",
        }
    }

    /// Human-readable model name recorded in metadata
    pub fn model_name(&self) -> &'static str {
        match self {
            Target::Hardness => "Hardness Model",
            Target::Oxidation => "Oxidation Model",
        }
    }

    /// Default artifact file name inside the model directory
    pub fn artifact_file_name(&self) -> String {
        format!("{}_model.json", self.as_str())
    }

    /// Metadata sidecar file name inside the model directory
    pub fn metadata_file_name(&self) -> String {
        format!("{}_metadata.json", self.as_str())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hardness" => Ok(Target::Hardness),
            "oxidation" => Ok(Target::Oxidation),
            _ => Err(format!("Invalid target: {s} (must be hardness or oxidation)")),
        }
    }
}
