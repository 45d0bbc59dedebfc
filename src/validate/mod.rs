//! Input validation
//!
//! Turns a raw JSON payload into an ordered [`FeatureRecord`] for one target.
//! Fields are checked in schema order and the first failure is returned; the
//! caller never receives a partial record.

use crate::schema::{
    FeatureRecord, FeatureValue, FieldKind, Schema, HARDNESS_SCHEMA, MATERIALS, OXIDATION_SCHEMA,
};
use serde_json::Value;


/// Raw request payload: field name to untyped JSON value
pub type Payload = serde_json::Map<String, Value>;

/// Validation error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid material '{value}'. Must be one of: {choices}", choices = material_choices())]
    InvalidMaterial { value: String },

    #[error("Missing required value for '{field}'")]
    MissingValue { field: String },

    #[error("Field '{field}' must be numeric. Got '{raw}'")]
    NotNumeric { field: String, raw: String },
}

impl ValidationError {
    /// Field the error refers to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::InvalidMaterial { .. } => crate::schema::MATERIAL_FIELD,
            ValidationError::MissingValue { field } | ValidationError::NotNumeric { field, .. } => {
                field.as_str()
            }
        }
    }
}

/// Render the valid material list as `['EN-8', 'Mild Steel']`
pub fn material_choices() -> String {
    let quoted: Vec<String> = MATERIALS.iter().map(|m| format!("'{m}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Text of a raw value as it appears in error messages
fn render_raw(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Check the material against the fixed category set
///
/// Returns the original string; the pipeline's encoder works on labels.
pub fn validate_material(raw: Option<&Value>) -> Result<String, ValidationError> {
    match raw {
        Some(Value::String(s)) if MATERIALS.contains(&s.as_str()) => Ok(s.clone()),
        other => Err(ValidationError::InvalidMaterial {
            value: render_raw(other),
        }),
    }
}

/// Validate and coerce a single numeric field
pub fn validate_numeric(name: &str, raw: Option<&Value>) -> Result<f64, ValidationError> {
    let not_numeric = || ValidationError::NotNumeric {
        field: name.to_string(),
        raw: render_raw(raw),
    };

    match raw {
        None | Some(Value::Null) => Err(ValidationError::MissingValue {
            field: name.to_string(),
        }),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::MissingValue {
            field: name.to_string(),
        }),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).ok_or_else(not_numeric),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(not_numeric),
        Some(_) => Err(not_numeric()),
    }
}

/// Validate a payload against a schema
pub fn validate(schema: &Schema, payload: &Payload) -> Result<FeatureRecord, ValidationError> {
    let mut record = FeatureRecord::with_capacity(schema.len());

    for field in schema.fields {
        let raw = payload.get(field.name);
        let value = match field.kind {
            FieldKind::Categorical => FeatureValue::Category(validate_material(raw)?),
            FieldKind::Numeric => FeatureValue::Number(validate_numeric(field.name, raw)?),
        };
        record.push(field.name, value);
    }

    Ok(record)
}

/// Validate inputs for hardness prediction
pub fn validate_hardness_input(payload: &Payload) -> Result<FeatureRecord, ValidationError> {
    validate(&HARDNESS_SCHEMA, payload)
}

/// Validate inputs for oxidation prediction
pub fn validate_oxidation_input(payload: &Payload) -> Result<FeatureRecord, ValidationError> {
    validate(&OXIDATION_SCHEMA, payload)
}
