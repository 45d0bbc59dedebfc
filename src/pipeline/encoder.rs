//! One-hot encoding for the categorical column

use serde::{Deserialize, Serialize};

/// One-hot encoder over a single string column
///
/// Categories are learned at fit time and kept sorted. Unknown labels at
/// transform time encode as all zeros instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    pub column: String,
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    /// Learn the category set from training values
    pub fn fit<'a>(column: impl Into<String>, values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut categories: Vec<String> = values.into_iter().map(str::to_string).collect();
        categories.sort();
        categories.dedup();
        Self {
            column: column.into(),
            categories,
        }
    }

    /// Number of output columns
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Append the encoding of `value` to `out`
    pub fn transform_into(&self, value: &str, out: &mut Vec<f64>) {
        out.extend(
            self.categories
                .iter()
                .map(|c| if c == value { 1.0 } else { 0.0 }),
        );
    }

    pub fn transform(&self, value: &str) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        self.transform_into(value, &mut out);
        out
    }
}
