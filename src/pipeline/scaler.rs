//! Standardization of numeric columns

use serde::{Deserialize, Serialize};

/// Per-column `(x - mean) / scale`
///
/// `scale` is the population standard deviation; constant columns get a scale
/// of 1.0 so they pass through centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on row-major data with one entry per column in each row
    pub fn fit(columns: Vec<String>, rows: &[Vec<f64>]) -> Self {
        let width = columns.len();
        let n = rows.len().max(1) as f64;

        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; width];
        for row in rows {
            for ((acc, v), m) in var.iter_mut().zip(row).zip(&mean) {
                *acc += (v - m).powi(2);
            }
        }

        let scale = var
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Self {
            columns,
            mean,
            scale,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Append the scaled values to `out`
    pub fn transform_into(&self, values: &[f64], out: &mut Vec<f64>) {
        out.extend(
            values
                .iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(v, (m, s))| (v - m) / s),
        );
    }
}
