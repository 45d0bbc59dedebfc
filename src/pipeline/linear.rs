//! Ridge-stabilised least squares

use crate::{Error, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`LinearRegression`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearParams {
    /// L2 penalty on the coefficients (not the intercept)
    pub alpha: f64,
}

impl Default for LinearParams {
    fn default() -> Self {
        // Keeps the normal equations solvable when one-hot columns are
        // collinear with the intercept.
        Self { alpha: 1e-6 }
    }
}

/// Fitted linear model `y = x · coefficients + intercept`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    /// Fit on a design matrix `x` (rows are samples) and targets `y`
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, params: &LinearParams) -> Result<Self> {
        let (n, p) = x.dim();
        if n == 0 {
            return Err(Error::Training("cannot fit on zero samples".to_string()));
        }
        if y.len() != n {
            return Err(Error::Training(format!(
                "sample count mismatch: {n} rows, {} targets",
                y.len()
            )));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(p));
        let y_mean = y.mean().unwrap_or(0.0);

        let xc = x - &x_mean;
        let yc = y - y_mean;

        let mut gram = xc.t().dot(&xc);
        for i in 0..p {
            gram[[i, i]] += params.alpha;
        }
        let rhs = xc.t().dot(&yc);

        let coefficients = solve(gram, rhs)?;
        let intercept = y_mean - x_mean.dot(&coefficients);

        Ok(Self {
            coefficients: coefficients.to_vec(),
            intercept,
        })
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.coefficients.len() {
            return Err(Error::Prediction(format!(
                "linear model expects {} inputs, got {}",
                self.coefficients.len(),
                x.len()
            )));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(x)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept)
    }
}

/// Solve `a · w = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Result<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))
            .unwrap_or(col);

        if !a[[pivot, col]].is_finite() || a[[pivot, col]].abs() < 1e-300 {
            return Err(Error::Training(
                "normal equations are singular; increase alpha".to_string(),
            ));
        }

        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut w = Array1::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * w[k]).sum();
        w[row] = (b[row] - tail) / a[[row, row]];
    }

    if w.iter().all(|v: &f64| v.is_finite()) {
        Ok(w)
    } else {
        Err(Error::Training("solution is not finite".to_string()))
    }
}
