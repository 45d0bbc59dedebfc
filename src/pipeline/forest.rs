//! Random forest of CART regression trees
//!
//! Each tree is grown on a bootstrap sample, splitting on the feature and
//! threshold that minimise the summed squared error of the two children.
//! Trees are stored as flat node arrays so artifacts serialize compactly.

use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Hyperparameters for [`RandomForest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<Node>,
}

struct Pending {
    slot: usize,
    samples: Vec<usize>,
    depth: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl RegressionTree {
    /// Grow a tree over the given sample indices
    pub fn fit(x: &[Vec<f64>], y: &[f64], samples: Vec<usize>, params: &ForestParams) -> Self {
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![Pending {
            slot: 0,
            samples,
            depth: 0,
        }];

        while let Some(Pending {
            slot,
            samples,
            depth,
        }) = stack.pop()
        {
            let value = mean(samples.iter().map(|&i| y[i]));
            let depth_exhausted = params.max_depth.is_some_and(|max| depth >= max);

            let split = if depth_exhausted || samples.len() < params.min_samples_split.max(2) {
                None
            } else {
                best_split(x, y, &samples, params.min_samples_leaf.max(1))
            };

            match split {
                Some(BestSplit {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let left_slot = nodes.len();
                    let right_slot = left_slot + 1;
                    nodes.push(Node::Leaf { value: 0.0 });
                    nodes.push(Node::Leaf { value: 0.0 });
                    nodes[slot] = Node::Split {
                        feature,
                        threshold,
                        left: left_slot,
                        right: right_slot,
                    };
                    stack.push(Pending {
                        slot: right_slot,
                        samples: right,
                        depth: depth + 1,
                    });
                    stack.push(Pending {
                        slot: left_slot,
                        samples: left,
                        depth: depth + 1,
                    });
                }
                None => nodes[slot] = Node::Leaf { value },
            }
        }

        Self { nodes }
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let mut idx = 0;
        // A well-formed tree reaches a leaf in at most `nodes.len()` steps.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = x.get(*feature).ok_or_else(|| {
                        Error::Prediction(format!("tree references missing input {feature}"))
                    })?;
                    idx = if v <= threshold { *left } else { *right };
                }
                None => {
                    return Err(Error::Prediction(format!("tree node {idx} out of range")));
                }
            }
        }
        Err(Error::Prediction("tree contains a cycle".to_string()))
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes.get(idx) {
                Some(Node::Split { left, right, .. }) => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
                _ => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Exhaustive search over features and midpoints between distinct values
fn best_split(x: &[Vec<f64>], y: &[f64], samples: &[usize], min_leaf: usize) -> Option<BestSplit> {
    let n = samples.len();
    let total_sum: f64 = samples.iter().map(|&i| y[i]).sum();
    let total_sq: f64 = samples.iter().map(|&i| y[i] * y[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    let width = x.get(samples[0]).map_or(0, Vec::len);
    let mut best: Option<(f64, usize, f64)> = None;
    let mut order = samples.to_vec();

    for feature in 0..width {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for pos in 1..n {
            let prev = order[pos - 1];
            left_sum += y[prev];
            left_sq += y[prev] * y[prev];

            if pos < min_leaf || n - pos < min_leaf {
                continue;
            }
            let lo = x[prev][feature];
            let hi = x[order[pos]][feature];
            if lo >= hi {
                continue;
            }

            let n_left = pos as f64;
            let n_right = (n - pos) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / n_left)
                + (right_sq - right_sum * right_sum / n_right);

            if best.map_or(true, |(best_sse, _, _)| sse < best_sse) {
                let mut threshold = lo + (hi - lo) / 2.0;
                if threshold >= hi {
                    threshold = lo;
                }
                best = Some((sse, feature, threshold));
            }
        }
    }

    let (sse, feature, threshold) = best?;
    if sse >= parent_sse - 1e-12 * parent_sse.abs().max(1.0) {
        return None;
    }

    let (left, right): (Vec<usize>, Vec<usize>) = samples
        .iter()
        .copied()
        .partition(|&i| x[i][feature] <= threshold);

    Some(BestSplit {
        feature,
        threshold,
        left,
        right,
    })
}

/// Averaged ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit on row-major features `x` and targets `y`
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: &ForestParams) -> Result<Self> {
        let n = x.len();
        if n == 0 {
            return Err(Error::Training("cannot fit on zero samples".to_string()));
        }
        if y.len() != n {
            return Err(Error::Training(format!(
                "sample count mismatch: {n} rows, {} targets",
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(Error::Training("n_trees must be > 0".to_string()));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_trees)
            .map(|_| {
                let samples: Vec<usize> = if params.bootstrap {
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(x, y, samples, params)
            })
            .collect();

        Ok(Self { trees })
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(Error::Prediction("forest has no trees".to_string()));
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}
