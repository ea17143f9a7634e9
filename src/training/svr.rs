//! Epsilon-SVR with an RBF kernel
//!
//! The dual coefficients are solved by exact coordinate descent on the
//! bias-augmented kernel: each step soft-thresholds the coordinate's
//! residual by epsilon and clips the result to the [-C, C] box. Sweeps stop
//! once the largest coefficient change drops below the tolerance.

use crate::error::{Result, SvrlabError};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Maximum number of samples for eager kernel matrix computation.
/// Beyond this, training returns an error to prevent OOM.
pub const MAX_KERNEL_MATRIX_SAMPLES: usize = 10_000;

/// Row count above which the kernel matrix is computed in parallel
const PARALLEL_KERNEL_CUTOFF: usize = 100;

/// Coefficients below this magnitude are not kept as support vectors
const SUPPORT_VECTOR_EPS: f64 = 1e-8;

/// SVR solver configuration. `gamma` is the already-resolved kernel width;
/// heuristic resolution happens in the training engine where the scaled
/// feature matrix is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvrConfig {
    /// Regularization parameter (C)
    pub c: f64,
    /// Epsilon tube half-width
    pub epsilon: f64,
    /// RBF kernel width
    pub gamma: f64,
    /// Stop once the largest per-sweep coefficient change is below this
    pub tol: f64,
    /// Maximum number of full coordinate sweeps
    pub max_iter: usize,
    /// Seed for the sweep-order shuffle
    pub seed: u64,
}

impl Default for SvrConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.1,
            gamma: 1.0,
            tol: 1e-3,
            max_iter: 1000,
            seed: 42,
        }
    }
}

/// RBF-kernel support vector regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RbfSvr {
    config: SvrConfig,
    support_vectors: Option<Array2<f64>>,
    coefficients: Option<Array1<f64>>,
    bias: f64,
    is_fitted: bool,
}

impl RbfSvr {
    /// Create a new regressor
    pub fn new(config: SvrConfig) -> Self {
        Self {
            config,
            support_vectors: None,
            coefficients: None,
            bias: 0.0,
            is_fitted: false,
        }
    }

    /// Fit the regressor on a feature matrix and target vector
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n = x.nrows();

        if n == 0 {
            return Err(SvrlabError::InsufficientData(
                "the training partition has no rows".to_string(),
            ));
        }
        if n != y.len() {
            return Err(SvrlabError::Internal(format!(
                "feature matrix has {} rows but target has {}",
                n,
                y.len()
            )));
        }
        if n > MAX_KERNEL_MATRIX_SAMPLES {
            return Err(SvrlabError::validation(
                "file",
                format!(
                    "dataset has {} training rows, exceeding the maximum {} for kernel training",
                    n, MAX_KERNEL_MATRIX_SAMPLES
                ),
            ));
        }

        // Centering the target keeps the implicit bias term small
        let y_mean = y.mean().unwrap_or(0.0);
        let y_centered: Array1<f64> = y.mapv(|v| v - y_mean);

        let kernel = compute_kernel_matrix(x, self.config.gamma);

        let mut beta: Array1<f64> = Array1::zeros(n);
        // pred[i] = sum_j beta[j] * (K[j,i] + 1), maintained incrementally
        let mut pred: Array1<f64> = Array1::zeros(n);

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.seed);

        for _sweep in 0..self.config.max_iter {
            order.shuffle(&mut rng);
            let mut max_change: f64 = 0.0;

            for &i in &order {
                let k_ii = kernel[[i, i]] + 1.0;
                // Residual at i with i's own contribution removed
                let residual = y_centered[i] - (pred[i] - beta[i] * k_ii);

                let unclipped = if residual > self.config.epsilon {
                    (residual - self.config.epsilon) / k_ii
                } else if residual < -self.config.epsilon {
                    (residual + self.config.epsilon) / k_ii
                } else {
                    0.0
                };
                let new_beta = unclipped.clamp(-self.config.c, self.config.c);

                let delta = new_beta - beta[i];
                if delta.abs() > 1e-12 {
                    for j in 0..n {
                        pred[j] += delta * (kernel[[i, j]] + 1.0);
                    }
                    beta[i] = new_beta;
                    max_change = max_change.max(delta.abs());
                }
            }

            if max_change < self.config.tol {
                break;
            }
        }

        // The augmented kernel folds the bias into the coefficient sum
        let bias: f64 = beta.sum() + y_mean;

        let support_indices: Vec<usize> = beta
            .iter()
            .enumerate()
            .filter(|(_, b)| b.abs() > SUPPORT_VECTOR_EPS)
            .map(|(i, _)| i)
            .collect();

        let n_features = x.ncols();
        let mut support_vectors = Array2::zeros((support_indices.len(), n_features));
        let mut coefficients = Array1::zeros(support_indices.len());
        for (row, &idx) in support_indices.iter().enumerate() {
            support_vectors.row_mut(row).assign(&x.row(idx));
            coefficients[row] = beta[idx];
        }

        self.support_vectors = Some(support_vectors);
        self.coefficients = Some(coefficients);
        self.bias = bias;
        self.is_fitted = true;

        Ok(())
    }

    /// Predict target values for a feature matrix
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(SvrlabError::ModelNotFitted);
        }

        let sv = self.support_vectors.as_ref().ok_or(SvrlabError::ModelNotFitted)?;
        let coef = self.coefficients.as_ref().ok_or(SvrlabError::ModelNotFitted)?;
        let gamma = self.config.gamma;

        let predictions = x
            .rows()
            .into_iter()
            .map(|sample| {
                let mut sum = self.bias;
                for (j, sv_row) in sv.rows().into_iter().enumerate() {
                    let mut dist_sq = 0.0;
                    for (a, b) in sample.iter().zip(sv_row.iter()) {
                        let diff = a - b;
                        dist_sq += diff * diff;
                    }
                    sum += coef[j] * (-gamma * dist_sq).exp();
                }
                sum
            })
            .collect();

        Ok(predictions)
    }

    /// Number of support vectors kept after fitting
    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.as_ref().map(|sv| sv.nrows()).unwrap_or(0)
    }
}

/// Compute the RBF kernel matrix, in parallel for larger inputs
fn compute_kernel_matrix(x: &Array2<f64>, gamma: f64) -> Array2<f64> {
    let n = x.nrows();

    let rbf = |i: usize, j: usize| {
        let mut dist_sq = 0.0;
        for (a, b) in x.row(i).iter().zip(x.row(j).iter()) {
            let diff = a - b;
            dist_sq += diff * diff;
        }
        (-gamma * dist_sq).exp()
    };

    if n < PARALLEL_KERNEL_CUTOFF {
        let mut k = Array2::zeros((n, n));
        for i in 0..n {
            for j in i..n {
                let val = rbf(i, j);
                k[[i, j]] = val;
                k[[j, i]] = val;
            }
        }
        return k;
    }

    // Upper-triangle rows computed in parallel, then mirrored
    let rows: Vec<Vec<(usize, f64)>> = (0..n)
        .into_par_iter()
        .map(|i| (i..n).map(|j| (j, rbf(i, j))).collect())
        .collect();

    let mut k = Array2::zeros((n, n));
    for (i, row_vals) in rows.into_iter().enumerate() {
        for (j, val) in row_vals {
            k[[i, j]] = val;
            k[[j, i]] = val;
        }
    }
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_vec(
            (10, 1),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        )
        .unwrap();
        let y = Array1::from_vec(vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0]);
        (x, y)
    }

    #[test]
    fn test_fit_linear_relation() {
        let (x, y) = linear_data();
        let config = SvrConfig {
            c: 50.0,
            epsilon: 0.1,
            gamma: 0.5,
            ..Default::default()
        };

        let mut svr = RbfSvr::new(config);
        svr.fit(&x, &y).unwrap();
        assert!(svr.n_support_vectors() > 0);

        let predictions = svr.predict(&x).unwrap();
        for (pred, actual) in predictions.iter().zip(y.iter()) {
            assert!(
                (pred - actual).abs() < 2.0,
                "prediction {} too far from {}",
                pred,
                actual
            );
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let (x, y) = linear_data();
        let config = SvrConfig {
            c: 10.0,
            epsilon: 0.1,
            gamma: 0.5,
            seed: 7,
            ..Default::default()
        };

        let mut a = RbfSvr::new(config.clone());
        let mut b = RbfSvr::new(config);
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        for (va, vb) in pa.iter().zip(pb.iter()) {
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn test_wide_tube_collapses_to_mean() {
        let (x, y) = linear_data();
        // Tube wider than the centered target range: nothing to fit
        let config = SvrConfig {
            epsilon: 100.0,
            gamma: 0.5,
            ..Default::default()
        };

        let mut svr = RbfSvr::new(config);
        svr.fit(&x, &y).unwrap();
        assert_eq!(svr.n_support_vectors(), 0);

        let predictions = svr.predict(&x).unwrap();
        let mean = y.mean().unwrap();
        for pred in predictions.iter() {
            assert!((pred - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let svr = RbfSvr::new(SvrConfig::default());
        let x = Array2::zeros((2, 1));
        assert!(matches!(
            svr.predict(&x).unwrap_err(),
            SvrlabError::ModelNotFitted
        ));
    }

    #[test]
    fn test_empty_training_partition() {
        let mut svr = RbfSvr::new(SvrConfig::default());
        let x = Array2::zeros((0, 1));
        let y = Array1::zeros(0);
        assert!(matches!(
            svr.fit(&x, &y).unwrap_err(),
            SvrlabError::InsufficientData(_)
        ));
    }
}
