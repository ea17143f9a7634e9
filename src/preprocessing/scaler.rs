//! Feature scaling over dense matrices

use crate::error::{Result, SvrlabError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Type of scaler to use
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalerKind {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
    /// No scaling
    None,
}

/// Per-column feature scaler. Fit on the training partition only so test
/// statistics never leak into the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    kind: ScalerKind,
    center: Array1<f64>,
    scale: Array1<f64>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a new scaler
    pub fn new(kind: ScalerKind) -> Self {
        Self {
            kind,
            center: Array1::zeros(0),
            scale: Array1::zeros(0),
            is_fitted: false,
        }
    }

    /// Fit the scaler to a feature matrix (rows = samples)
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        let n_cols = x.ncols();
        let mut center = Array1::zeros(n_cols);
        let mut scale = Array1::ones(n_cols);

        for (j, col) in x.axis_iter(Axis(1)).enumerate() {
            match self.kind {
                ScalerKind::Standard => {
                    let mean = col.mean().unwrap_or(0.0);
                    let std = col.std(0.0);
                    center[j] = mean;
                    scale[j] = if std == 0.0 { 1.0 } else { std };
                }
                ScalerKind::MinMax => {
                    let min = col.iter().copied().fold(f64::INFINITY, f64::min);
                    let max = col.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let range = max - min;
                    center[j] = if min.is_finite() { min } else { 0.0 };
                    scale[j] = if range.is_finite() && range != 0.0 { range } else { 1.0 };
                }
                ScalerKind::None => {}
            }
        }

        self.center = center;
        self.scale = scale;
        self.is_fitted = true;
        Ok(self)
    }

    /// Transform a feature matrix using the fitted parameters
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(SvrlabError::ModelNotFitted);
        }
        if x.ncols() != self.center.len() {
            return Err(SvrlabError::Internal(format!(
                "scaler was fitted on {} columns, got {}",
                self.center.len(),
                x.ncols()
            )));
        }

        let mut out = x.clone();
        for j in 0..out.ncols() {
            let center = self.center[j];
            let scale = self.scale[j];
            out.column_mut(j).mapv_inplace(|v| (v - center) / scale);
        }
        Ok(out)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}
