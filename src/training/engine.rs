//! Request-scoped training orchestration
//!
//! One engine run covers a whole training request: validate the parameters
//! against the dataset schema, extract the feature matrix, drop incomplete
//! rows, split, scale, fit, score both partitions and render the diagnostic
//! plots. Nothing survives the request; there is no model store.

use crate::data::dtype_label;
use crate::error::{Result, SvrlabError};
use crate::plot::{PlotRenderer, PlotlyRenderer, ScatterSpec};
use crate::preprocessing::{Scaler, ScalerKind};
use crate::training::{
    train_test_split, Gamma, GammaHeuristic, RbfSvr, RegressionMetrics, SvrConfig, SvrParameters,
};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// Six evaluation metrics: train/test x {mse, r2, mae}
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EvaluationMetrics {
    pub train_mse: f64,
    pub test_mse: f64,
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_mae: f64,
    pub test_mae: f64,
}

/// Sample-count breakdown. Counts reflect rows that survived the
/// missing-value drop, so `training_samples + test_samples == total_samples`.
#[derive(Debug, Clone, Serialize)]
pub struct DataInfo {
    pub total_samples: usize,
    pub training_samples: usize,
    pub test_samples: usize,
    pub features: usize,
    pub feature_names: Vec<String>,
}

/// The two diagnostic plot payloads (self-contained data URIs)
#[derive(Debug, Clone, Serialize)]
pub struct TrainingPlots {
    pub actual_vs_predicted: String,
    pub residuals: String,
}

/// Everything returned for one training request
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub model_parameters: SvrParameters,
    pub metrics: EvaluationMetrics,
    pub data_info: DataInfo,
    pub plots: TrainingPlots,
}

/// Training engine for a single request
pub struct TrainEngine {
    params: SvrParameters,
}

impl TrainEngine {
    /// Create an engine from request parameters
    pub fn new(params: SvrParameters) -> Self {
        Self { params }
    }

    /// Run the full pipeline with the default plot renderer
    pub fn run(&self, df: &DataFrame) -> Result<TrainingReport> {
        self.run_with_renderer(df, &PlotlyRenderer)
    }

    /// Run the full pipeline with an explicit plot renderer
    pub fn run_with_renderer(
        &self,
        df: &DataFrame,
        renderer: &dyn PlotRenderer,
    ) -> Result<TrainingReport> {
        self.params.validate()?;

        let features = self.resolve_features(df)?;
        let (x, y, kept) = extract_matrix(df, &features, &self.params.target_column)?;

        if kept == 0 {
            return Err(SvrlabError::InsufficientData(
                "no rows with complete target and feature values".to_string(),
            ));
        }

        let (train_idx, test_idx) =
            train_test_split(kept, self.params.test_size, self.params.random_state)?;

        let x_train = x.select(Axis(0), &train_idx);
        let x_test = x.select(Axis(0), &test_idx);
        let y_train = y.select(Axis(0), &train_idx);
        let y_test = y.select(Axis(0), &test_idx);

        let mut scaler = Scaler::new(ScalerKind::Standard);
        let x_train = scaler.fit_transform(&x_train)?;
        let x_test = scaler.transform(&x_test)?;

        let gamma = resolve_gamma(self.params.gamma, &x_train);
        info!(
            target_column = %self.params.target_column,
            features = features.len(),
            train_rows = train_idx.len(),
            test_rows = test_idx.len(),
            gamma,
            "Fitting SVR model"
        );

        let mut model = RbfSvr::new(SvrConfig {
            c: self.params.c,
            epsilon: self.params.epsilon,
            gamma,
            seed: self.params.random_state,
            ..Default::default()
        });
        model.fit(&x_train, &y_train)?;

        let train_pred = model.predict(&x_train)?;
        let test_pred = model.predict(&x_test)?;

        let train_metrics = RegressionMetrics::compute(&y_train, &train_pred);
        let test_metrics = RegressionMetrics::compute(&y_test, &test_pred);

        let residuals: Vec<f64> = y_test
            .iter()
            .zip(test_pred.iter())
            .map(|(actual, pred)| actual - pred)
            .collect();

        let plots = TrainingPlots {
            actual_vs_predicted: renderer.render(&ScatterSpec::actual_vs_predicted(
                y_test.to_vec(),
                test_pred.to_vec(),
                test_metrics.r2,
            ))?,
            residuals: renderer.render(&ScatterSpec::residuals(test_pred.to_vec(), residuals))?,
        };

        let mut echoed = self.params.clone();
        echoed.feature_columns = Some(features.clone());

        Ok(TrainingReport {
            model_parameters: echoed,
            metrics: EvaluationMetrics {
                train_mse: train_metrics.mse,
                test_mse: test_metrics.mse,
                train_r2: train_metrics.r2,
                test_r2: test_metrics.r2,
                train_mae: train_metrics.mae,
                test_mae: test_metrics.mae,
            },
            data_info: DataInfo {
                total_samples: kept,
                training_samples: train_idx.len(),
                test_samples: test_idx.len(),
                features: features.len(),
                feature_names: features,
            },
            plots,
        })
    }

    /// Resolve and validate the feature column list against the schema.
    /// The target must exist and be numeric; every feature must exist, be
    /// numeric and differ from the target.
    fn resolve_features(&self, df: &DataFrame) -> Result<Vec<String>> {
        let target = &self.params.target_column;

        let target_col = df.column(target.as_str()).map_err(|_| {
            SvrlabError::validation(
                "target_column",
                format!("column '{}' not found in dataset", target),
            )
        })?;
        if !is_numeric(target_col.dtype()) {
            return Err(SvrlabError::validation(
                "target_column",
                format!(
                    "column '{}' has type '{}', expected a numeric column",
                    target,
                    dtype_label(target_col.dtype())
                ),
            ));
        }

        let features: Vec<String> = match &self.params.feature_columns {
            Some(cols) => cols.clone(),
            None => df
                .get_column_names()
                .into_iter()
                .filter(|name| name.as_str() != target.as_str())
                .map(|s| s.to_string())
                .collect(),
        };

        if features.is_empty() {
            return Err(SvrlabError::validation(
                "feature_columns",
                "dataset has no columns besides the target",
            ));
        }

        for name in &features {
            if name == target {
                return Err(SvrlabError::validation(
                    "feature_columns",
                    format!("feature '{}' is also the target column", name),
                ));
            }
            let col = df.column(name.as_str()).map_err(|_| {
                SvrlabError::validation(
                    "feature_columns",
                    format!("column '{}' not found in dataset", name),
                )
            })?;
            if !is_numeric(col.dtype()) {
                return Err(SvrlabError::validation(
                    "feature_columns",
                    format!(
                        "column '{}' has type '{}', expected a numeric column",
                        name,
                        dtype_label(col.dtype())
                    ),
                ));
            }
        }

        Ok(features)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Extract the feature matrix and target vector, dropping any row with a
/// missing (null or NaN) value in the target or a selected feature. Returns
/// the kept-row count, which the report surfaces as `total_samples`.
fn extract_matrix(
    df: &DataFrame,
    features: &[String],
    target: &str,
) -> Result<(Array2<f64>, Array1<f64>, usize)> {
    let n_rows = df.height();

    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(features.len() + 1);
    for name in features.iter().map(String::as_str).chain(std::iter::once(target)) {
        let series = df
            .column(name)
            .map_err(|e| SvrlabError::Internal(e.to_string()))?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| SvrlabError::Internal(e.to_string()))?;
        let values: Vec<Option<f64>> = series
            .f64()
            .map_err(|e| SvrlabError::Internal(e.to_string()))?
            .into_iter()
            .map(|v| v.filter(|f| f.is_finite()))
            .collect();
        columns.push(values);
    }

    let keep: Vec<usize> = (0..n_rows)
        .filter(|&row| columns.iter().all(|col| col[row].is_some()))
        .collect();

    let n_kept = keep.len();
    let n_features = features.len();

    let mut x = Array2::zeros((n_kept, n_features));
    let mut y = Array1::zeros(n_kept);
    for (out_row, &row) in keep.iter().enumerate() {
        for (j, col) in columns[..n_features].iter().enumerate() {
            x[[out_row, j]] = col[row].unwrap_or_default();
        }
        y[out_row] = columns[n_features][row].unwrap_or_default();
    }

    Ok((x, y, n_kept))
}

/// Resolve a gamma heuristic against the scaled training matrix
fn resolve_gamma(gamma: Gamma, x_train: &Array2<f64>) -> f64 {
    let n_features = x_train.ncols().max(1) as f64;
    match gamma {
        Gamma::Fixed(g) => g,
        Gamma::Named(GammaHeuristic::Auto) => 1.0 / n_features,
        Gamma::Named(GammaHeuristic::Scale) => {
            let n = (x_train.nrows() * x_train.ncols()).max(1) as f64;
            let mean = x_train.iter().sum::<f64>() / n;
            let var = x_train.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            if var > 0.0 {
                1.0 / (n_features * var)
            } else {
                1.0 / n_features
            }
        }
    }
}
