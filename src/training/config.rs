//! Training request parameters

use crate::error::{Result, SvrlabError};
use serde::{Deserialize, Serialize};

/// Named gamma heuristics, resolved against the training feature matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GammaHeuristic {
    /// 1 / (n_features * variance of the feature matrix)
    Scale,
    /// 1 / n_features
    Auto,
}

/// RBF kernel width: either a named heuristic or a fixed positive value.
/// On the wire this is `"scale"`, `"auto"` or a number, matching the
/// loosely-typed parameter the wizard frontend sends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gamma {
    Named(GammaHeuristic),
    Fixed(f64),
}

impl Default for Gamma {
    fn default() -> Self {
        Gamma::Named(GammaHeuristic::Scale)
    }
}

/// Parameters for one training request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvrParameters {
    /// Regularization strength
    #[serde(rename = "C", default = "default_c")]
    pub c: f64,

    /// Epsilon-tube half-width
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,

    /// RBF kernel width
    #[serde(default)]
    pub gamma: Gamma,

    /// Kernel name; accepted for wire compatibility and validated to be "rbf"
    #[serde(default = "default_kernel")]
    pub kernel: String,

    /// Target column name
    pub target_column: String,

    /// Feature column names (None = every column except the target)
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,

    /// Fraction of rows reserved for testing
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed for the train/test split and the solver sweep order
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

fn default_c() -> f64 {
    1.0
}

fn default_epsilon() -> f64 {
    0.1
}

fn default_kernel() -> String {
    "rbf".to_string()
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    42
}

impl SvrParameters {
    /// Create parameters for a target column, everything else defaulted
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            c: default_c(),
            epsilon: default_epsilon(),
            gamma: Gamma::default(),
            kernel: default_kernel(),
            target_column: target.into(),
            feature_columns: None,
            test_size: default_test_size(),
            random_state: default_random_state(),
        }
    }

    /// Validate the parameter values themselves (schema checks against the
    /// dataset happen in the engine). Fails with a `ValidationError` naming
    /// the offending field; a request that fails here never reaches the fit.
    pub fn validate(&self) -> Result<()> {
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(SvrlabError::validation("C", "must be a positive number"));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SvrlabError::validation(
                "epsilon",
                "must be a non-negative number",
            ));
        }
        if let Gamma::Fixed(g) = self.gamma {
            if !g.is_finite() || g <= 0.0 {
                return Err(SvrlabError::validation(
                    "gamma",
                    "must be 'scale', 'auto' or a positive number",
                ));
            }
        }
        if !self.kernel.eq_ignore_ascii_case("rbf") {
            return Err(SvrlabError::validation(
                "kernel",
                format!("only 'rbf' is supported, got '{}'", self.kernel),
            ));
        }
        if !self.test_size.is_finite() || self.test_size <= 0.0 || self.test_size >= 1.0 {
            return Err(SvrlabError::validation(
                "test_size",
                "must lie strictly between 0 and 1",
            ));
        }
        if self.target_column.trim().is_empty() {
            return Err(SvrlabError::validation("target_column", "must not be empty"));
        }
        if let Some(features) = &self.feature_columns {
            if features.is_empty() {
                return Err(SvrlabError::validation(
                    "feature_columns",
                    "must name at least one column",
                ));
            }
        }
        Ok(())
    }
}
