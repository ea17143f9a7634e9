//! Model training: request parameters, splitting, the SVR solver and the
//! request-scoped training engine.

mod config;
mod engine;
mod metrics;
mod split;
mod svr;

pub use config::{Gamma, GammaHeuristic, SvrParameters};
pub use engine::{DataInfo, EvaluationMetrics, TrainEngine, TrainingPlots, TrainingReport};
pub use metrics::RegressionMetrics;
pub use split::train_test_split;
pub use svr::{RbfSvr, SvrConfig, MAX_KERNEL_MATRIX_SAMPLES};
