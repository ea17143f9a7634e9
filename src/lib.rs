//! svrlab - RBF support vector regression as a service
//!
//! A user uploads a tabular dataset, picks a target and feature columns, and
//! gets back an RBF-kernel SVR fit with accuracy metrics and two diagnostic
//! plots. Every request is self-contained: parse, split, scale, fit, score,
//! plot, respond. Nothing is persisted.
//!
//! # Modules
//!
//! - [`data`] - file parsing and schema summaries
//! - [`preprocessing`] - feature scaling
//! - [`training`] - request parameters, splitting, the SVR solver, the engine
//! - [`plot`] - diagnostic plot rendering
//! - [`server`] - HTTP API
//! - [`cli`] - command-line interface

pub mod cli;
pub mod data;
pub mod error;
pub mod plot;
pub mod preprocessing;
pub mod server;
pub mod training;

pub use error::{Result, SvrlabError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::data::{read_table, DatasetSummary};
    pub use crate::error::{Result, SvrlabError};
    pub use crate::plot::{PlotRenderer, PlotlyRenderer, ScatterSpec};
    pub use crate::preprocessing::{Scaler, ScalerKind};
    pub use crate::server::{create_router, run_server, ServerConfig};
    pub use crate::training::{
        Gamma, GammaHeuristic, RbfSvr, SvrConfig, SvrParameters, TrainEngine, TrainingReport,
    };
}
