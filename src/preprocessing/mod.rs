//! Feature preprocessing

mod scaler;

pub use scaler::{Scaler, ScalerKind};
