//! Diagnostic plot rendering
//!
//! The engine talks to a `PlotRenderer` trait so the plotting backend stays
//! an implementation detail; the shipped renderer builds plotly scatter
//! traces and encodes the self-contained inline HTML as a base64 data URI.

use crate::error::{Result, SvrlabError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

/// Reference line drawn behind the scatter points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceLine {
    /// y = x diagonal across the data range (perfect-prediction line)
    Diagonal,
    /// Horizontal zero line across the x range
    Zero,
}

/// One scatter plot with axis labels and a reference line
#[derive(Debug, Clone)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub reference: ReferenceLine,
}

impl ScatterSpec {
    /// Actual vs. predicted target values on the test partition
    pub fn actual_vs_predicted(actual: Vec<f64>, predicted: Vec<f64>, r2: f64) -> Self {
        Self {
            title: format!("Test Set: Actual vs Predicted (R² = {:.3})", r2),
            x_label: "Actual Values".to_string(),
            y_label: "Predicted Values".to_string(),
            x: actual,
            y: predicted,
            reference: ReferenceLine::Diagonal,
        }
    }

    /// Residuals (actual - predicted) vs. predicted values on the test partition
    pub fn residuals(predicted: Vec<f64>, residuals: Vec<f64>) -> Self {
        Self {
            title: "Test Set: Residuals".to_string(),
            x_label: "Predicted Values".to_string(),
            y_label: "Residuals (Actual - Predicted)".to_string(),
            x: predicted,
            y: residuals,
            reference: ReferenceLine::Zero,
        }
    }
}

/// Renders a scatter spec into a self-contained embeddable payload
pub trait PlotRenderer {
    /// Render the spec and return a data URI
    fn render(&self, spec: &ScatterSpec) -> Result<String>;
}

/// Plotly-backed renderer producing `data:text/html;base64,...` payloads
#[derive(Debug, Clone, Default)]
pub struct PlotlyRenderer;

impl PlotRenderer for PlotlyRenderer {
    fn render(&self, spec: &ScatterSpec) -> Result<String> {
        if spec.x.is_empty() || spec.x.len() != spec.y.len() {
            return Err(SvrlabError::PlotError(format!(
                "cannot plot {} x values against {} y values",
                spec.x.len(),
                spec.y.len()
            )));
        }

        let points = Scatter::new(spec.x.clone(), spec.y.clone())
            .mode(Mode::Markers)
            .name("Samples");

        let (ref_x, ref_y, ref_name) = match spec.reference {
            ReferenceLine::Diagonal => {
                let min = fold_min(spec.x.iter().chain(spec.y.iter()));
                let max = fold_max(spec.x.iter().chain(spec.y.iter()));
                (vec![min, max], vec![min, max], "Perfect Prediction")
            }
            ReferenceLine::Zero => {
                let min = fold_min(spec.x.iter());
                let max = fold_max(spec.x.iter());
                (vec![min, max], vec![0.0, 0.0], "Zero Error")
            }
        };

        let reference = Scatter::new(ref_x, ref_y)
            .mode(Mode::Lines)
            .name(ref_name)
            .line(Line::new().color("red").dash(DashType::Dash));

        let layout = Layout::new()
            .title(spec.title.as_str())
            .x_axis(Axis::new().title(spec.x_label.as_str()))
            .y_axis(Axis::new().title(spec.y_label.as_str()));

        let mut plot = Plot::new();
        plot.add_trace(points);
        plot.add_trace(reference);
        plot.set_layout(layout);

        // Full standalone page so the data URI renders inside an iframe
        let html = plot.to_html();
        Ok(format!("data:text/html;base64,{}", STANDARD.encode(html)))
    }
}

fn fold_min<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.copied().fold(f64::INFINITY, f64::min)
}

fn fold_max<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.copied().fold(f64::NEG_INFINITY, f64::max)
}
