//! Command-line interface
//!
//! `serve` runs the HTTP service; `info` and `train` run the same pipeline
//! against a local file without a server round-trip.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::data::{read_table, DatasetSummary};
use crate::error::{Result, SvrlabError};
use crate::server::{run_server, ServerConfig};
use crate::training::{Gamma, GammaHeuristic, SvrParameters, TrainEngine};

fn kv(key: &str, val: &str) -> String {
    format!("  {} {}", key.truecolor(140, 140, 140), val.white())
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", "─".repeat(40).truecolor(100, 100, 100));
}

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".truecolor(100, 210, 120), msg);
}

#[derive(Parser)]
#[command(name = "svrlab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train RBF support-vector regressors on tabular data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print schema information for a local file
    Info {
        /// Input data file (.csv, .xlsx or .xls)
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Train a model on a local file and print the metrics
    Train {
        /// Input data file (.csv, .xlsx or .xls)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Comma-separated feature columns (default: every non-target column)
        #[arg(short, long)]
        features: Option<String>,

        /// Regularization strength
        #[arg(long, default_value = "1.0")]
        c: f64,

        /// Epsilon tube half-width
        #[arg(long, default_value = "0.1")]
        epsilon: f64,

        /// Kernel width: "scale", "auto" or a positive number
        #[arg(long, default_value = "scale")]
        gamma: String,

        /// Fraction of rows reserved for testing
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Reproducibility seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Write the full report (plots included) to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the HTTP service
pub async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    run_server(config).await
}

/// Print a schema summary for a local file
pub fn cmd_info(data: &Path) -> Result<()> {
    let df = load_file(data)?;
    let filename = file_name(data);
    let summary = DatasetSummary::describe(&df, &filename);

    section(&format!("Dataset: {}", summary.filename));
    println!("{}", kv("rows    ", &summary.shape.0.to_string()));
    println!("{}", kv("columns ", &summary.shape.1.to_string()));

    section("Columns");
    for name in &summary.columns {
        let dtype = summary.dtypes.get(name).map(String::as_str).unwrap_or("?");
        let missing = summary.missing_values.get(name).copied().unwrap_or(0);
        let note = if missing > 0 {
            format!("{} ({} missing)", dtype, missing)
        } else {
            dtype.to_string()
        };
        println!("{}", kv(&format!("{:<20}", name), &note));
    }
    println!();
    Ok(())
}

/// Train on a local file and print the resulting metrics
#[allow(clippy::too_many_arguments)]
pub fn cmd_train(
    data: &Path,
    target: &str,
    features: Option<&str>,
    c: f64,
    epsilon: f64,
    gamma: &str,
    test_size: f64,
    seed: u64,
    output: Option<&Path>,
) -> Result<()> {
    let df = load_file(data)?;

    let mut params = SvrParameters::new(target);
    params.c = c;
    params.epsilon = epsilon;
    params.gamma = parse_gamma(gamma)?;
    params.test_size = test_size;
    params.random_state = seed;
    params.feature_columns = features.map(|list| {
        list.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    });

    let report = TrainEngine::new(params).run(&df)?;
    step_ok(&format!(
        "trained on {} rows ({} train / {} test)",
        report.data_info.total_samples,
        report.data_info.training_samples,
        report.data_info.test_samples
    ));

    section("Evaluation");
    let m = &report.metrics;
    println!("{}", kv("train R² ", &format!("{:.4}", m.train_r2)));
    println!("{}", kv("test R²  ", &format!("{:.4}", m.test_r2)));
    println!("{}", kv("train MSE", &format!("{:.4}", m.train_mse)));
    println!("{}", kv("test MSE ", &format!("{:.4}", m.test_mse)));
    println!("{}", kv("train MAE", &format!("{:.4}", m.train_mae)));
    println!("{}", kv("test MAE ", &format!("{:.4}", m.test_mae)));
    println!();

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| SvrlabError::Internal(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| SvrlabError::Internal(e.to_string()))?;
        step_ok(&format!("report written to {}", path.display()));
    }

    Ok(())
}

fn load_file(path: &Path) -> Result<polars::prelude::DataFrame> {
    let bytes = std::fs::read(path)
        .map_err(|e| SvrlabError::ParseError(format!("{}: {}", path.display(), e)))?;
    read_table(&bytes, &file_name(path))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn parse_gamma(value: &str) -> Result<Gamma> {
    match value.to_lowercase().as_str() {
        "scale" => Ok(Gamma::Named(GammaHeuristic::Scale)),
        "auto" => Ok(Gamma::Named(GammaHeuristic::Auto)),
        other => other.parse::<f64>().map(Gamma::Fixed).map_err(|_| {
            SvrlabError::validation("gamma", "must be 'scale', 'auto' or a positive number")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gamma() {
        assert_eq!(parse_gamma("scale").unwrap(), Gamma::Named(GammaHeuristic::Scale));
        assert_eq!(parse_gamma("AUTO").unwrap(), Gamma::Named(GammaHeuristic::Auto));
        assert_eq!(parse_gamma("0.25").unwrap(), Gamma::Fixed(0.25));
        assert!(parse_gamma("wide").is_err());
    }

    #[test]
    fn test_cli_parses_train_command() {
        let cli = Cli::try_parse_from([
            "svrlab", "train", "--data", "d.csv", "--target", "y", "--c", "10",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Train { target, c, .. }) => {
                assert_eq!(target, "y");
                assert_eq!(c, 10.0);
            }
            _ => panic!("expected train command"),
        }
    }

    fn write_linear_csv(path: &Path, n: usize) {
        let mut csv = String::from("x,y\n");
        for i in 1..=n {
            csv.push_str(&format!("{},{}\n", i, 2 * i));
        }
        std::fs::write(path, csv).unwrap();
    }

    #[test]
    fn test_cmd_info_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("lin.csv");
        write_linear_csv(&data, 10);
        cmd_info(&data).unwrap();
    }

    #[test]
    fn test_cmd_train_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("lin.csv");
        write_linear_csv(&data, 30);
        let out = dir.path().join("report.json");

        cmd_train(&data, "y", None, 10.0, 0.1, "scale", 0.2, 42, Some(&out)).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["data_info"]["total_samples"], 30);
        assert!(report["plots"]["residuals"]
            .as_str()
            .unwrap()
            .starts_with("data:"));
    }

    #[test]
    fn test_cmd_info_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("lin.parquet");
        std::fs::write(&data, "x,y\n1,2\n").unwrap();
        assert!(cmd_info(&data).is_err());
    }
}
