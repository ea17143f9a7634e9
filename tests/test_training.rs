//! Integration test: Training pipeline end-to-end

use polars::prelude::*;
use svrlab::error::SvrlabError;
use svrlab::training::{train_test_split, Gamma, GammaHeuristic, SvrParameters, TrainEngine};

fn linear_df(n: usize) -> DataFrame {
    let x: Vec<f64> = (1..=n).map(|v| v as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v).collect();
    df!("x" => x, "y" => y).unwrap()
}

#[test]
fn test_split_determinism() {
    for seed in [0u64, 1, 42, 1234] {
        let (train_a, test_a) = train_test_split(500, 0.2, seed).unwrap();
        let (train_b, test_b) = train_test_split(500, 0.2, seed).unwrap();
        assert_eq!(train_a, train_b, "seed {} must reproduce the split", seed);
        assert_eq!(test_a, test_b);
    }
}

#[test]
fn test_engine_is_deterministic_for_fixed_seed() {
    let mut params = SvrParameters::new("y");
    params.random_state = 9;

    let df = linear_df(60);
    let a = TrainEngine::new(params.clone()).run(&df).unwrap();
    let b = TrainEngine::new(params).run(&df).unwrap();

    assert_eq!(a.metrics.test_r2, b.metrics.test_r2);
    assert_eq!(a.metrics.train_mse, b.metrics.train_mse);
    assert_eq!(a.metrics.test_mae, b.metrics.test_mae);
}

#[test]
fn test_sample_counts_add_up() {
    for test_size in [0.1, 0.2, 0.25, 0.5] {
        let mut params = SvrParameters::new("y");
        params.test_size = test_size;

        let report = TrainEngine::new(params).run(&linear_df(40)).unwrap();
        let info = &report.data_info;
        assert_eq!(
            info.training_samples + info.test_samples,
            info.total_samples,
            "counts must add up for test_size {}",
            test_size
        );
    }
}

#[test]
fn test_linear_scenario_accuracy() {
    // x = 1..100, y = 2x, C=10, epsilon=0.01, gamma=scale, 20% test, seed 0
    let mut params = SvrParameters::new("y");
    params.feature_columns = Some(vec!["x".to_string()]);
    params.c = 10.0;
    params.epsilon = 0.01;
    params.gamma = Gamma::Named(GammaHeuristic::Scale);
    params.test_size = 0.2;
    params.random_state = 0;

    let report = TrainEngine::new(params).run(&linear_df(100)).unwrap();
    assert!(
        report.metrics.test_r2 > 0.95,
        "test R2 {} should exceed 0.95",
        report.metrics.test_r2
    );
    assert!(
        report.metrics.test_mae < 5.0,
        "test MAE {} should be below 5",
        report.metrics.test_mae
    );
}

#[test]
fn test_fixed_gamma_scenario() {
    let mut params = SvrParameters::new("y");
    params.c = 10.0;
    params.epsilon = 0.01;
    params.gamma = Gamma::Fixed(1.0);
    params.random_state = 3;

    let report = TrainEngine::new(params).run(&linear_df(100)).unwrap();
    assert!(report.metrics.train_r2 > 0.9);
}

#[test]
fn test_all_null_target_is_insufficient_data() {
    let df = df!(
        "x" => &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
        "y" => &[None::<f64>, None, None, None]
    )
    .unwrap();

    let err = TrainEngine::new(SvrParameters::new("y")).run(&df).unwrap_err();
    assert!(matches!(err, SvrlabError::InsufficientData(_)));
}

#[test]
fn test_extreme_test_fraction_is_insufficient_data() {
    let mut params = SvrParameters::new("y");
    params.test_size = 0.999;

    let err = TrainEngine::new(params).run(&linear_df(3)).unwrap_err();
    assert!(matches!(err, SvrlabError::InsufficientData(_)));
}

#[test]
fn test_dropped_rows_reflected_in_counts() {
    let df = df!(
        "x" => &[Some(1.0), None, Some(3.0), Some(4.0), Some(5.0), Some(6.0),
                 Some(7.0), Some(8.0), Some(9.0), Some(10.0), Some(11.0), Some(12.0)],
        "y" => &[Some(2.0), Some(4.0), None, Some(8.0), Some(10.0), Some(12.0),
                 Some(14.0), Some(16.0), Some(18.0), Some(20.0), Some(22.0), Some(24.0)]
    )
    .unwrap();

    let report = TrainEngine::new(SvrParameters::new("y")).run(&df).unwrap();
    // Two rows carry a missing value and must be dropped before the split
    assert_eq!(report.data_info.total_samples, 10);
    assert_eq!(
        report.data_info.training_samples + report.data_info.test_samples,
        10
    );
}

#[test]
fn test_validation_precedes_fit() {
    // A bad parameter must fail even though the dataset itself is unusable
    // for other reasons; parameter validation runs first.
    let mut params = SvrParameters::new("y");
    params.c = -1.0;

    let err = TrainEngine::new(params).run(&linear_df(10)).unwrap_err();
    assert!(matches!(err, SvrlabError::ValidationError { field, .. } if field == "C"));
}
