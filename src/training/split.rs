//! Deterministic train/test splitting

use crate::error::{Result, SvrlabError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Shuffle row indices with a seeded RNG and partition them into train and
/// test sets. The same seed and row count always produce the same partition.
///
/// `test_size` must lie in (0, 1); the test partition takes
/// `ceil(n * test_size)` rows. Fails with `InsufficientData` when either
/// partition would end up empty.
pub fn train_test_split(
    n_samples: usize,
    test_size: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if n_samples == 0 {
        return Err(SvrlabError::InsufficientData(
            "no rows available to split".to_string(),
        ));
    }

    let n_test = ((n_samples as f64) * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(SvrlabError::InsufficientData(format!(
            "cannot split {} rows with test fraction {}",
            n_samples, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();

    Ok((train_indices, test_indices))
}
