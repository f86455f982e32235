//! Downsample non-failure examples to the number of failure examples.

use crate::error::{PredictError, Result};
use crate::features::TrainingExample;
use rand::seq::index;
use rand::Rng;
use tracing::debug;

/// All positives followed by a uniform sample, without replacement, of as
/// many negatives. Chronological order is not preserved.
pub fn balance<R: Rng + ?Sized>(
    examples: Vec<TrainingExample>,
    rng: &mut R,
) -> Result<Vec<TrainingExample>> {
    let (mut positives, negatives): (Vec<_>, Vec<_>) =
        examples.into_iter().partition(|e| e.failure);

    if negatives.len() < positives.len() {
        return Err(PredictError::InsufficientNegativeExamples {
            positives: positives.len(),
            negatives: negatives.len(),
        });
    }

    let mut picked = index::sample(rng, negatives.len(), positives.len()).into_vec();
    picked.sort_unstable();
    let mut picked = picked.into_iter().peekable();
    let sampled = negatives.into_iter().enumerate().filter_map(|(i, e)| {
        if picked.peek() == Some(&i) {
            picked.next();
            Some(e)
        } else {
            None
        }
    });

    let n = positives.len();
    positives.extend(sampled);
    debug!(positives = n, negatives = n, "balanced examples");
    Ok(positives)
}
