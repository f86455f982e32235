//! Per-window severity count features and the training examples built from them.

mod aggregate;
mod extractor;

pub use aggregate::AggregateFeatures;
pub use extractor::FeatureExtractor;

use crate::dataset::{Label, LabelPolarity};
use serde::{Deserialize, Serialize};

/// Which features follow the per-sub-window counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureLayout {
    /// Per-sub-window severity counts only
    #[default]
    EventLevel,
    /// Also whole-observation totals, counts per fine interval and their mean and standard deviation
    Aggregate { interval_secs: i64 },
}

/// Occurrences of each vocabulary value, in vocabulary order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub counts: Vec<u32>,
}

impl FeatureVector {
    pub fn zeros(width: usize) -> Self {
        Self {
            counts: vec![0; width],
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

impl From<Vec<u32>> for FeatureVector {
    fn from(counts: Vec<u32>) -> Self {
        Self { counts }
    }
}

/// Features of the observation sub-windows plus whether the classification
/// sub-window held a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub observations: Vec<FeatureVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateFeatures>,
    pub failure: bool,
}

impl TrainingExample {
    pub fn new(observations: Vec<FeatureVector>, failure: bool) -> Self {
        Self {
            observations,
            aggregate: None,
            failure,
        }
    }

    pub fn with_aggregate(mut self, aggregate: AggregateFeatures) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    /// All features in serialization order: observation blocks first, then
    /// aggregate statistics.
    pub fn features(&self) -> Vec<f64> {
        let mut out: Vec<f64> = self
            .observations
            .iter()
            .flat_map(|v| v.counts.iter().map(|&c| f64::from(c)))
            .collect();
        if let Some(agg) = &self.aggregate {
            agg.flatten_into(&mut out);
        }
        out
    }

    pub fn feature_count(&self) -> usize {
        let observed: usize = self.observations.iter().map(FeatureVector::len).sum();
        observed + self.aggregate.as_ref().map_or(0, AggregateFeatures::len)
    }

    pub fn label(&self, polarity: LabelPolarity) -> Label {
        polarity.label(self.failure)
    }
}
