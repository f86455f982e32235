//! Whole-observation statistics: totals, fine-grained interval counts and the
//! per-severity mean and population standard deviation across intervals.

use super::FeatureVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFeatures {
    /// Counts over the entire observation period
    pub totals: FeatureVector,
    /// Counts per fine interval, in time order
    pub intervals: Vec<FeatureVector>,
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl AggregateFeatures {
    pub fn new(totals: FeatureVector, intervals: Vec<FeatureVector>) -> Self {
        let width = totals.len();
        let n = intervals.len() as f64;
        let column = |i: usize| intervals.iter().map(move |v| f64::from(v.counts[i]));

        let means: Vec<f64> = (0..width)
            .map(|i| if n > 0.0 { column(i).sum::<f64>() / n } else { 0.0 })
            .collect();
        let std_devs = (0..width)
            .map(|i| {
                if n > 0.0 {
                    let mean = means[i];
                    (column(i).map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt()
                } else {
                    0.0
                }
            })
            .collect();

        Self {
            totals,
            intervals,
            means,
            std_devs,
        }
    }

    pub fn len(&self) -> usize {
        self.totals.len()
            + self.intervals.iter().map(FeatureVector::len).sum::<usize>()
            + self.means.len()
            + self.std_devs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flatten_into(&self, out: &mut Vec<f64>) {
        out.extend(self.totals.counts.iter().map(|&c| f64::from(c)));
        for v in &self.intervals {
            out.extend(v.counts.iter().map(|&c| f64::from(c)));
        }
        out.extend_from_slice(&self.means);
        out.extend_from_slice(&self.std_devs);
    }
}
