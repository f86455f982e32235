//! Turns classifier scores into failure predictions and tallies them against
//! the true labels.

use crate::error::{PredictError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    Failure,
    NonFailure,
}

impl Prediction {
    /// Negative scores predict no failure; zero and above predict a failure.
    pub fn from_score(score: f64) -> Self {
        if score < 0.0 {
            Prediction::NonFailure
        } else {
            Prediction::Failure
        }
    }

    pub fn is_failure(self) -> bool {
        self == Prediction::Failure
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationCounts {
    pub predicted_failures: usize,
    pub mispredicted_failures: usize,
    pub predicted_non_failures: usize,
    pub mispredicted_non_failures: usize,
    pub total_failures: usize,
    pub total_events: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPercentages {
    pub total_accuracy: f64,
    pub failure_accuracy: f64,
    pub non_failure_accuracy: f64,
    pub failure_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub percentages: EvaluationPercentages,
    pub counts: EvaluationCounts,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn evaluate(correct: &[bool], predicted: &[Prediction]) -> Result<Evaluation> {
    if correct.is_empty() || predicted.is_empty() {
        return Err(PredictError::InvalidInput(
            "cannot evaluate an empty label or prediction list".to_string(),
        ));
    }
    if correct.len() != predicted.len() {
        return Err(PredictError::LengthMismatch {
            expected: correct.len(),
            actual: predicted.len(),
        });
    }

    let mut c = EvaluationCounts {
        total_events: correct.len(),
        ..EvaluationCounts::default()
    };
    for (&label, prediction) in correct.iter().zip(predicted) {
        match (label, prediction.is_failure()) {
            (true, true) => c.predicted_failures += 1,
            (true, false) => c.mispredicted_failures += 1,
            (false, false) => c.predicted_non_failures += 1,
            (false, true) => c.mispredicted_non_failures += 1,
        }
    }
    c.total_failures = c.predicted_failures + c.mispredicted_failures;

    let percentages = EvaluationPercentages {
        total_accuracy: ratio(c.predicted_failures + c.predicted_non_failures, c.total_events),
        failure_accuracy: ratio(c.predicted_failures, c.total_failures),
        non_failure_accuracy: ratio(
            c.predicted_non_failures,
            c.predicted_non_failures + c.mispredicted_non_failures,
        ),
        failure_percentage: ratio(c.total_failures, c.total_events),
    };

    Ok(Evaluation {
        percentages,
        counts: c,
    })
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.percentages;
        let c = &self.counts;
        writeln!(f, "Percentages:")?;
        writeln!(f, "------------")?;
        for (name, value) in [
            ("total_accuracy", p.total_accuracy),
            ("failure_accuracy", p.failure_accuracy),
            ("non_failure_accuracy", p.non_failure_accuracy),
            ("failure_percentage", p.failure_percentage),
        ] {
            writeln!(f, "\t{}:  {:.2}%", name, value * 100.0)?;
        }
        writeln!(f)?;
        writeln!(f, "Raw Counts:")?;
        writeln!(f, "-----------")?;
        for (name, value) in [
            ("predicted_failures", c.predicted_failures),
            ("mispredicted_failures", c.mispredicted_failures),
            ("predicted_non_failures", c.predicted_non_failures),
            ("mispredicted_non_failures", c.mispredicted_non_failures),
            ("total_failures", c.total_failures),
            ("total_events", c.total_events),
        ] {
            writeln!(f, "\t{}:  {}", name, value)?;
        }
        Ok(())
    }
}
