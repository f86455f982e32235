//! SVM-light data files: one `<label> <index>:<value> ...` line per example,
//! 1-based feature indices, values with two decimals, lines joined by `\n`.
//! Also the classifier's output: one score per line.

use crate::error::{PredictError, Result};
use crate::features::TrainingExample;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Positive,
    Negative,
    Neutral,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "+1",
            Label::Negative => "-1",
            Label::Neutral => "0",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How non-failure windows are labelled. Failure windows are always `+1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPolarity {
    /// Non-failure windows are `-1`
    #[default]
    Negative,
    /// Non-failure windows are `0` (unlabelled)
    Neutral,
}

impl LabelPolarity {
    pub fn from_negative_labels(negative_labels: bool) -> Self {
        if negative_labels {
            LabelPolarity::Negative
        } else {
            LabelPolarity::Neutral
        }
    }

    pub fn label(self, failure: bool) -> Label {
        match (failure, self) {
            (true, _) => Label::Positive,
            (false, LabelPolarity::Negative) => Label::Negative,
            (false, LabelPolarity::Neutral) => Label::Neutral,
        }
    }
}

/// Feature count every example must have, taken from the first example's
/// observation count times its first vector's width.
fn expected_feature_count(first: &TrainingExample) -> usize {
    let width = first.observations.first().map_or(0, |v| v.len());
    first.observations.len() * width + first.aggregate.as_ref().map_or(0, |a| a.len())
}

pub fn format_line(example: &TrainingExample, polarity: LabelPolarity) -> String {
    let mut line = example.label(polarity).as_str().to_string();
    for (i, value) in example.features().iter().enumerate() {
        line.push_str(&format!(" {}:{:.2}", i + 1, value));
    }
    line
}

/// Serialize examples in order. Fails on an empty set or on examples whose
/// feature counts differ.
pub fn build_data_file_content(
    examples: &[TrainingExample],
    polarity: LabelPolarity,
) -> Result<String> {
    let first = examples.first().ok_or(PredictError::NoExamples)?;
    let expected = expected_feature_count(first);

    let mut lines = Vec::with_capacity(examples.len());
    for (index, example) in examples.iter().enumerate() {
        let actual = example.feature_count();
        if actual != expected {
            return Err(PredictError::ShapeMismatch {
                index,
                expected,
                actual,
            });
        }
        lines.push(format_line(example, polarity));
    }
    Ok(lines.join("\n"))
}

/// Scores from a prediction output file; blank lines are ignored.
pub fn parse_scores(text: &str) -> Result<Vec<f64>> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.parse::<f64>().map_err(|_| PredictError::ScoreParse {
                line: l.to_string(),
            })
        })
        .collect()
}
