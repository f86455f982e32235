//! External linear classifier: train on examples, score examples with a model.
//! The pipeline only sees the [`Classifier`] trait; [`SvmLight`] shells out.

mod scratch;
mod svm_light;

pub use scratch::{ScratchFile, ScratchPaths};
pub use svm_light::SvmLight;

use crate::error::{PredictError, Result};
use crate::evaluation::Prediction;
use crate::features::TrainingExample;
use std::path::Path;

/// Opaque learned model, kept as the classifier's own text format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    text: String,
}

impl Model {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, &self.text)?;
        Ok(())
    }
}

pub trait Classifier {
    fn train(&self, examples: &[TrainingExample]) -> Result<Model>;

    /// One raw score per example, in order.
    fn score(&self, model: &Model, examples: &[TrainingExample]) -> Result<Vec<f64>>;

    fn predict(&self, model: &Model, examples: &[TrainingExample]) -> Result<Vec<Prediction>> {
        let scores = self.score(model, examples)?;
        if scores.len() != examples.len() {
            return Err(PredictError::LengthMismatch {
                expected: examples.len(),
                actual: scores.len(),
            });
        }
        Ok(scores.into_iter().map(Prediction::from_score).collect())
    }
}
