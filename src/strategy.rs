//! One configurable prediction strategy: partition → extract → (balance) → serialize.
//! Variants differ only by [`StrategyConfig`] values.

use crate::balance::balance;
use crate::classifier::{ScratchPaths, SvmLight};
use crate::config::{ClassifierConfig, StrategyConfig};
use crate::dataset::{build_data_file_content, LabelPolarity};
use crate::error::{PredictError, Result};
use crate::features::{FeatureExtractor, FeatureLayout, TrainingExample};
use crate::records::LogRecord;
use crate::windows::{Partitioner, Window};
use chrono::Duration;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EVENT_LEVEL_NAME: &str = "EventLevelSlidingWindow";
pub const AGGREGATE_NAME: &str = "AggregateSlidingWindow";

/// Suffix of the persisted model file name.
pub const MODEL_SUFFIX: &str = "SVMFatalInLastWindowModel";

pub struct Strategy {
    config: StrategyConfig,
    partitioner: Partitioner,
    extractor: FeatureExtractor,
    polarity: LabelPolarity,
}

impl Strategy {
    pub fn new(config: StrategyConfig) -> Result<Self> {
        let span = Duration::try_seconds(config.window_secs)
            .filter(|d| *d > Duration::zero())
            .ok_or_else(|| {
                PredictError::InvalidConfig(format!(
                    "window must be a positive number of seconds, got {}",
                    config.window_secs
                ))
            })?;
        if config.sub_windows < 2 {
            return Err(PredictError::InvalidConfig(format!(
                "need at least 2 sub-windows, got {}",
                config.sub_windows
            )));
        }
        let partitioner = Partitioner::new(span, config.sub_windows, config.step)?;
        let extractor = FeatureExtractor::new(&config)?;
        let polarity = LabelPolarity::from_negative_labels(config.negative_labels);
        Ok(Self {
            config,
            partitioner,
            extractor,
            polarity,
        })
    }

    pub fn name(&self) -> &'static str {
        match self.config.layout {
            FeatureLayout::EventLevel => EVENT_LEVEL_NAME,
            FeatureLayout::Aggregate { .. } => AGGREGATE_NAME,
        }
    }

    pub fn partition<'a>(&self, records: &'a [LogRecord]) -> Result<Vec<Window<'a>>> {
        self.partitioner.partition(records)
    }

    /// Every complete window of `records` as a labelled example, in time order.
    pub fn parse_data(&self, records: &[LogRecord]) -> Result<Vec<TrainingExample>> {
        let windows = self.partition(records)?;
        let examples = self.extractor.extract_all(&windows)?;
        info!(
            strategy = self.name(),
            dataset = %self.config.dataset_name,
            windows = windows.len(),
            failures = examples.iter().filter(|e| e.failure).count(),
            "parsed windowed log data"
        );
        Ok(examples)
    }

    /// The examples to train on: balanced when configured, otherwise unchanged.
    pub fn training_set<R: Rng + ?Sized>(
        &self,
        examples: Vec<TrainingExample>,
        rng: &mut R,
    ) -> Result<Vec<TrainingExample>> {
        if self.config.balance {
            balance(examples, rng)
        } else {
            Ok(examples)
        }
    }

    pub fn data_file_content(&self, examples: &[TrainingExample]) -> Result<String> {
        build_data_file_content(examples, self.polarity)
    }

    pub fn scratch_paths(&self, dir: &Path) -> ScratchPaths {
        ScratchPaths::new(dir, &self.config.dataset_name, self.name())
    }

    pub fn svm_light(&self, config: &ClassifierConfig) -> SvmLight {
        SvmLight::new(config, self.scratch_paths(&config.scratch_dir), self.polarity)
    }

    pub fn model_path(&self, model_dir: &Path) -> PathBuf {
        model_dir.join(format!("{} - {}", self.config.dataset_name, MODEL_SUFFIX))
    }
}
