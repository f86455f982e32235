//! RAS failure prediction for Blue Gene event logs.
//!
//! Modular structure:
//! - [`records`]: Log records and line sources (JSON lines, regex)
//! - [`filter`]: Temporal/semantic redundancy filter
//! - [`windows`]: Sliding-window partitioning into sub-windows
//! - [`features`]: Per-sub-window severity counts, aggregate statistics, labels
//! - [`dataset`]: Classifier data-file serialization and score parsing
//! - [`balance`]: Class-balancing sampler
//! - [`classifier`]: External SVM bridge with scoped scratch files
//! - [`strategy`]: Configurable prediction strategy
//! - [`evaluation`]: Predictions and accuracy report
//! - [`logging`]: Structured JSON logging

pub mod balance;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod filter;
pub mod logging;
pub mod records;
pub mod strategy;
pub mod windows;

pub use classifier::{Classifier, Model, SvmLight};
pub use config::{PredictorConfig, StrategyConfig};
pub use error::{PredictError, Result};
pub use evaluation::{evaluate, Evaluation, Prediction};
pub use features::{FeatureExtractor, FeatureVector, TrainingExample};
pub use filter::RedundancyFilter;
pub use logging::StructuredLogger;
pub use records::{LogRecord, RecordSource};
pub use strategy::Strategy;
pub use windows::{Partitioner, StepPolicy, SubWindow, Window};
