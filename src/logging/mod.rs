//! Structured logging setup and report lines.

mod format;

pub use format::{ExperimentReport, StructuredLogger};
