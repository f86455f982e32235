//! Error types for windowing, feature extraction and the classifier bridge.

use std::path::PathBuf;
use thiserror::Error;

/// Everything the prediction pipeline can fail with. None of these are
/// retried internally.
#[derive(Debug, Error)]
pub enum PredictError {
    /// Empty input where data is required.
    #[error("{0}")]
    InvalidInput(String),

    /// A record's timestamp field could not be parsed.
    #[error("could not parse {field} value '{value}': {source}")]
    TimestampParse {
        field: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A record lacks a field the strategy reads.
    #[error("error parsing windowed log data, could not find {field} field")]
    MissingField { field: String },

    /// A severity value outside the configured vocabulary.
    #[error("error parsing windowed log data, unknown {field} value '{value}'")]
    UnknownSeverity { field: String, value: String },

    /// A window needs at least one observation and one classification sub-window.
    #[error("error parsing windowed log data, found window with {count} sub-windows")]
    WindowTooSmall { count: usize },

    /// Examples with differing feature counts.
    #[error("error building data file content: example {index} has {actual} features, expected {expected}")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("error building data file content: no examples given")]
    NoExamples,

    #[error("cannot balance {positives} positive examples with only {negatives} negative examples")]
    InsufficientNegativeExamples { positives: usize, negatives: usize },

    /// A scratch file is already present, probably left behind by a crashed run.
    #[error("scratch file {} already exists", path.display())]
    ScratchFileCollision { path: PathBuf },

    #[error("{program} exited with {status}")]
    ClassifierFailed { program: String, status: String },

    #[error("could not parse prediction score '{line}'")]
    ScoreParse { line: String },

    #[error("expected {expected} entries, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, PredictError>;
