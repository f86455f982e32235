//! Predictor configuration: input log, experiments, external classifier, logging.

use crate::features::FeatureLayout;
use crate::records::FieldPattern;
use crate::windows::StepPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Where records come from
    pub input: InputConfig,
    /// One strategy per experiment, run in order
    pub experiments: Vec<StrategyConfig>,
    /// External SVM tools
    pub classifier: ClassifierConfig,
    /// Learned models, reused across runs
    pub model_dir: PathBuf,
    /// Per-experiment accuracy reports
    pub results_dir: PathBuf,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub log_path: PathBuf,
    pub format: LogFormat,
    /// Drop messages correlated with a recent earlier message
    pub filter_redundant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogFormat {
    JsonLines,
    BlueGene,
    Regex {
        fields: Vec<FieldPattern>,
        #[serde(default = "default_delimiter")]
        delimiter: String,
    },
}

fn default_delimiter() -> String {
    r"\s+".to_string()
}

/// Configuration surface of one prediction strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Prefix for every scratch and model file of this strategy
    pub dataset_name: String,
    /// Length of one sub-window, in seconds
    pub window_secs: i64,
    pub sub_windows: usize,
    /// Ordered severity vocabulary; one feature per entry
    pub severities: Vec<String>,
    pub severity_field: String,
    /// Field checked for failures; the severity field when unset
    pub failure_field: Option<String>,
    pub failure_values: Vec<String>,
    /// Label non-failure windows -1 (true) or 0 (false)
    pub negative_labels: bool,
    pub step: StepPolicy,
    pub layout: FeatureLayout,
    /// Downsample negatives to the positive count before training
    pub balance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub learn_program: String,
    pub classify_program: String,
    /// Directory for training, model and prediction scratch files
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            experiments: vec![StrategyConfig::default()],
            classifier: ClassifierConfig::default(),
            model_dir: PathBuf::from("model"),
            results_dir: PathBuf::from("results"),
            log: LogConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("log/bgl.log"),
            format: LogFormat::BlueGene,
            filter_redundant: false,
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            dataset_name: "BlueGeneRAS".to_string(),
            window_secs: 5 * 60 * 60,
            sub_windows: 5,
            severities: ["INFO", "WARN", "ERROR", "FATAL"]
                .into_iter()
                .map(String::from)
                .collect(),
            severity_field: crate::records::SEVERITY.to_string(),
            failure_field: None,
            failure_values: vec!["FATAL".to_string(), "FAILURE".to_string()],
            negative_labels: true,
            step: StepPolicy::default(),
            layout: FeatureLayout::default(),
            balance: false,
        }
    }
}

impl StrategyConfig {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            ..Self::default()
        }
    }

    pub fn failure_field(&self) -> &str {
        self.failure_field.as_deref().unwrap_or(&self.severity_field)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            learn_program: "svm_learn".to_string(),
            classify_program: "svm_classify".to_string(),
            scratch_dir: PathBuf::from("."),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl PredictorConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(crate::error::PredictError::from)
            .and_then(|data| Ok(serde_json::from_str::<PredictorConfig>(&data)?))
        {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable config; using defaults");
                Self::default()
            }
        }
    }
}
