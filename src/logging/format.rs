//! JSON log lines: one JSON object per line (ndjson), plus the per-experiment report.

use crate::error::Result;
use crate::evaluation::Evaluation;
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Outcome of one experiment, written as a single JSON line.
#[derive(Debug, Serialize)]
pub struct ExperimentReport<'a> {
    pub ts: String,
    pub dataset: &'a str,
    pub strategy: &'a str,
    pub examples: usize,
    pub training_examples: usize,
    /// Model was read from the model directory rather than trained
    pub cached_model: bool,
    #[serde(flatten)]
    pub evaluation: &'a Evaluation,
}

/// Initialize tracing with JSON format (one JSON object per line)
pub struct StructuredLogger;

impl StructuredLogger {
    /// Install global subscriber: JSON lines or plain text to stderr, level from RUST_LOG or default.
    pub fn init(json: bool, default_level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    /// Emit a single structured line (e.g. an experiment report) without going through tracing
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> Result<()> {
        let line = serde_json::to_string(event)?;
        writeln!(w, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate, Prediction};

    #[test]
    fn report_is_one_json_line() {
        let evaluation = evaluate(
            &[true, false],
            &[Prediction::Failure, Prediction::Failure],
        )
        .unwrap();
        let report = ExperimentReport {
            ts: "2026-01-01T00:00:00Z".to_string(),
            dataset: "TestData",
            strategy: "EventLevelSlidingWindow",
            examples: 2,
            training_examples: 2,
            cached_model: false,
            evaluation: &evaluation,
        };
        let mut out = Vec::new();
        StructuredLogger::emit_json(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["dataset"], "TestData");
        assert_eq!(v["counts"]["mispredicted_non_failures"], 1);
        assert_eq!(v["percentages"]["total_accuracy"], 0.5);
    }
}
