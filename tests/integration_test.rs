//! Integration test: config load, fixture partitioning, data file content,
//! pipeline run with an in-process classifier, evaluation.

use ras_predict::{
    classifier::{Classifier, Model},
    config::{InputConfig, LogFormat, PredictorConfig, StrategyConfig},
    evaluation::{evaluate, Prediction},
    features::TrainingExample,
    records::{self, LogRecord, RecordSource},
    strategy::Strategy,
    windows::{Partitioner, StepPolicy, Window},
    PredictError,
};
use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn mock_log_data() -> Vec<LogRecord> {
    let data = std::fs::read_to_string(fixture("mock_log_data.json")).unwrap();
    serde_json::from_str(&data).unwrap()
}

fn expected_windows(name: &str) -> Vec<Vec<Vec<LogRecord>>> {
    let data = std::fs::read_to_string(fixture(name)).unwrap();
    serde_json::from_str(&data).unwrap()
}

fn owned(windows: &[Window<'_>]) -> Vec<Vec<Vec<LogRecord>>> {
    windows
        .iter()
        .map(|w| w.sub_windows.iter().map(|s| s.records.to_vec()).collect())
        .collect()
}

fn partition(hours: i64, sub_windows: usize, records: &[LogRecord]) -> Vec<Vec<Vec<LogRecord>>> {
    let p = Partitioner::new(Duration::hours(hours), sub_windows, StepPolicy::Rolling).unwrap();
    owned(&p.partition(records).unwrap())
}

#[test]
fn config_load_default() {
    let c = PredictorConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.experiments.len(), 1);
    assert_eq!(c.experiments[0].window_secs, 5 * 60 * 60);
    assert_eq!(c.experiments[0].sub_windows, 5);
    assert_eq!(c.classifier.learn_program, "svm_learn");
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let c = PredictorConfig::load(&path);
    assert_eq!(c.experiments[0].dataset_name, "BlueGeneRAS");
}

#[test]
fn five_hour_windows_match_fixture() {
    let records = mock_log_data();
    assert_eq!(
        partition(5, 5, &records),
        expected_windows("expected_extended_log_windows.json")
    );
}

#[test]
fn four_hour_windows_match_fixture() {
    let records = mock_log_data();
    assert_eq!(
        partition(4, 5, &records),
        expected_windows("expected_four_hour_log_windows.json")
    );
}

#[test]
fn four_hour_six_sub_window_windows_match_fixture() {
    let records = mock_log_data();
    assert_eq!(
        partition(4, 6, &records),
        expected_windows("expected_four_hour_six_sub_window_log_windows.json")
    );
}

#[test]
fn every_window_is_an_ordered_subsequence() {
    let records = mock_log_data();
    let p = Partitioner::new(Duration::hours(5), 5, StepPolicy::Rolling).unwrap();
    for w in p.partition(&records).unwrap() {
        assert_eq!(w.len(), 5);
        let mut rest = records.iter();
        for r in w.records() {
            assert!(rest.any(|x| x == r));
        }
    }
}

#[test]
fn parse_data_and_data_file_content() {
    let strategy = Strategy::new(StrategyConfig::new("TestData")).unwrap();
    let examples = strategy.parse_data(&mock_log_data()).unwrap();
    let counts: Vec<Vec<Vec<u32>>> = examples
        .iter()
        .map(|e| e.observations.iter().map(|v| v.counts.clone()).collect())
        .collect();
    assert_eq!(
        counts,
        vec![
            vec![vec![2, 0, 1, 0], vec![1, 0, 1, 0], vec![0, 3, 0, 0], vec![0, 0, 0, 0]],
            vec![vec![1, 0, 1, 0], vec![0, 3, 0, 0], vec![0, 0, 0, 0], vec![1, 0, 0, 1]],
            vec![vec![0, 3, 0, 0], vec![0, 0, 0, 0], vec![1, 0, 0, 1], vec![0, 0, 0, 0]],
        ]
    );
    assert_eq!(
        examples.iter().map(|e| e.failure).collect::<Vec<_>>(),
        vec![true, false, false]
    );

    let content = strategy.data_file_content(&examples).unwrap();
    let lines: Vec<&str> = content.split('\n').collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "+1 1:2.00 2:0.00 3:1.00 4:0.00 5:1.00 6:0.00 7:1.00 8:0.00 9:0.00 10:3.00 11:0.00 12:0.00 13:0.00 14:0.00 15:0.00 16:0.00"
    );
    assert_eq!(
        lines[1],
        "-1 1:1.00 2:0.00 3:1.00 4:0.00 5:0.00 6:3.00 7:0.00 8:0.00 9:0.00 10:0.00 11:0.00 12:0.00 13:1.00 14:0.00 15:0.00 16:1.00"
    );
    assert!(!content.ends_with('\n'));
}

#[test]
fn empty_log_is_invalid_input() {
    let strategy = Strategy::new(StrategyConfig::new("TestData")).unwrap();
    assert!(matches!(
        strategy.parse_data(&[]),
        Err(PredictError::InvalidInput(_))
    ));
}

/// Predicts a failure whenever the last observation sub-window saw a FATAL.
struct LastFatal;

impl Classifier for LastFatal {
    fn train(&self, examples: &[TrainingExample]) -> ras_predict::Result<Model> {
        Ok(Model::new(format!("trained on {}", examples.len())))
    }

    fn score(&self, _model: &Model, examples: &[TrainingExample]) -> ras_predict::Result<Vec<f64>> {
        Ok(examples
            .iter()
            .map(|e| match e.observations.last() {
                Some(v) if v.counts[3] > 0 => 1.0,
                _ => -1.0,
            })
            .collect())
    }
}

#[test]
fn pipeline_with_in_process_classifier() {
    let strategy = Strategy::new(StrategyConfig::new("TestData")).unwrap();
    let examples = strategy.parse_data(&mock_log_data()).unwrap();
    let training = strategy
        .training_set(examples.clone(), &mut StdRng::seed_from_u64(1))
        .unwrap();
    assert_eq!(training.len(), examples.len());

    let model = LastFatal.train(&training).unwrap();
    let predictions = LastFatal.predict(&model, &examples).unwrap();
    assert_eq!(
        predictions,
        vec![Prediction::NonFailure, Prediction::Failure, Prediction::NonFailure]
    );

    let correct: Vec<bool> = examples.iter().map(|e| e.failure).collect();
    let evaluation = evaluate(&correct, &predictions).unwrap();
    assert_eq!(evaluation.counts.total_events, 3);
    assert_eq!(evaluation.counts.total_failures, 1);
    assert_eq!(evaluation.counts.mispredicted_failures, 1);
    assert_eq!(evaluation.counts.mispredicted_non_failures, 1);
    assert!(evaluation.to_string().contains("\tpredicted_non_failures:  1\n"));
}

#[test]
fn json_lines_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ras.jsonl");
    let lines: Vec<String> = mock_log_data()
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    std::fs::write(&path, lines.join("\n\n")).unwrap();

    let input = InputConfig {
        log_path: path,
        format: LogFormat::JsonLines,
        filter_redundant: false,
    };
    let records = records::open(&input).unwrap().read_records().unwrap();
    assert_eq!(records, mock_log_data());
}
