//! Feature extraction: window → observation counts (+ aggregates) → labelled example.

use super::{AggregateFeatures, FeatureLayout, FeatureVector, TrainingExample};
use crate::config::StrategyConfig;
use crate::error::{PredictError, Result};
use crate::records::LogRecord;
use crate::windows::{SubWindow, Window};
use chrono::Duration;
use std::collections::{HashMap, HashSet};
use tracing::debug;

pub struct FeatureExtractor {
    severities: Vec<String>,
    index: HashMap<String, usize>,
    severity_field: String,
    failure_field: String,
    failure_values: HashSet<String>,
    interval: Option<Duration>,
}

impl FeatureExtractor {
    pub fn new(config: &StrategyConfig) -> Result<Self> {
        if config.severities.is_empty() {
            return Err(PredictError::InvalidConfig(
                "severity vocabulary is empty".to_string(),
            ));
        }
        let mut index = HashMap::with_capacity(config.severities.len());
        for (i, s) in config.severities.iter().enumerate() {
            if index.insert(s.clone(), i).is_some() {
                return Err(PredictError::InvalidConfig(format!(
                    "severity '{}' listed twice",
                    s
                )));
            }
        }
        if config.failure_values.is_empty() {
            return Err(PredictError::InvalidConfig(
                "failure value set is empty".to_string(),
            ));
        }
        let interval = match config.layout {
            FeatureLayout::EventLevel => None,
            FeatureLayout::Aggregate { interval_secs } => Some(
                Duration::try_seconds(interval_secs)
                    .filter(|d| *d > Duration::zero())
                    .ok_or_else(|| {
                        PredictError::InvalidConfig(format!(
                            "interval must be a positive number of seconds, got {}",
                            interval_secs
                        ))
                    })?,
            ),
        };

        Ok(Self {
            severities: config.severities.clone(),
            index,
            severity_field: config.severity_field.clone(),
            failure_field: config.failure_field().to_string(),
            failure_values: config.failure_values.iter().cloned().collect(),
            interval,
        })
    }

    /// Feature vector width.
    pub fn width(&self) -> usize {
        self.severities.len()
    }

    fn severity_slot(&self, record: &LogRecord) -> Result<usize> {
        let value = record
            .field(&self.severity_field)
            .ok_or_else(|| PredictError::MissingField {
                field: self.severity_field.clone(),
            })?;
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| PredictError::UnknownSeverity {
                field: self.severity_field.clone(),
                value: value.to_string(),
            })
    }

    /// Severity counts of one sub-window.
    pub fn count(&self, sub: &SubWindow<'_>) -> Result<FeatureVector> {
        let mut v = FeatureVector::zeros(self.width());
        for record in sub.records {
            v.counts[self.severity_slot(record)?] += 1;
        }
        Ok(v)
    }

    /// True when any record's failure field holds a failure value.
    pub fn is_failure(&self, sub: &SubWindow<'_>) -> Result<bool> {
        for record in sub.records {
            let value = record
                .field(&self.failure_field)
                .ok_or_else(|| PredictError::MissingField {
                    field: self.failure_field.clone(),
                })?;
            if self.failure_values.contains(value) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn extract(&self, window: &Window<'_>) -> Result<TrainingExample> {
        let classification = match window.classification() {
            Some(last) if window.len() >= 2 => last,
            _ => return Err(PredictError::WindowTooSmall { count: window.len() }),
        };
        let observations = window
            .observation()
            .iter()
            .map(|sub| self.count(sub))
            .collect::<Result<Vec<_>>>()?;
        let failure = self.is_failure(classification)?;
        let example = TrainingExample::new(observations, failure);

        match self.interval {
            None => Ok(example),
            Some(interval) => {
                let aggregate = self.aggregate(window, &example.observations, interval)?;
                Ok(example.with_aggregate(aggregate))
            }
        }
    }

    pub fn extract_all(&self, windows: &[Window<'_>]) -> Result<Vec<TrainingExample>> {
        let examples = windows
            .iter()
            .map(|w| self.extract(w))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            examples = examples.len(),
            failures = examples.iter().filter(|e| e.failure).count(),
            "extracted examples"
        );
        Ok(examples)
    }

    fn aggregate(
        &self,
        window: &Window<'_>,
        observations: &[FeatureVector],
        interval: Duration,
    ) -> Result<AggregateFeatures> {
        let mut totals = FeatureVector::zeros(self.width());
        for v in observations {
            for (t, c) in totals.counts.iter_mut().zip(&v.counts) {
                *t += c;
            }
        }

        let interval_ms = interval.num_milliseconds().max(1);
        let mut intervals = Vec::new();
        for sub in window.observation() {
            let span_ms = (sub.end - sub.start).num_milliseconds();
            let slots = ((span_ms + interval_ms - 1) / interval_ms).max(1) as usize;
            let mut buckets = vec![FeatureVector::zeros(self.width()); slots];
            for record in sub.records {
                let offset_ms = (record.timestamp()? - sub.start).num_milliseconds().max(0);
                let slot = ((offset_ms / interval_ms) as usize).min(slots - 1);
                buckets[slot].counts[self.severity_slot(record)?] += 1;
            }
            intervals.extend(buckets);
        }

        Ok(AggregateFeatures::new(totals, intervals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn t(s: &str) -> NaiveDateTime {
        crate::records::parse_timestamp(s).unwrap()
    }

    fn rec(time: &str, severity: &str) -> LogRecord {
        LogRecord::new(time, severity)
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(&StrategyConfig::new("TestData")).unwrap()
    }

    fn sub<'a>(start: &str, end: &str, records: &'a [LogRecord]) -> SubWindow<'a> {
        SubWindow::new(t(start), t(end), records)
    }

    #[test]
    fn counts_and_label() {
        let a = vec![
            rec("2009-08-31-01.00.00.000000", "INFO"),
            rec("2009-08-31-02.00.00.000000", "ERROR"),
            rec("2009-08-31-03.00.00.000000", "INFO"),
        ];
        let b = vec![rec("2009-08-31-07.00.00.000000", "WARN")];
        let c = vec![
            rec("2009-08-31-12.00.00.000000", "INFO"),
            rec("2009-08-31-13.00.00.000000", "FATAL"),
        ];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-06.00.00.000000", &a),
            sub("2009-08-31-06.00.00.000000", "2009-08-31-11.00.00.000000", &b),
            sub("2009-08-31-11.00.00.000000", "2009-08-31-16.00.00.000000", &c),
        ]);
        let ex = extractor().extract(&w).unwrap();
        assert_eq!(
            ex.observations,
            vec![
                FeatureVector::from(vec![2, 0, 1, 0]),
                FeatureVector::from(vec![0, 1, 0, 0])
            ]
        );
        assert!(ex.failure);
        assert!(ex.aggregate.is_none());
        for (v, s) in ex.observations.iter().zip(w.observation()) {
            assert_eq!(v.total(), s.len() as u64);
        }
    }

    #[test]
    fn too_few_sub_windows() {
        let e = extractor();
        let err = e.extract(&Window::new(vec![])).unwrap_err();
        assert!(matches!(err, PredictError::WindowTooSmall { count: 0 }));

        let records = vec![LogRecord::default()];
        let w = Window::new(vec![sub(
            "2009-08-31-01.00.00.000000",
            "2009-08-31-06.00.00.000000",
            &records,
        )]);
        let err = e.extract(&w).unwrap_err();
        assert!(matches!(err, PredictError::WindowTooSmall { count: 1 }));
    }

    #[test]
    fn missing_severity_field() {
        let records = vec![LogRecord::default(), LogRecord::default()];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-06.00.00.000000", &records),
            sub("2009-08-31-06.00.00.000000", "2009-08-31-11.00.00.000000", &[]),
            sub("2009-08-31-11.00.00.000000", "2009-08-31-16.00.00.000000", &[]),
        ]);
        let err = extractor().extract(&w).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error parsing windowed log data, could not find SEVERITY field"
        );
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let records = vec![rec("2009-08-31-01.00.00.000000", "DEBUG")];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-06.00.00.000000", &records),
            sub("2009-08-31-06.00.00.000000", "2009-08-31-11.00.00.000000", &[]),
        ]);
        let err = extractor().extract(&w).unwrap_err();
        assert!(matches!(err, PredictError::UnknownSeverity { ref value, .. } if value == "DEBUG"));
    }

    #[test]
    fn classification_sub_window_is_not_counted() {
        let last = vec![rec("2009-08-31-07.00.00.000000", "SOMETHING_ELSE")];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-06.00.00.000000", &[]),
            sub("2009-08-31-06.00.00.000000", "2009-08-31-11.00.00.000000", &last),
        ]);
        let ex = extractor().extract(&w).unwrap();
        assert_eq!(ex.observations, vec![FeatureVector::zeros(4)]);
        assert!(!ex.failure);
    }

    #[test]
    fn separate_failure_field() {
        let mut config = StrategyConfig::new("TestData");
        config.severity_field = "CAT".to_string();
        config.severities = vec!["KERNRTSP".to_string(), "-".to_string()];
        config.failure_field = Some("CAT".to_string());
        config.failure_values = vec!["KERNRTSP".to_string()];
        let e = FeatureExtractor::new(&config).unwrap();

        let obs = vec![LogRecord::default().with_field("CAT", "-")];
        let last = vec![
            LogRecord::default().with_field("CAT", "-"),
            LogRecord::default().with_field("CAT", "KERNRTSP"),
        ];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-06.00.00.000000", &obs),
            sub("2009-08-31-06.00.00.000000", "2009-08-31-11.00.00.000000", &last),
        ]);
        let ex = e.extract(&w).unwrap();
        assert_eq!(ex.observations, vec![FeatureVector::from(vec![0, 1])]);
        assert!(ex.failure);
    }

    #[test]
    fn vocabulary_validation() {
        let mut config = StrategyConfig::new("TestData");
        config.severities = vec!["INFO".to_string(), "INFO".to_string()];
        assert!(FeatureExtractor::new(&config).is_err());
        config.severities.clear();
        assert!(FeatureExtractor::new(&config).is_err());

        let mut config = StrategyConfig::new("TestData");
        config.layout = FeatureLayout::Aggregate { interval_secs: 0 };
        assert!(FeatureExtractor::new(&config).is_err());
    }

    #[test]
    fn aggregate_buckets_by_interval() {
        let mut config = StrategyConfig::new("TestData");
        config.layout = FeatureLayout::Aggregate { interval_secs: 3600 };
        let e = FeatureExtractor::new(&config).unwrap();

        let a = vec![
            rec("2009-08-31-01.00.00.000000", "INFO"),
            rec("2009-08-31-02.30.00.000000", "ERROR"),
            rec("2009-08-31-02.59.59.999999", "INFO"),
        ];
        let b = vec![rec("2009-08-31-04.00.00.000000", "WARN")];
        let w = Window::new(vec![
            sub("2009-08-31-01.00.00.000000", "2009-08-31-03.00.00.000000", &a),
            sub("2009-08-31-03.00.00.000000", "2009-08-31-05.00.00.000000", &b),
            sub("2009-08-31-05.00.00.000000", "2009-08-31-07.00.00.000000", &[]),
        ]);
        let ex = e.extract(&w).unwrap();
        let agg = ex.aggregate.expect("aggregate features");
        assert_eq!(agg.totals, FeatureVector::from(vec![2, 1, 1, 0]));
        assert_eq!(
            agg.intervals,
            vec![
                FeatureVector::from(vec![1, 0, 0, 0]),
                FeatureVector::from(vec![1, 0, 1, 0]),
                FeatureVector::from(vec![0, 0, 0, 0]),
                FeatureVector::from(vec![0, 1, 0, 0]),
            ]
        );
        assert_eq!(agg.means, vec![0.5, 0.25, 0.25, 0.0]);
    }
}
