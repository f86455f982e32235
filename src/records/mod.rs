//! RAS log records and the sources that produce them.
//! Records are read-only once produced; the windowing core only borrows them.

mod source;

use crate::config::{InputConfig, LogFormat};
use crate::error::{PredictError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;

pub use source::{FieldPattern, JsonLinesSource, RecordSource, RegexSource};

pub const EVENT_TIME: &str = "EVENT_TIME";
pub const SEVERITY: &str = "SEVERITY";
pub const CATEGORY: &str = "CAT";
pub const MESSAGE: &str = "MESSAGE";

/// `EVENT_TIME` layout, e.g. `2009-08-31-01.00.00.000000`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H.%M.%S.%6f";

/// One RAS event. The fields the pipeline reads are explicit; every other
/// column lands in `extra`. A `None` value is a placeholder column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(rename = "EVENT_TIME", default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,
    #[serde(rename = "SEVERITY", default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(rename = "CAT", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "MESSAGE", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Option<String>>,
}

impl LogRecord {
    pub fn new(event_time: impl Into<String>, severity: impl Into<String>) -> Self {
        Self {
            event_time: Some(event_time.into()),
            severity: Some(severity.into()),
            ..Self::default()
        }
    }

    /// Build a record from `(field, value)` pairs as a line parser yields them.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        fields
            .into_iter()
            .fold(Self::default(), |record, (k, v)| record.with_field(k, v))
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = Some(value.into());
        match name.as_str() {
            EVENT_TIME => self.event_time = value,
            SEVERITY => self.severity = value,
            CATEGORY => self.category = value,
            MESSAGE => self.message = value,
            _ => {
                self.extra.insert(name, value);
            }
        }
        self
    }

    /// Value of a field by column name; `None` when absent or a placeholder.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            EVENT_TIME => self.event_time.as_deref(),
            SEVERITY => self.severity.as_deref(),
            CATEGORY => self.category.as_deref(),
            MESSAGE => self.message.as_deref(),
            _ => self.extra.get(name).and_then(|v| v.as_deref()),
        }
    }

    /// Parsed `EVENT_TIME`.
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let raw = self
            .event_time
            .as_deref()
            .ok_or_else(|| PredictError::MissingField {
                field: EVENT_TIME.to_string(),
            })?;
        parse_timestamp(raw)
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|source| {
        PredictError::TimestampParse {
            field: EVENT_TIME.to_string(),
            value: raw.to_string(),
            source,
        }
    })
}

/// Open the configured log file as a record source.
pub fn open(input: &InputConfig) -> Result<Box<dyn RecordSource>> {
    let reader = BufReader::new(File::open(&input.log_path)?);
    let source: Box<dyn RecordSource> = match &input.format {
        LogFormat::JsonLines => Box::new(JsonLinesSource::new(reader)),
        LogFormat::BlueGene => Box::new(RegexSource::blue_gene(reader)?),
        LogFormat::Regex { fields, delimiter } => {
            Box::new(RegexSource::new(reader, fields, delimiter)?)
        }
    };
    Ok(source)
}
