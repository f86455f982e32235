//! Line-oriented record sources: JSON lines and anchored field regexes.

use super::LogRecord;
use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::{debug, warn};

/// Anything that yields records in chronological order.
pub trait RecordSource {
    fn read_records(&mut self) -> Result<Vec<LogRecord>>;
}

/// One JSON object per line.
pub struct JsonLinesSource<R> {
    reader: R,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> RecordSource for JsonLinesSource<R> {
    fn read_records(&mut self) -> Result<Vec<LogRecord>> {
        let mut out = Vec::new();
        for line in (&mut self.reader).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            out.push(serde_json::from_str(line)?);
        }
        debug!(records = out.len(), "read json lines");
        Ok(out)
    }
}

/// A named column and the regex its value must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPattern {
    pub name: String,
    pub pattern: String,
}

impl FieldPattern {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Columns of the Blue Gene/L RAS log (CFDR release).
pub fn blue_gene_fields() -> Vec<FieldPattern> {
    [
        ("CAT", r"\w+|-"),
        ("UTIME", r"\d+"),
        ("DATE", r"[\d.]+"),
        ("SOURCE", r"\S+"),
        ("EVENT_TIME", r"[\d.-]+"),
        ("SOURCE2", r"\S+"),
        ("FIELD1", r"\w+"),
        ("FIELD2", r"\w+"),
        ("SEVERITY", r"\w+"),
        ("MESSAGE", r".*"),
    ]
    .into_iter()
    .map(|(n, p)| FieldPattern::new(n, p))
    .collect()
}

/// Matches each line against `^(?P<f1>p1)delim(?P<f2>p2)...$`.
/// Lines that do not match are skipped.
pub struct RegexSource<R> {
    reader: R,
    regex: Regex,
    names: Vec<String>,
}

impl<R: BufRead> RegexSource<R> {
    pub fn new(reader: R, fields: &[FieldPattern], delimiter: &str) -> Result<Self> {
        let body = fields
            .iter()
            .map(|f| format!("(?P<{}>{})", f.name, f.pattern))
            .collect::<Vec<_>>()
            .join(delimiter);
        let regex = Regex::new(&format!("^{}$", body))?;
        Ok(Self {
            reader,
            regex,
            names: fields.iter().map(|f| f.name.clone()).collect(),
        })
    }

    pub fn blue_gene(reader: R) -> Result<Self> {
        Self::new(reader, &blue_gene_fields(), r"\s+")
    }
}

impl<R: BufRead> RecordSource for RegexSource<R> {
    fn read_records(&mut self) -> Result<Vec<LogRecord>> {
        let mut out = Vec::new();
        let mut skipped = 0usize;
        for line in (&mut self.reader).lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            let Some(caps) = self.regex.captures(line) else {
                if !line.trim().is_empty() {
                    skipped += 1;
                }
                continue;
            };
            let record = LogRecord::from_fields(
                self.names
                    .iter()
                    .filter_map(|n| caps.name(n).map(|m| (n.as_str(), m.as_str()))),
            );
            out.push(record);
        }
        if skipped > 0 {
            warn!(skipped, "log lines did not match the field pattern");
        }
        debug!(records = out.len(), "read regex lines");
        Ok(out)
    }
}
