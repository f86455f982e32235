//! Time windows over a chronologically ordered record slice.
//!
//! A [`Window`] is a run of contiguous, equally long [`SubWindow`]s. All but
//! the last are observation sub-windows (features); the last is the
//! classification sub-window (label). Empty sub-windows are kept in place.

mod partition;

use crate::records::LogRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub use partition::{Partitioner, EMPTY_INPUT_MESSAGE};

/// How far the next window starts after the current one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Advance by one sub-window span; consecutive windows share all but one sub-window.
    #[default]
    Rolling,
    /// Advance by the whole window; windows never overlap.
    Tiled,
}

/// Records in `[start, end)`, borrowed from the partitioned slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SubWindow<'a> {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub records: &'a [LogRecord],
}

impl<'a> SubWindow<'a> {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, records: &'a [LogRecord]) -> Self {
        Self {
            start,
            end,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window<'a> {
    pub sub_windows: Vec<SubWindow<'a>>,
}

impl<'a> Window<'a> {
    pub fn new(sub_windows: Vec<SubWindow<'a>>) -> Self {
        Self { sub_windows }
    }

    pub fn len(&self) -> usize {
        self.sub_windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_windows.is_empty()
    }

    /// Every sub-window except the last.
    pub fn observation(&self) -> &[SubWindow<'a>] {
        let n = self.sub_windows.len().saturating_sub(1);
        &self.sub_windows[..n]
    }

    /// The last sub-window.
    pub fn classification(&self) -> Option<&SubWindow<'a>> {
        self.sub_windows.last()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.sub_windows.first().map(|s| s.start)
    }

    /// All records of the window in order.
    pub fn records(&self) -> impl Iterator<Item = &'a LogRecord> + '_ {
        self.sub_windows.iter().flat_map(|s| {
            let records: &'a [LogRecord] = s.records;
            records.iter()
        })
    }
}
