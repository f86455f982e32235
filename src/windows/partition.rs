//! Timestamp-driven window partitioning.
//!
//! Sub-window boundaries are anchored on the first record's timestamp and
//! advance in whole spans, so a gap in the log produces empty sub-windows
//! rather than shifting later boundaries. A trailing window that runs out of
//! records before its last sub-window is discarded.

use super::{StepPolicy, SubWindow, Window};
use crate::error::{PredictError, Result};
use crate::records::LogRecord;
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

pub const EMPTY_INPUT_MESSAGE: &str = "training data for sliding window must be non-empty";

#[derive(Debug, Clone)]
pub struct Partitioner {
    span: Duration,
    sub_windows: usize,
    step: StepPolicy,
}

impl Partitioner {
    pub fn new(span: Duration, sub_windows: usize, step: StepPolicy) -> Result<Self> {
        if span <= Duration::zero() {
            return Err(PredictError::InvalidConfig(format!(
                "window span must be positive, got {}",
                span
            )));
        }
        if sub_windows == 0 {
            return Err(PredictError::InvalidConfig(
                "a window needs at least one sub-window".to_string(),
            ));
        }
        Ok(Self {
            span,
            sub_windows,
            step,
        })
    }

    /// Split `records` (sorted by `EVENT_TIME`) into complete windows.
    /// Every timestamp is parsed up front; one bad record fails the whole call.
    pub fn partition<'a>(&self, records: &'a [LogRecord]) -> Result<Vec<Window<'a>>> {
        if records.is_empty() {
            return Err(PredictError::InvalidInput(EMPTY_INPUT_MESSAGE.to_string()));
        }
        let times = records
            .iter()
            .map(LogRecord::timestamp)
            .collect::<Result<Vec<_>>>()?;

        let (windows, discarded) = match self.step {
            StepPolicy::Rolling => self.rolling(records, &times)?,
            StepPolicy::Tiled => self.tiled(records, &times)?,
        };
        debug!(
            records = records.len(),
            windows = windows.len(),
            discarded,
            step = ?self.step,
            "partitioned records"
        );
        Ok(windows)
    }

    /// `t` plus one span; a boundary past the representable range is an error.
    fn advance(&self, t: NaiveDateTime) -> Result<NaiveDateTime> {
        t.checked_add_signed(self.span).ok_or_else(|| {
            PredictError::InvalidInput(format!(
                "sub-window boundary {} + {} is out of range",
                t, self.span
            ))
        })
    }

    fn rolling<'a>(
        &self,
        records: &'a [LogRecord],
        times: &[NaiveDateTime],
    ) -> Result<(Vec<Window<'a>>, usize)> {
        let mut windows = Vec::new();
        let mut discarded = 0;
        let mut first_start = times[0];
        let mut cursor = 0;
        while cursor < records.len() {
            let first_end = self.advance(first_start)?;
            let (subs, _, _) = self.collect(records, times, cursor, first_start)?;
            while cursor < records.len() && times[cursor] < first_end {
                cursor += 1;
            }
            first_start = first_end;
            if subs.len() == self.sub_windows {
                windows.push(Window::new(subs));
            } else {
                discarded += 1;
            }
        }
        Ok((windows, discarded))
    }

    fn tiled<'a>(
        &self,
        records: &'a [LogRecord],
        times: &[NaiveDateTime],
    ) -> Result<(Vec<Window<'a>>, usize)> {
        let mut windows = Vec::new();
        let mut discarded = 0;
        let mut start = times[0];
        let mut cursor = 0;
        while cursor < records.len() {
            let (subs, next, next_start) = self.collect(records, times, cursor, start)?;
            cursor = next;
            start = next_start;
            if subs.len() == self.sub_windows {
                windows.push(Window::new(subs));
            } else {
                discarded += 1;
            }
        }
        Ok((windows, discarded))
    }

    /// Fill up to `sub_windows` consecutive sub-windows, the first starting
    /// at `start`. Stops early when the records run out. Returns the
    /// sub-windows, the cursor after them and the start of the next sub-window.
    fn collect<'a>(
        &self,
        records: &'a [LogRecord],
        times: &[NaiveDateTime],
        mut cursor: usize,
        mut start: NaiveDateTime,
    ) -> Result<(Vec<SubWindow<'a>>, usize, NaiveDateTime)> {
        let mut subs = Vec::with_capacity(self.sub_windows);
        while subs.len() < self.sub_windows && cursor < records.len() {
            let end = self.advance(start)?;
            let begin = cursor;
            while cursor < records.len() && times[cursor] < end {
                cursor += 1;
            }
            subs.push(SubWindow::new(start, end, &records[begin..cursor]));
            start = end;
        }
        Ok((subs, cursor, start))
    }
}
