//! Redundancy filter: drops records whose message repeats an earlier kept
//! record closely in time. Similarity is the phi coefficient over word
//! presence against a dictionary of every word seen in the log.

use crate::error::Result;
use crate::records::LogRecord;
use std::collections::HashSet;
use tracing::info;

/// Gaps above this stop the look-ahead from a kept record.
pub const LOOKAHEAD_SECS: i64 = 20 * 60;

/// Correlation a later record must exceed to count as a repeat.
pub fn required_correlation(gap_secs: f64) -> f64 {
    if gap_secs > 10.0 * 60.0 {
        0.9
    } else if gap_secs > 5.0 * 60.0 {
        0.8
    } else if gap_secs > 60.0 {
        0.7
    } else {
        0.0
    }
}

fn words(record: &LogRecord) -> HashSet<&str> {
    record
        .message
        .as_deref()
        .unwrap_or("")
        .split_whitespace()
        .collect()
}

/// Phi coefficient of two word sets over a dictionary of `dictionary_len`
/// words that contains both. A degenerate contingency table counts as fully
/// correlated when the sets are equal and uncorrelated otherwise.
pub fn phi(a: &HashSet<&str>, b: &HashSet<&str>, dictionary_len: usize) -> f64 {
    let both = a.intersection(b).count();
    let only_a = a.len() - both;
    let only_b = b.len() - both;
    let neither = dictionary_len.saturating_sub(both + only_a + only_b);

    let (n11, n10, n01, n00) = (both as f64, only_a as f64, only_b as f64, neither as f64);
    let denominator = ((n00 + n10) * (n01 + n11) * (n00 + n01) * (n10 + n11)).sqrt();
    if denominator == 0.0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    (n11 * n00 - n10 * n01) / denominator
}

#[derive(Debug, Default)]
pub struct RedundancyFilter;

impl RedundancyFilter {
    pub fn new() -> Self {
        Self
    }

    /// Keep the first of every run of correlated records. Input order is kept.
    pub fn filter(&self, records: Vec<LogRecord>) -> Result<Vec<LogRecord>> {
        let times = records
            .iter()
            .map(LogRecord::timestamp)
            .collect::<Result<Vec<_>>>()?;
        let word_sets: Vec<HashSet<&str>> = records.iter().map(words).collect();
        let dictionary_len = word_sets
            .iter()
            .flatten()
            .copied()
            .collect::<HashSet<&str>>()
            .len();

        let mut suppressed = vec![false; records.len()];
        for i in 0..records.len() {
            if suppressed[i] {
                continue;
            }
            for j in i + 1..records.len() {
                if suppressed[j] {
                    continue;
                }
                let gap = (times[j] - times[i]).num_milliseconds() as f64 / 1000.0;
                if gap > LOOKAHEAD_SECS as f64 {
                    break;
                }
                if phi(&word_sets[i], &word_sets[j], dictionary_len) > required_correlation(gap) {
                    suppressed[j] = true;
                }
            }
        }

        let before = records.len();
        let kept: Vec<LogRecord> = records
            .into_iter()
            .zip(suppressed)
            .filter_map(|(r, s)| (!s).then_some(r))
            .collect();
        info!(before, after = kept.len(), "filtered redundant records");
        Ok(kept)
    }
}
