//! Report normalization
//!
//! Orders raw attempts by time, keeps the most recent window and sanitizes
//! similarity scores. Pure; never fails.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::AttemptRecord;

/// Number of attempts a report shows by default
pub const DEFAULT_WINDOW: usize = 100;

/// An attempt after ordering and sanitizing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAttempt {
    /// 1-based sequence position inside the window
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub input: String,
    /// Always within [0, 1]
    pub similarity: f64,
    pub timestamp: String,
    pub passed: bool,
    /// Upstream score was not a finite number and was replaced by 0.
    /// Diagnostic only.
    #[serde(skip)]
    pub invalid_similarity: bool,
}

impl From<&NormalizedAttempt> for AttemptRecord {
    fn from(attempt: &NormalizedAttempt) -> Self {
        AttemptRecord {
            subject: attempt.subject.clone(),
            input: attempt.input.clone(),
            similarity: attempt.similarity.into(),
            timestamp: attempt.timestamp.clone(),
            passed: attempt.passed,
        }
    }
}

/// Sort by timestamp, keep the last `window` records and sanitize them.
///
/// Timestamps that cannot be parsed sort as the Unix epoch. The sort is
/// stable, so ties keep the order the collaborator sent.
pub fn normalize(records: &[AttemptRecord], window: usize) -> Vec<NormalizedAttempt> {
    let mut ordered: Vec<(DateTime<Utc>, &AttemptRecord)> = records
        .iter()
        .map(|record| (sort_key(record), record))
        .collect();
    ordered.sort_by_key(|(key, _)| *key);

    let skip = ordered.len().saturating_sub(window);

    ordered
        .into_iter()
        .skip(skip)
        .enumerate()
        .map(|(idx, (_, record))| sanitize(record, idx + 1))
        .collect()
}

fn sort_key(record: &AttemptRecord) -> DateTime<Utc> {
    match record.parsed_timestamp() {
        Some(ts) => ts,
        None => {
            tracing::debug!(timestamp = %record.timestamp, "Unparseable attempt timestamp, sorting as epoch");
            DateTime::<Utc>::default()
        }
    }
}

fn sanitize(record: &AttemptRecord, position: usize) -> NormalizedAttempt {
    let (similarity, invalid_similarity) = sanitize_similarity(record);

    NormalizedAttempt {
        position,
        subject: record.subject.clone(),
        input: record.input.clone(),
        similarity,
        timestamp: record.timestamp.clone(),
        passed: record.passed,
        invalid_similarity,
    }
}

fn sanitize_similarity(record: &AttemptRecord) -> (f64, bool) {
    match record.similarity.as_finite() {
        // Upstream cosine math can drift slightly past the unit interval
        Some(value) => (value.clamp(0.0, 1.0), false),
        None => {
            tracing::warn!(
                similarity = ?record.similarity,
                timestamp = %record.timestamp,
                "Invalid similarity value, using 0"
            );
            (0.0, true)
        }
    }
}
