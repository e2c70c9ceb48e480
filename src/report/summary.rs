//! Report summary figures

use serde::Serialize;

use super::normalize::NormalizedAttempt;
use super::threshold::DisplayThreshold;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    /// Attempts whose score had to be replaced by 0
    pub invalid_similarity: usize,
    /// Attempts scoring at or above the display threshold
    pub at_or_above_threshold: usize,
    pub pass_rate: Option<f64>,
    pub mean_similarity: Option<f64>,
}

pub fn summarize(window: &[NormalizedAttempt], threshold: DisplayThreshold) -> ReportSummary {
    let total = window.len();
    if total == 0 {
        return ReportSummary::default();
    }

    let successes = window.iter().filter(|a| a.passed).count();
    let invalid_similarity = window.iter().filter(|a| a.invalid_similarity).count();
    let at_or_above_threshold = window
        .iter()
        .filter(|a| threshold.admits(a.similarity))
        .count();
    let sum: f64 = window.iter().map(|a| a.similarity).sum();

    if invalid_similarity > 0 {
        tracing::warn!(invalid_similarity, total, "Report contains invalid similarity values");
    }

    ReportSummary {
        total,
        successes,
        failures: total - successes,
        invalid_similarity,
        at_or_above_threshold,
        pass_rate: Some(successes as f64 / total as f64),
        mean_similarity: Some(sum / total as f64),
    }
}
