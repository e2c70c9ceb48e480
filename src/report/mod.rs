//! Login Attempt Report Pipeline
//!
//! ```text
//! raw attempts ──► normalize ──► build_dataset ──► ChartDataset
//!                      │
//!                      └──────► summarize ──────► ReportSummary
//! ```
//!
//! Everything here is a pure function of (attempts, params). A `ReportView`
//! is rebuilt whenever a report is fetched or the display threshold changes.

pub mod dataset;
pub mod normalize;
pub mod summary;
pub mod threshold;

#[cfg(test)]
mod tests;

pub use dataset::{build_dataset, ChartDataset, PlotPoint, RealPoint, ReferencePoint};
pub use normalize::{normalize, NormalizedAttempt, DEFAULT_WINDOW};
pub use summary::{summarize, ReportSummary};
pub use threshold::{DisplayThreshold, ThresholdError};

use serde::Serialize;

use crate::models::AttemptRecord;

/// View settings passed into the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportParams {
    pub window: usize,
    pub threshold: DisplayThreshold,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: DisplayThreshold::default(),
        }
    }
}

/// Chart-ready report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub threshold: DisplayThreshold,
    pub window: Vec<NormalizedAttempt>,
    pub dataset: ChartDataset,
    pub summary: ReportSummary,
}

impl ReportView {
    pub fn build(records: &[AttemptRecord], params: ReportParams) -> Self {
        let window = normalize(records, params.window);
        let dataset = build_dataset(&window, params.threshold);
        let summary = summarize(&window, params.threshold);

        Self {
            threshold: params.threshold,
            window,
            dataset,
            summary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
