//! Chart dataset
//!
//! Splits a normalized window into success and failure series and adds the
//! threshold reference line.

use serde::Serialize;

use super::normalize::NormalizedAttempt;
use super::threshold::DisplayThreshold;

/// A plotted attempt. Carries what the tooltip needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealPoint {
    pub x: usize,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub input: String,
    pub timestamp: String,
    pub passed: bool,
}

/// Endpoint of the threshold line. Not backed by any attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoint {
    pub x: usize,
    pub y: f64,
}

/// Either kind of point, for renderers walking the whole chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlotPoint<'a> {
    Real(&'a RealPoint),
    Reference(&'a ReferencePoint),
}

impl PlotPoint<'_> {
    pub fn x(&self) -> usize {
        match self {
            Self::Real(p) => p.x,
            Self::Reference(p) => p.x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            Self::Real(p) => p.y,
            Self::Reference(p) => p.y,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDataset {
    pub success_series: Vec<RealPoint>,
    pub failure_series: Vec<RealPoint>,
    /// Empty when there is no data, otherwise exactly two points
    pub threshold_line: Vec<ReferencePoint>,
}

impl ChartDataset {
    pub fn is_empty(&self) -> bool {
        self.success_series.is_empty() && self.failure_series.is_empty()
    }

    /// Number of attempts plotted
    pub fn len(&self) -> usize {
        self.success_series.len() + self.failure_series.len()
    }

    /// Every point, attempts first, then the reference line
    pub fn plot_points(&self) -> impl Iterator<Item = PlotPoint<'_>> {
        self.success_series
            .iter()
            .chain(self.failure_series.iter())
            .map(PlotPoint::Real)
            .chain(self.threshold_line.iter().map(PlotPoint::Reference))
    }
}

/// Build the chart dataset for a normalized window
pub fn build_dataset(window: &[NormalizedAttempt], threshold: DisplayThreshold) -> ChartDataset {
    if window.is_empty() {
        return ChartDataset::default();
    }

    let (success_series, failure_series): (Vec<RealPoint>, Vec<RealPoint>) = window
        .iter()
        .map(|attempt| RealPoint {
            x: attempt.position,
            y: attempt.similarity,
            subject: attempt.subject.clone(),
            input: attempt.input.clone(),
            timestamp: attempt.timestamp.clone(),
            passed: attempt.passed,
        })
        .partition(|point| point.passed);

    // Anchored one step outside the data so the line spans the whole plot
    let y = threshold.get();
    let threshold_line = vec![
        ReferencePoint { x: 0, y },
        ReferencePoint { x: window.len() + 1, y },
    ];

    tracing::debug!(
        success = success_series.len(),
        failure = failure_series.len(),
        total = window.len(),
        "Built chart dataset"
    );

    ChartDataset {
        success_series,
        failure_series,
        threshold_line,
    }
}
