//! Threshold Configuration
//!
//! Bounds for the similarity cutoff chosen on this side. A display threshold
//! only moves the reference line; a login threshold is forwarded to the
//! collaborator for one decision.

use serde::Serialize;
use thiserror::Error;

/// Lowest cutoff the UI controls offer
pub const MIN_THRESHOLD: f64 = 0.5;

/// Highest cutoff the UI controls offer
pub const MAX_THRESHOLD: f64 = 1.0;

/// Cutoff used when neither the caller nor the configuration picks one
pub const DEFAULT_THRESHOLD: f64 = 0.88;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("Threshold must be a number")]
    NotANumber,

    #[error("Threshold must be between {min:.2} and {max:.2}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Threshold used to draw and describe a report. Always finite and within
/// [`MIN_THRESHOLD`, `MAX_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DisplayThreshold(f64);

impl DisplayThreshold {
    /// Clamp into bounds; non-finite values are rejected
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::NotANumber);
        }
        Ok(Self(value.clamp(MIN_THRESHOLD, MAX_THRESHOLD)))
    }

    pub fn parse(raw: &str) -> Result<Self, ThresholdError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ThresholdError::NotANumber)?;
        Self::new(value)
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    /// True when the score sits at or above the cutoff
    pub fn admits(&self, similarity: f64) -> bool {
        similarity >= self.0
    }
}

impl Default for DisplayThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl std::fmt::Display for DisplayThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check a login threshold before it is sent upstream. Unlike the display
/// threshold this is never clamped.
pub fn check_login_threshold(value: f64) -> Result<f64, ThresholdError> {
    if !value.is_finite() {
        return Err(ThresholdError::NotANumber);
    }
    if !(MIN_THRESHOLD..=MAX_THRESHOLD).contains(&value) {
        return Err(ThresholdError::OutOfRange {
            value,
            min: MIN_THRESHOLD,
            max: MAX_THRESHOLD,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_threshold_clamps() {
        assert_eq!(DisplayThreshold::new(0.2).unwrap().get(), MIN_THRESHOLD);
        assert_eq!(DisplayThreshold::new(1.4).unwrap().get(), MAX_THRESHOLD);
        assert_eq!(DisplayThreshold::new(0.88).unwrap().get(), 0.88);
    }

    #[test]
    fn test_display_threshold_rejects_non_finite() {
        assert_eq!(DisplayThreshold::new(f64::NAN), Err(ThresholdError::NotANumber));
        assert_eq!(DisplayThreshold::new(f64::INFINITY), Err(ThresholdError::NotANumber));
        assert_eq!(DisplayThreshold::parse("abc"), Err(ThresholdError::NotANumber));
        assert_eq!(DisplayThreshold::parse("NaN"), Err(ThresholdError::NotANumber));
    }

    #[test]
    fn test_display_threshold_parse() {
        assert_eq!(DisplayThreshold::parse(" 0.93 ").unwrap().get(), 0.93);
        assert_eq!(DisplayThreshold::default().get(), DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_admits_is_inclusive() {
        let t = DisplayThreshold::new(0.9).unwrap();
        assert!(t.admits(0.9));
        assert!(t.admits(0.95));
        assert!(!t.admits(0.8999));
    }

    #[test]
    fn test_login_threshold_rejects_out_of_range() {
        assert_eq!(check_login_threshold(0.75), Ok(0.75));
        assert_eq!(check_login_threshold(1.0), Ok(1.0));
        assert!(matches!(
            check_login_threshold(0.3),
            Err(ThresholdError::OutOfRange { .. })
        ));
        assert_eq!(check_login_threshold(f64::NAN), Err(ThresholdError::NotANumber));

        let message = check_login_threshold(1.2).unwrap_err().to_string();
        assert_eq!(message, "Threshold must be between 0.50 and 1.00");
    }
}
