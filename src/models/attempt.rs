//! Login attempt model
//!
//! The collaborator owns these records; this side only reads them. Fields are
//! deserialized leniently because similarity values are not guaranteed to be
//! well-formed numbers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical login attempt as reported by the collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Account the attempt targeted. Absent in single-subject reports.
    #[serde(
        default,
        rename = "username",
        alias = "subject",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject: Option<String>,

    /// Credential string exactly as submitted
    #[serde(default)]
    pub input: String,

    #[serde(default)]
    pub similarity: RawSimilarity,

    /// ISO-8601 timestamp, kept as sent
    #[serde(default)]
    pub timestamp: String,

    /// Verdict recorded by the collaborator at attempt time
    #[serde(default)]
    pub passed: bool,
}

/// Similarity value as it arrived on the wire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSimilarity {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Other(serde_json::Value),
}

impl RawSimilarity {
    /// Finite numeric value, if one can be read
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Missing | Self::Other(_) => return None,
        };

        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawSimilarity {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl AttemptRecord {
    pub fn new(
        input: impl Into<String>,
        similarity: impl Into<RawSimilarity>,
        timestamp: impl Into<String>,
        passed: bool,
    ) -> Self {
        Self {
            subject: None,
            input: input.into(),
            similarity: similarity.into(),
            timestamp: timestamp.into(),
            passed,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Parsed timestamp, `None` when the string is not a recognised format
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Parse RFC 3339 timestamps, falling back to zone-less ISO forms read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
