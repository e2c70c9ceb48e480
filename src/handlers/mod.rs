//! HTTP handlers

pub mod auth;
pub mod health;
pub mod reports;


use axum::{http::StatusCode, response::Html};
use validator::ValidationErrors;

use crate::config::Config;
use crate::render::not_found_page;
use crate::report::DisplayThreshold;

/// First validation message, in field order
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Display threshold used when a request does not pick one
pub(crate) fn default_threshold(config: &Config) -> DisplayThreshold {
    DisplayThreshold::new(config.default_threshold).unwrap_or_default()
}

/// Parse an optional threshold field; blank means the configured default
pub(crate) fn threshold_or_default(
    raw: Option<&str>,
    config: &Config,
) -> Result<DisplayThreshold, crate::report::ThresholdError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => DisplayThreshold::parse(raw),
        None => Ok(default_threshold(config)),
    }
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(not_found_page()))
}
