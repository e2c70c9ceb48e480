//! Text formatting shared by pages and the chart

use crate::api::LoginData;
use crate::models::parse_timestamp;
use crate::report::RealPoint;

pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Similarity with four decimals
pub fn similarity(value: f64) -> String {
    format!("{:.4}", value)
}

pub fn status_label(passed: bool) -> &'static str {
    if passed {
        "Success"
    } else {
        "Failure"
    }
}

/// Human-readable timestamp; the raw string when it cannot be parsed
pub fn timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Tooltip lines for a plotted attempt
pub fn tooltip_lines(point: &RealPoint) -> Vec<String> {
    let input = if point.input.is_empty() {
        "N/A"
    } else {
        point.input.as_str()
    };

    vec![
        format!("Password Input: {}", input),
        format!("Similarity: {}", similarity(point.y)),
        format!("Status: {}", status_label(point.passed)),
        format!("Time: {}", point.timestamp),
    ]
}

pub fn login_confirmation(data: &LoginData) -> String {
    format!(
        "Login successful! Similarity: {} (threshold {:.2})",
        similarity(data.similarity),
        data.threshold
    )
}
