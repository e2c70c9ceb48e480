//! Report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_threshold, threshold_or_default};
use crate::api::{ApiFailure, ApiResponse};
use crate::render::{report_page, Notice, ReportPage};
use crate::report::{DisplayThreshold, ReportParams, ReportView};
use crate::session::{CachedReport, Stored};
use crate::{AppResult, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub username: Option<String>,
    pub threshold: Option<String>,
    /// Cache number of the report to redraw
    pub report: Option<u64>,
}

impl ReportQuery {
    fn subject(&self) -> Option<&str> {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ReportPayload {
    pub seq: u64,
    /// A later fetch for the same subject landed first; `view` is built from it
    pub stale: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub view: ReportView,
}

struct Fetched {
    report: CachedReport,
    stale: bool,
}

/// Fetch a report and offer it to the cache. The result always belongs to
/// the requested subject.
async fn fetch_report(
    state: &AppState,
    subject: Option<&str>,
    threshold: DisplayThreshold,
) -> Result<Fetched, ApiFailure> {
    let seq = state.reports.begin();
    let ok = state.client.get_report(subject, Some(threshold.get())).await?;

    let report = CachedReport {
        seq,
        subject: subject.map(str::to_string),
        records: Arc::new(ok.data),
        fetched_at: Utc::now(),
    };

    Ok(match state.reports.store(report) {
        Stored::Fresh(report) => Fetched {
            report,
            stale: false,
        },
        Stored::Superseded(report) => Fetched {
            report,
            stale: true,
        },
    })
}

fn build_view(state: &AppState, report: &CachedReport, threshold: DisplayThreshold) -> ReportView {
    ReportView::build(
        &report.records,
        ReportParams {
            window: state.config.report_window,
            threshold,
        },
    )
}

fn error_page(subject: &str, threshold: DisplayThreshold, message: impl Into<String>) -> Html<String> {
    let notice = Notice::error(message);
    Html(report_page(&ReportPage {
        subject,
        threshold,
        view: None,
        report: None,
        notice: Some(&notice),
    }))
}

/// `GET /report`: fetch and draw
pub async fn page(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Html<String> {
    let subject = query.subject().unwrap_or_default();
    let threshold = match threshold_or_default(query.threshold.as_deref(), &state.config) {
        Ok(threshold) => threshold,
        Err(err) => return error_page(subject, default_threshold(&state.config), err.to_string()),
    };

    match fetch_report(&state, query.subject(), threshold).await {
        Ok(fetched) => {
            let view = build_view(&state, &fetched.report, threshold);
            let notice = fetched
                .stale
                .then(|| Notice::success("A newer report for this user had already arrived and is shown instead."));

            Html(report_page(&ReportPage {
                subject,
                threshold,
                view: Some(&view),
                report: Some(fetched.report.seq),
                notice: notice.as_ref(),
            }))
        }
        Err(failure) => error_page(subject, threshold, failure.message),
    }
}

/// `GET /report/view`: redraw the page's own report at a new threshold
pub async fn redraw(State(state): State<AppState>, Query(query): Query<ReportQuery>) -> Html<String> {
    let fallback = default_threshold(&state.config);

    let Some(seq) = query.report else {
        return error_page("", fallback, "No report loaded yet. Fetch one first.");
    };
    let Some(cached) = state.reports.get(seq) else {
        return error_page("", fallback, "That report is no longer available. Fetch it again.");
    };
    let subject = cached.subject.clone().unwrap_or_default();

    let (threshold, notice) = match threshold_or_default(query.threshold.as_deref(), &state.config) {
        Ok(threshold) => (threshold, None),
        Err(err) => (fallback, Some(Notice::error(err.to_string()))),
    };

    tracing::debug!(seq, %threshold, "Redrawing cached report");
    let view = build_view(&state, &cached, threshold);
    Html(report_page(&ReportPage {
        subject: &subject,
        threshold,
        view: Some(&view),
        report: Some(seq),
        notice: notice.as_ref(),
    }))
}

/// `GET /api/report`: the chart dataset as JSON
pub async fn dataset(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ApiResponse<ReportPayload>>> {
    let threshold = threshold_or_default(query.threshold.as_deref(), &state.config)?;
    let fetched = fetch_report(&state, query.subject(), threshold).await?;
    let view = build_view(&state, &fetched.report, threshold);

    let payload = ReportPayload {
        seq: fetched.report.seq,
        stale: fetched.stale,
        subject: fetched.report.subject.clone(),
        fetched_at: fetched.report.fetched_at,
        view,
    };

    Ok(Json(ApiResponse::success(None, payload)))
}
