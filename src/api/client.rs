//! Collaborator API Client
//!
//! HTTP client for the service that owns credentials and similarity scoring.
//! Every call resolves to an `ApiResult`; transport and parse faults are
//! logged here and reduced to a message.

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{
    ApiFailure, ApiResponse, ApiResult, ApiSuccess, ErrorBody, LoginData, LoginRequest,
    Operation, RegisterData, RegisterRequest, ReportQuery,
};
use crate::models::AttemptRecord;
use crate::report::threshold::check_login_threshold;

/// How the report filter travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMethod {
    /// `GET /report?username=..&threshold=..`
    #[default]
    Get,
    /// `POST /report` with a JSON body
    Post,
}

impl std::str::FromStr for ReportMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            other => Err(format!("unknown report method '{}'", other)),
        }
    }
}

/// Collaborator connection settings
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` leaves the transport default in place
    pub timeout: Option<Duration>,
    pub report_method: ReportMethod,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            report_method: ReportMethod::default(),
        }
    }
}

/// Collaborator API client
#[derive(Debug, Clone)]
pub struct CollaboratorClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl CollaboratorClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            http_client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, op: Operation) -> String {
        format!("{}{}", self.config.base_url, op.path())
    }

    /// Register a credential
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<RegisterData> {
        let (username, password) = check_credentials(username, password)?;

        tracing::info!(username, "Registering with collaborator");

        let request = self
            .http_client
            .post(self.url(Operation::Register))
            .json(&RegisterRequest { username, password });

        let ok = self.dispatch::<RegisterData>(Operation::Register, request).await?;
        Ok(ApiSuccess {
            message: ok.message,
            data: ok.data.unwrap_or_else(|| RegisterData {
                username: username.to_string(),
            }),
        })
    }

    /// Log in. `threshold` overrides the collaborator's cutoff for this
    /// decision only.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        threshold: Option<f64>,
    ) -> ApiResult<LoginData> {
        let (username, password) = check_credentials(username, password)?;
        let threshold = threshold
            .map(check_login_threshold)
            .transpose()
            .map_err(|e| ApiFailure::validation(e.to_string()))?;

        tracing::info!(username, ?threshold, "Logging in with collaborator");

        let request = self
            .http_client
            .post(self.url(Operation::Login))
            .json(&LoginRequest {
                username,
                password,
                threshold,
            });

        let ok = self.dispatch::<LoginData>(Operation::Login, request).await?;
        match ok.data {
            Some(data) => Ok(ApiSuccess {
                message: ok.message,
                data,
            }),
            None => {
                tracing::warn!("Login succeeded without a payload");
                Err(ApiFailure::transport(Operation::Login.network_fallback()))
            }
        }
    }

    /// Fetch login attempts. An empty `subject` means every subject. The
    /// threshold is forwarded as-is; nothing is filtered here.
    pub async fn get_report(
        &self,
        subject: Option<&str>,
        threshold: Option<f64>,
    ) -> ApiResult<Vec<AttemptRecord>> {
        let query = ReportQuery {
            username: subject
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            threshold: threshold.filter(|t| t.is_finite()),
        };

        tracing::info!(subject = ?query.username, threshold = ?query.threshold, "Fetching report");

        let url = self.url(Operation::Report);
        let request = match self.config.report_method {
            ReportMethod::Get => self.http_client.get(url).query(&query),
            ReportMethod::Post => self.http_client.post(url).json(&query),
        };

        let ok = self
            .dispatch::<Vec<AttemptRecord>>(Operation::Report, request)
            .await?;
        let records = ok.data.unwrap_or_default();

        tracing::debug!(count = records.len(), "Report received");
        Ok(ApiSuccess {
            message: ok.message,
            data: records,
        })
    }

    /// Probe the collaborator's health endpoint
    pub async fn health_check(&self) -> Result<String, ApiFailure> {
        let url = format!("{}/health", self.config.base_url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Collaborator health check failed: {}", e);
            ApiFailure::transport("Collaborator unreachable")
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!("Failed to read health check body: {}", e);
            ApiFailure::transport("Collaborator unreachable")
        })?;
        if status.is_success() {
            Ok(body.trim().to_string())
        } else {
            Err(ApiFailure::application(
                status.as_u16(),
                format!("Server error: {}", status.as_u16()),
            ))
        }
    }

    /// Send a request and fold every outcome into `ApiResult`
    async fn dispatch<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> ApiResult<Option<T>> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(operation = %op, "Request failed: {}", e);
            ApiFailure::transport(op.network_fallback())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(operation = %op, "Failed to read response body: {}", e);
            ApiFailure::transport(op.network_fallback())
        })?;

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(operation = %op, status = status.as_u16(), "Collaborator rejected request: {}", message);
            return Err(ApiFailure::application(status.as_u16(), message));
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(operation = %op, "Malformed response body: {}", e);
            ApiFailure::transport(op.network_fallback())
        })?;

        if !envelope.success {
            let message = non_empty(envelope.message)
                .unwrap_or_else(|| op.failure_fallback().to_string());
            tracing::warn!(operation = %op, "Collaborator declined: {}", message);
            return Err(ApiFailure::application(status.as_u16(), message));
        }

        Ok(ApiSuccess {
            message: non_empty(envelope.message),
            data: envelope.data,
        })
    }
}

fn check_credentials<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), ApiFailure> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ApiFailure::validation("Missing username or password"));
    }
    Ok((username, password))
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| non_empty(b.message))
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|m| !m.trim().is_empty())
}
