//! Collaborator wire types and the uniform result shape

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// OPERATIONS
// ============================================================================

/// Remote operations this client performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    Report,
}

impl Operation {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Register => "/register",
            Self::Login => "/login",
            Self::Report => "/report",
        }
    }

    /// Message used when the collaborator declines without saying why
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            Self::Register => "Registration failed",
            Self::Login => "Login failed",
            Self::Report => "Failed to fetch report data",
        }
    }

    /// Message used when the collaborator could not be reached or understood
    pub fn network_fallback(&self) -> &'static str {
        match self {
            Self::Register => "Network error during registration",
            Self::Login => "Network error during login",
            Self::Report => "Network error while fetching report data",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Register => "register",
            Self::Login => "login",
            Self::Report => "report",
        };
        write!(f, "{}", name)
    }
}

// ============================================================================
// RESULT SHAPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Unreachable service or unreadable response
    Transport,
    /// The collaborator answered and declined
    Application,
    /// Rejected locally, nothing was sent
    Validation,
}

/// Every way an operation can fail, reduced to one message
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    /// HTTP status, when the collaborator answered
    pub status: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Application,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Validation,
            status: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T> {
    pub message: Option<String>,
    pub data: T,
}

pub type ApiResult<T> = Result<ApiSuccess<T>, ApiFailure>;

/// Response envelope shared by the collaborator and this client's JSON API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: Option<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            success: true,
            message,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(ok) => Self::success(ok.message, ok.data),
            Err(failure) => Self::error(failure.message),
        }
    }
}

/// Error body of a non-2xx response. Accepts `error` as used by some gateways.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

// ============================================================================
// REQUESTS / PAYLOADS
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Report filter, sent as query string or JSON body
#[derive(Debug, Default, Serialize)]
pub struct ReportQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterData {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub similarity: f64,
    pub threshold: f64,
}
