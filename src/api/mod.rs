//! Collaborator API contract
//!
//! Three remote operations (register, login, report) and the uniform result
//! every one of them resolves to.

pub mod client;
pub mod types;


pub use client::{ClientConfig, CollaboratorClient, ReportMethod};
pub use types::{
    ApiFailure, ApiResponse, ApiResult, ApiSuccess, FailureKind, LoginData, Operation,
    RegisterData,
};
