//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

use crate::types::ValidationErrors;

/// Error reported by an `EntityService` implementation
///
/// The core never inspects transport details; adapters map whatever their
/// transport produces onto these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ServiceError {
    /// The requested entity does not exist
    #[error("Entity not found: {id}")]
    NotFound { id: String },

    /// The service refused the payload (server-side validation, conflict)
    #[error("Rejected by service (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Connection refused, DNS failure, 5xx gateway errors, ...
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Any other non-success response
    #[error("Unexpected response (HTTP {status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl ServiceError {
    /// Whether the failure is caused by the request itself rather than the service being unhealthy.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Rejected { .. })
    }
}

/// Core layer error type
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A service call failed
    #[error("{0}")]
    Service(#[from] ServiceError),

    /// The form buffer failed local validation (never reaches the service)
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// Another submit/delete/load is still in flight
    #[error("Another operation is already in progress")]
    Busy,

    /// Delete requested for an entity that has never been persisted
    #[error("Entity has not been persisted yet")]
    NotPersisted,

    /// The editor session was torn down
    #[error("Editor session is closed")]
    SessionClosed,

    /// A newer load replaced the operation before its response arrived
    #[error("Operation superseded by a newer load")]
    Superseded,

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Busy
            | Self::NotPersisted
            | Self::SessionClosed
            | Self::Superseded => true,
            Self::Service(e) => e.is_expected(),
            Self::Config(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Result type returned by `EntityService` operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
