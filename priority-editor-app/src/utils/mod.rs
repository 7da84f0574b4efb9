//! Utility modules.

/// Response body summaries for logs and error messages.
pub(crate) mod log_sanitizer;
