//! Generic HTTP client tools
//!
//! Unified processing for every REST call: sending the request, logging, mapping the
//! status code onto `ServiceError` and decoding the JSON body.
//! No retries are performed; failures are surfaced to the editor as-is.

use priority_editor_core::error::{ServiceError, ServiceResult};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::utils::log_sanitizer::summarize_body;

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns status code and response text
    ///
    /// # Returns
    /// * `Err(ServiceError::Timeout)` - the request timed out
    /// * `Err(ServiceError::Network)` - connection or body read failure
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        url: &str,
    ) -> ServiceResult<(u16, String)> {
        log::debug!("[http] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ServiceError::Timeout(e.to_string())
            } else {
                ServiceError::Network(e.to_string())
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[http] Response Status: {status_code}");

        let response_text = response
            .text()
            .await
            .map_err(|e| ServiceError::Network(format!("Failed to read response body: {e}")))?;

        log::debug!("[http] Response Body: {}", summarize_body(&response_text));

        Ok((status_code, response_text))
    }

    /// Map a non-success status code onto `ServiceError`
    ///
    /// * `404` -> `NotFound`
    /// * `400` / `409` / `422` -> `Rejected`
    /// * `5xx` -> `Network`
    /// * anything else outside `2xx` -> `Unexpected`
    pub fn check_status(status: u16, body: &str, resource: &str) -> ServiceResult<()> {
        match status {
            200..=299 => Ok(()),
            404 => Err(ServiceError::NotFound {
                id: resource.to_string(),
            }),
            400 | 409 | 422 => Err(ServiceError::Rejected {
                status,
                message: error_message(body),
            }),
            500..=599 => Err(ServiceError::Network(format!(
                "HTTP {status}: {}",
                error_message(body)
            ))),
            _ => Err(ServiceError::Unexpected {
                status,
                message: error_message(body),
            }),
        }
    }

    /// Parse JSON response
    pub fn parse_json<T>(response_text: &str) -> ServiceResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[http] JSON parse failed: {e}");
            log::error!("[http] Raw response: {}", summarize_body(response_text));
            ServiceError::Parse(e.to_string())
        })
    }
}

/// Extract a human readable message from an error body.
///
/// Prefers a `message` or `error` string field of a JSON object, otherwise the (truncated) raw body.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
        });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => summarize_body(body.trim()),
    }
}
