//! Editor configuration
//!
//! Stored as camelCase JSON. Every key is optional; missing keys fall back to defaults.
//!
//! ```json
//! {
//!   "baseUrl": "http://localhost:8080/api",
//!   "resource": "priority",
//!   "timeoutSecs": 30,
//!   "listingRoute": "/priority/list"
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use priority_editor_core::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use url::Url;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Service root
    pub base_url: String,
    /// Collection path segment under `base_url`
    pub resource: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Where control returns after a successful delete
    pub listing_route: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            resource: "priority".to_string(),
            timeout_secs: 30,
            listing_route: "/priority/list".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::info!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.timeout_secs == 0 {
            return Err(CoreError::Config("timeoutSecs must be positive".to_string()));
        }
        if self.resource.trim_matches('/').is_empty() {
            return Err(CoreError::Config("resource must not be empty".to_string()));
        }
        self.collection_url().map(|_| ())
    }

    /// `{baseUrl}/{resource}`
    pub fn collection_url(&self) -> CoreResult<Url> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        let base = Url::parse(&base)
            .map_err(|e| CoreError::Config(format!("invalid baseUrl {:?}: {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "baseUrl must use http or https, got {}",
                base.scheme()
            )));
        }
        base.join(self.resource.trim_matches('/'))
            .map_err(|e| CoreError::Config(format!("invalid resource {:?}: {e}", self.resource)))
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
