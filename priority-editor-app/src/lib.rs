//! Platform-agnostic bootstrap for the Priority editor.
//!
//! Provides `EditorConfig` (JSON configuration), the REST `HttpEntityService`,
//! the channel-backed `ChannelConfirmationGate`, and `EditorAppBuilder` to wire them
//! into an `Editor` session.

pub mod adapters;
pub mod config;
mod utils;

use std::sync::Arc;

use priority_editor_core::error::{CoreError, CoreResult};
use priority_editor_core::services::Editor;
use priority_editor_core::traits::{ConfirmationGate, EntityService, FormEntity};
use priority_editor_core::types::Priority;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use adapters::{ChannelConfirmationGate, ConfirmationRequest, HttpEntityService};
pub use config::EditorConfig;

/// Editor session for `Priority` records
pub type PriorityEditor = Editor<Priority>;

/// Builder for constructing an `Editor` with platform-specific adapters.
///
/// # Required adapters
/// - `confirmation_gate`: how delete confirmations reach the user
///
/// # Optional
/// - `config`: defaults to `EditorConfig::default()`
/// - `entity_service`: defaults to `HttpEntityService` built from the config
pub struct EditorAppBuilder<E: FormEntity> {
    config: EditorConfig,
    entity_service: Option<Arc<dyn EntityService<E>>>,
    confirmation_gate: Option<Arc<dyn ConfirmationGate>>,
}

impl<E> EditorAppBuilder<E>
where
    E: FormEntity + Serialize + DeserializeOwned,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            entity_service: None,
            confirmation_gate: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn entity_service(mut self, service: Arc<dyn EntityService<E>>) -> Self {
        self.entity_service = Some(service);
        self
    }

    #[must_use]
    pub fn confirmation_gate(mut self, gate: Arc<dyn ConfirmationGate>) -> Self {
        self.confirmation_gate = Some(gate);
        self
    }

    /// Build the `Editor` (in new-entry mode, nothing loaded yet).
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the gate is missing or the config is invalid.
    pub fn build(self) -> CoreResult<Editor<E>> {
        self.config.validate()?;
        let gate = self
            .confirmation_gate
            .ok_or_else(|| CoreError::Config("confirmation_gate is required".to_string()))?;
        let service: Arc<dyn EntityService<E>> = match self.entity_service {
            Some(service) => service,
            None => {
                log::info!("Using REST service at {}", self.config.collection_url()?);
                Arc::new(HttpEntityService::<E>::new(&self.config)?)
            }
        };

        Ok(Editor::new(service, gate).with_listing_route(self.config.listing_route))
    }

    /// Build the `Editor` and load the session entry identifier.
    ///
    /// A failed load does not fail the session: it is recorded in the editor state
    /// so the user can retry.
    pub async fn open(self, id: Option<E::Id>) -> CoreResult<Arc<Editor<E>>> {
        let editor = Arc::new(self.build()?);
        if let Err(e) = editor.load(id).await {
            log::warn!("Editor opened with a failed load: {e}");
        }
        Ok(editor)
    }
}

impl<E> Default for EditorAppBuilder<E>
where
    E: FormEntity + Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new()
    }
}
