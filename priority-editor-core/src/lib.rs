//! Priority Editor Core Library
//!
//! Provides the single-entity editor workflow:
//! - Form buffering and validation (`FormBuffer`)
//! - The create / update / delete state machine (`EditorState`)
//! - The async editor session wiring it to a remote service (`Editor`)
//!
//! This library is platform-independent: persistence is abstracted behind `EntityService`
//! and destructive-action confirmation behind `ConfirmationGate`.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ServiceError, ServiceResult};
pub use services::{Editor, EditorState, FormBuffer};
pub use traits::{ConfirmationGate, ConfirmationPrompt, Decision, EntityService, FormEntity};
pub use types::Priority;
