//! Collaborator abstraction trait definition

mod confirmation_gate;
mod entity;
mod entity_service;

pub use confirmation_gate::{ConfirmationGate, ConfirmationPrompt, Decision};
pub use entity::FormEntity;
pub use entity_service::EntityService;
