//! Platform-agnostic adapters for the editor's collaborators.

mod channel_gate;
mod http;

pub use channel_gate::{ChannelConfirmationGate, ConfirmationRequest};
pub use http::HttpEntityService;
