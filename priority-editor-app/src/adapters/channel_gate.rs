//! Channel-backed `ConfirmationGate`
//!
//! The editor sends a `ConfirmationRequest` to the presentation layer and waits for the
//! decision on a oneshot reply. A closed channel or a dropped reply counts as `Abort`.

use async_trait::async_trait;
use priority_editor_core::traits::{ConfirmationGate, ConfirmationPrompt, Decision};
use tokio::sync::{mpsc, oneshot};

/// A pending confirmation, to be answered exactly once
#[derive(Debug)]
pub struct ConfirmationRequest {
    pub prompt: ConfirmationPrompt,
    reply: oneshot::Sender<Decision>,
}

impl ConfirmationRequest {
    pub fn respond(self, decision: Decision) {
        if self.reply.send(decision).is_err() {
            log::debug!(
                "Confirmation for [{}] answered after the editor stopped waiting",
                self.prompt.label
            );
        }
    }

    pub fn proceed(self) {
        self.respond(Decision::Proceed);
    }

    pub fn abort(self) {
        self.respond(Decision::Abort);
    }
}

/// `ConfirmationGate` that forwards prompts over an mpsc channel
#[derive(Clone)]
pub struct ChannelConfirmationGate {
    tx: mpsc::Sender<ConfirmationRequest>,
}

impl ChannelConfirmationGate {
    /// Create the gate and the receiver the presentation layer listens on
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<ConfirmationRequest>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ConfirmationGate for ChannelConfirmationGate {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> Decision {
        let (reply, decision) = oneshot::channel();
        let request = ConfirmationRequest {
            prompt: prompt.clone(),
            reply,
        };

        if self.tx.send(request).await.is_err() {
            log::warn!("Confirmation channel closed, treating [{}] as aborted", prompt.label);
            return Decision::Abort;
        }

        decision.await.unwrap_or_else(|_| {
            log::warn!("Confirmation for [{}] dropped without an answer", prompt.label);
            Decision::Abort
        })
    }
}
