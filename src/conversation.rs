//! The conversation a command arrived in, as seen by the pipeline.
//!
//! The chat client implements this trait; tests substitute a recording mock.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// A file to send into the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub path: PathBuf,
    pub file_name: String,
}

#[async_trait]
pub trait Conversation: Send + Sync {
    /// Reply to the message that triggered the command.
    async fn reply(&self, text: &str) -> Result<(), DeliveryError>;

    /// Send a file into the channel the command came from.
    async fn send_attachment(&self, attachment: &Attachment) -> Result<(), DeliveryError>;
}

/// One inbound chat message.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub content: Option<String>,
    pub sender_is_automated: bool,
}

impl InboundMessage {
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            sender_is_automated: false,
        }
    }
}
