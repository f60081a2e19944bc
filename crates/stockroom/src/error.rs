//! Error types for the assistant.
//!
//! These never reach the chat user directly; the assistant turns them into a
//! generic reply and an error event.

use stockroom_store::StoreError;
use thiserror::Error;

/// Errors that can occur while handling a message.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Audit details could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;
