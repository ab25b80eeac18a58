use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::activation::DeliveryMessage;
use crate::ids::ExtensionAddress;

#[derive(Debug, Error)]
pub enum ExtensionRuntimeError {
    #[error("extension runtime unavailable")]
    Unavailable,

    /// Nothing is listening at the address, or the channel broke.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("extension closed the channel without replying")]
    NoReply,

    #[error("reply is not valid json: {0}")]
    InvalidReply(String),
}

/// Messaging runtime able to reach locally installed extensions.
#[async_trait]
pub trait ExtensionRuntimePort: Send + Sync {
    /// Whether this environment can reach local extensions at all.
    fn is_available(&self) -> bool;

    /// Send one message and await the single reply.
    async fn send_message(
        &self,
        address: &ExtensionAddress,
        message: &DeliveryMessage<'_>,
    ) -> Result<Value, ExtensionRuntimeError>;
}
