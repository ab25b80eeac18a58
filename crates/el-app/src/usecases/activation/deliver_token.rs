use std::sync::Arc;
use std::time::Duration;

use el_core::activation::{
    classify_reply, ActivationError, DeliveryMessage, DeliveryOutcome, DeliveryTicket,
};
use el_core::ports::{ExtensionRuntimeError, ExtensionRuntimePort};
use tracing::{debug, info, warn};

/// Use case for one delivery attempt of the bearer token to the local extension.
///
/// Every call concludes in exactly one [`DeliveryOutcome`]; transport errors,
/// malformed replies and timeouts are all folded into `DeliveryRejected`.
pub struct DeliverTokenToExtension {
    runtime: Arc<dyn ExtensionRuntimePort>,
    timeout: Duration,
}

impl DeliverTokenToExtension {
    pub fn new(runtime: Arc<dyn ExtensionRuntimePort>, timeout: Duration) -> Self {
        Self { runtime, timeout }
    }

    pub async fn execute(&self, ticket: &DeliveryTicket) -> DeliveryOutcome {
        if !self.runtime.is_available() {
            warn!(attempt = %ticket.attempt, "extension runtime unavailable, nothing sent");
            return DeliveryOutcome::Failed(ActivationError::RuntimeUnavailable);
        }

        let message = DeliveryMessage::set_token(&ticket.token);
        debug!(
            attempt = %ticket.attempt,
            address = %ticket.address,
            "sending token to extension"
        );

        let reply = tokio::time::timeout(
            self.timeout,
            self.runtime.send_message(&ticket.address, &message),
        )
        .await;

        let outcome = match reply {
            Err(_elapsed) => DeliveryOutcome::rejected(format!(
                "no reply within {} ms",
                self.timeout.as_millis()
            )),
            Ok(Err(ExtensionRuntimeError::Unavailable)) => {
                DeliveryOutcome::Failed(ActivationError::RuntimeUnavailable)
            }
            Ok(Err(err)) => DeliveryOutcome::rejected(err.to_string()),
            Ok(Ok(reply)) => classify_reply(&reply),
        };

        match &outcome {
            DeliveryOutcome::Success => {
                info!(attempt = %ticket.attempt, address = %ticket.address, "extension acknowledged token")
            }
            DeliveryOutcome::Failed(reason) => {
                warn!(attempt = %ticket.attempt, address = %ticket.address, reason = %reason, "token delivery failed")
            }
        }
        outcome
    }
}
