//! Delivery message and reply classification.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::activation::ActivationError;
use crate::security::BearerToken;

pub const SET_TOKEN_ACTION: &str = "setToken";

/// Value of the `status` field that proves the extension stored the token.
pub const SUCCESS_MARKER: &str = "success";

/// Payload sent to the extension: `{"action":"setToken","token":"..."}`.
///
/// Borrows the token so the plaintext stays owned by the zeroizing [`BearerToken`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeliveryMessage<'a> {
    pub action: &'static str,
    pub token: &'a BearerToken,
}

impl<'a> DeliveryMessage<'a> {
    pub fn set_token(token: &'a BearerToken) -> Self {
        Self {
            action: SET_TOKEN_ACTION,
            token,
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({ "action": self.action, "token": self.token.expose() })
    }
}

impl Serialize for DeliveryMessage<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DeliveryMessage", 2)?;
        state.serialize_field("action", self.action)?;
        state.serialize_field("token", self.token.expose())?;
        state.end()
    }
}

impl fmt::Debug for DeliveryMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryMessage")
            .field("action", &self.action)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Result of one delivery attempt. There is no third outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Success,
    Failed(ActivationError),
}

impl DeliveryOutcome {
    pub fn rejected(detail: impl Into<String>) -> Self {
        DeliveryOutcome::Failed(ActivationError::DeliveryRejected {
            detail: detail.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success)
    }
}

/// Map an extension reply to an outcome. Only an exact `status == "success"` counts.
pub fn classify_reply(reply: &Value) -> DeliveryOutcome {
    match reply.get("status") {
        Some(Value::String(status)) if status == SUCCESS_MARKER => DeliveryOutcome::Success,
        Some(other) => DeliveryOutcome::rejected(format!("unexpected status {other}")),
        None => DeliveryOutcome::rejected("reply has no status field"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exact_success_marker_is_success() {
        assert_eq!(classify_reply(&json!({"status": "success"})), DeliveryOutcome::Success);
    }

    #[test]
    fn extra_fields_do_not_matter() {
        assert!(classify_reply(&json!({"status": "success", "version": 3})).is_success());
    }

    #[test]
    fn near_misses_are_rejected() {
        for reply in [
            json!({}),
            json!({"status": "Success"}),
            json!({"status": "success "}),
            json!({"status": "ok"}),
            json!({"status": true}),
            json!({"result": "success"}),
            json!("success"),
            Value::Null,
        ] {
            assert!(
                !classify_reply(&reply).is_success(),
                "reply {reply} must not count as success"
            );
        }
    }

    #[test]
    fn message_serializes_to_set_token_payload() {
        let token = BearerToken::new("abc");
        let message = DeliveryMessage::set_token(&token);
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"action": "setToken", "token": "abc"})
        );
        assert_eq!(message.to_json(), json!({"action": "setToken", "token": "abc"}));
    }

    #[test]
    fn message_debug_redacts_token() {
        let token = BearerToken::new("abc");
        let message = DeliveryMessage::set_token(&token);
        assert!(!format!("{message:?}").contains("abc"));
    }

    #[test]
    fn message_borrows_token_instead_of_copying_it() {
        let token = BearerToken::new("abc");
        let message = DeliveryMessage::set_token(&token);
        assert!(std::ptr::eq(message.token, &token));
        assert_eq!(serde_json::to_string(&message).unwrap(), r#"{"action":"setToken","token":"abc"}"#);
    }
}
