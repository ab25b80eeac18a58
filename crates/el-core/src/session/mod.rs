//! Authenticated session as seen by the activation flow.

use crate::ids::UserId;
use crate::security::BearerToken;

/// Identity-provider session held for the lifetime of one page view.
#[derive(Debug, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub access_token: BearerToken,
    /// Expiry in unix milliseconds; `None` means the provider did not say.
    pub expires_at_ms: Option<i64>,
    /// Display name from the provider's user metadata, used to pre-fill the profile form.
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: UserId, access_token: BearerToken) -> Self {
        Self {
            user_id,
            access_token,
            expires_at_ms: None,
            display_name: None,
        }
    }

    pub fn with_expiry(mut self, expires_at_ms: i64) -> Self {
        self.expires_at_ms = Some(expires_at_ms);
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms.is_some_and(|expires| expires <= now_ms)
    }

    /// Token usable for delivery: present, non-blank and not expired.
    pub fn usable_token(self, now_ms: i64) -> Option<BearerToken> {
        if self.is_expired(now_ms) || self.access_token.is_empty() {
            return None;
        }
        Some(self.access_token)
    }
}
