use std::time::Duration;

use el_core::ExtensionAddress;

/// Upper bound on waiting for the extension's reply.
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5_000;

/// Where the identity provider sends the user back after sign-in.
pub const SIGN_IN_REDIRECT_PATH: &str = "/register";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationSettings {
    pub extension_address: ExtensionAddress,
    pub delivery_timeout: Duration,
    pub sign_in_redirect: String,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            extension_address: ExtensionAddress::default(),
            delivery_timeout: Duration::from_millis(DEFAULT_DELIVERY_TIMEOUT_MS),
            sign_in_redirect: SIGN_IN_REDIRECT_PATH.to_string(),
        }
    }
}
