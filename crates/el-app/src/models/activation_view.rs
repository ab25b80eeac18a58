use serde::Serialize;

use el_core::activation::{ActivationError, ActivationState};
use el_core::ids::ExtensionAddress;

/// Progress indicator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStep {
    SignIn,
    Profile,
    Sync,
}

impl ActivationStep {
    pub fn number(self) -> u8 {
        match self {
            ActivationStep::SignIn => 1,
            ActivationStep::Profile => 2,
            ActivationStep::Sync => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    SignIn,
    Form,
    Spinner,
    Check,
    Alert,
}

/// What the activation screen shows for a given state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationView {
    pub state: ActivationState,
    pub step: ActivationStep,
    pub icon: StatusIcon,
    pub headline: String,
    pub message: String,
    /// "Sync with Extension" is clickable.
    pub retry_enabled: bool,
    /// The extension address editor is visible.
    pub show_troubleshooting: bool,
    pub extension_address: String,
}

impl ActivationView {
    pub fn build(
        state: &ActivationState,
        address: &ExtensionAddress,
        troubleshooting_open: bool,
    ) -> Self {
        let (step, icon, headline, message) = match state {
            ActivationState::NotStarted => (
                ActivationStep::SignIn,
                StatusIcon::SignIn,
                "Create your account",
                "Join the professional community of extension users.".to_string(),
            ),
            ActivationState::AwaitingProfile { error } => (
                ActivationStep::Profile,
                StatusIcon::Form,
                "Academic Details",
                error
                    .as_ref()
                    .map(profile_error_message)
                    .unwrap_or_else(|| "Tell us a bit more about yourself.".to_string()),
            ),
            ActivationState::Syncing { .. } => (
                ActivationStep::Sync,
                StatusIcon::Spinner,
                "Syncing...",
                "Welcome to the premium experience.".to_string(),
            ),
            ActivationState::Synced => (
                ActivationStep::Sync,
                StatusIcon::Check,
                "All set!",
                "Your extension is now unlocked! You can close this window.".to_string(),
            ),
            ActivationState::SyncFailed { reason } => (
                ActivationStep::Sync,
                StatusIcon::Alert,
                "Sync Required",
                sync_error_message(reason),
            ),
        };

        let retry_enabled = matches!(state, ActivationState::SyncFailed { .. });
        let show_troubleshooting = match state {
            ActivationState::SyncFailed { .. } => true,
            ActivationState::Syncing { .. } => troubleshooting_open,
            _ => false,
        };

        Self {
            state: state.clone(),
            step,
            icon,
            headline: headline.to_string(),
            message,
            retry_enabled,
            show_troubleshooting,
            extension_address: address.to_string(),
        }
    }
}

fn profile_error_message(error: &ActivationError) -> String {
    match error {
        ActivationError::ProfilePersistFailure { message } => {
            format!("Failed to complete registration: {message}")
        }
        ActivationError::IncompleteProfile => {
            "Department and mobile number are required.".to_string()
        }
        ActivationError::AuthenticationMissing => {
            "Please sign in again to continue.".to_string()
        }
        other => other.to_string(),
    }
}

fn sync_error_message(reason: &ActivationError) -> String {
    match reason {
        ActivationError::RuntimeUnavailable => {
            "This browser cannot reach local extensions. Open this page in Chrome with the extension installed.".to_string()
        }
        ActivationError::DeliveryRejected { .. } => {
            "Extension ID mismatch or connection blocked.".to_string()
        }
        ActivationError::AuthenticationMissing => "Please sign in again to sync.".to_string(),
        ActivationError::Superseded => {
            "Extension ID changed. Sync again to use the new ID.".to_string()
        }
        other => other.to_string(),
    }
}
