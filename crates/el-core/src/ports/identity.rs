use async_trait::async_trait;
use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("session source unreadable: {0}")]
    SessionUnreadable(String),

    #[error("sign-in url could not be built: {0}")]
    SignInUrl(String),
}

/// Read-only view of the external identity provider.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    /// Current active session, if any. Expiry is judged by the caller.
    async fn current_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Entry point that starts sign-in and returns to `redirect_path` afterwards.
    fn sign_in_url(&self, redirect_path: &str) -> Result<String, IdentityError>;
}
