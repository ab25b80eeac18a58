//! File-backed session source
//!
//! The sign-in callback writes the provider's session JSON to a local file;
//! this adapter reads it on demand and never writes it back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use el_core::ids::UserId;
use el_core::ports::{IdentityError, IdentityPort};
use el_core::security::BearerToken;
use el_core::session::Session;
use serde::Deserialize;
use tokio::fs;
use tracing::debug;

use crate::supabase::SupabaseRestClient;

pub const DEFAULT_SESSION_FILE: &str = "session.json";

#[derive(Deserialize)]
struct SessionFile {
    #[serde(default)]
    access_token: String,
    /// Unix seconds.
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

#[derive(Deserialize)]
struct SessionUser {
    id: String,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

pub struct FileSessionIdentity {
    session_file: PathBuf,
    auth: Option<SupabaseRestClient>,
}

impl FileSessionIdentity {
    /// `auth` is needed only to build sign-in URLs.
    pub fn new(session_file: PathBuf, auth: Option<SupabaseRestClient>) -> Self {
        Self { session_file, auth }
    }

    pub fn session_file(&self) -> &Path {
        &self.session_file
    }
}

#[async_trait]
impl IdentityPort for FileSessionIdentity {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        if !self.session_file.exists() {
            debug!(path = %self.session_file.display(), "no session file");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.session_file)
            .await
            .map_err(|e| IdentityError::SessionUnreadable(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let parsed: SessionFile = serde_json::from_str(&content)
            .map_err(|e| IdentityError::SessionUnreadable(format!("invalid session file: {e}")))?;
        if parsed.access_token.trim().is_empty() || parsed.user.id.trim().is_empty() {
            return Ok(None);
        }

        let mut session = Session::new(
            UserId::new(parsed.user.id),
            BearerToken::new(parsed.access_token),
        );
        if let Some(expires_at) = parsed.expires_at {
            session = session.with_expiry(expires_at.saturating_mul(1000));
        }
        let metadata = parsed.user.user_metadata;
        if let Some(name) = metadata.full_name.or(metadata.name) {
            session = session.with_display_name(name);
        }
        Ok(Some(session))
    }

    fn sign_in_url(&self, redirect_path: &str) -> Result<String, IdentityError> {
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| IdentityError::SignInUrl("identity provider not configured".into()))?;
        auth.authorize_url(redirect_path)
            .map_err(|e| IdentityError::SignInUrl(e.to_string()))
    }
}
