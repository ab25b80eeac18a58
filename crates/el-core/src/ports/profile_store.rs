use async_trait::async_trait;
use thiserror::Error;

use crate::ids::UserId;
use crate::profile::ProfileRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileStoreError {
    /// A record for this user already exists.
    #[error("{message}")]
    Duplicate { message: String },

    /// The store answered with an error; `message` is its own wording.
    #[error("{message}")]
    Rejected { message: String },

    /// The caller's token was refused (expired or revoked).
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("profile store unreachable: {0}")]
    Unavailable(String),
}

impl ProfileStoreError {
    /// Text shown to the user as-is.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[async_trait]
pub trait ProfileStorePort: Send + Sync {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, ProfileStoreError>;

    /// Insert a new record. Must fail with [`ProfileStoreError::Duplicate`] if one exists.
    async fn insert_profile(&self, record: &ProfileRecord) -> Result<(), ProfileStoreError>;
}
