//! # el-core
//!
//! Core domain models and business logic for extlink.
//!
//! This crate contains the activation state machine and the port traits,
//! without any infrastructure dependencies.

pub mod activation;
pub mod app_dirs;
pub mod config;
pub mod ids;
pub mod ports;
pub mod profile;
pub mod security;
pub mod session;

// Re-export commonly used types at the crate root
pub use activation::{ActivationError, ActivationState};
pub use config::AppConfig;
pub use ids::{AttemptId, ExtensionAddress, UserId};
pub use profile::{ProfileDraft, ProfileRecord};
pub use security::BearerToken;
pub use session::Session;
