//! Onboarding profile domain.

pub mod catalog;
mod draft;
mod record;

pub use draft::{ProfileDraft, DEFAULT_COUNTRY_CODE};
pub use record::ProfileRecord;
