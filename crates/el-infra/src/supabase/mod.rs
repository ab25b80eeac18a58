//! Adapters for the hosted Supabase project (PostgREST + auth endpoints).

mod client;
mod profile_store;

pub use client::{SupabaseConfig, SupabaseRestClient, DEFAULT_REQUEST_TIMEOUT_MS};
pub use profile_store::{SupabaseProfileStore, PROFILES_TABLE};
