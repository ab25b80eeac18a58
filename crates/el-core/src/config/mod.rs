//! # Pure Data Module - Data Transfer Objects Only
//!
//! Defines configuration data structures and the TOML → DTO mapping.
//! No validation and no policy live here: empty strings and zero values are
//! facts handed to the bootstrap layer, which decides what they mean.

mod app_config;

pub use app_config::AppConfig;
