//! # extlink
//!
//! Binary-side assembly: configuration, tracing, wiring and the CLI.

pub mod bootstrap;
pub mod cli;
