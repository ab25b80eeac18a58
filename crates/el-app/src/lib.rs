//! extlink Application Orchestration Layer
//!
//! This crate contains the activation use cases and the orchestrator that
//! drives the activation state machine against the ports.

pub mod app_paths;
pub mod models;
pub mod usecases;

pub use usecases::activation::{
    ActivationOrchestrator, ActivationOrchestratorError, ActivationSettings,
};
