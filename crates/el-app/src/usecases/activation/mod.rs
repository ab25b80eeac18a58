mod context;
mod deliver_token;
mod orchestrator;
mod settings;

pub use context::ActivationContext;
pub use deliver_token::DeliverTokenToExtension;
pub use orchestrator::{ActivationOrchestrator, ActivationOrchestratorError};
pub use settings::{ActivationSettings, DEFAULT_DELIVERY_TIMEOUT_MS, SIGN_IN_REDIRECT_PATH};
