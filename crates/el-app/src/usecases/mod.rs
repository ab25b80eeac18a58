pub mod activation;

pub use activation::{
    ActivationContext, ActivationOrchestrator, ActivationOrchestratorError, ActivationSettings,
    DeliverTokenToExtension, DEFAULT_DELIVERY_TIMEOUT_MS, SIGN_IN_REDIRECT_PATH,
};
