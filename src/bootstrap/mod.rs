pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{apply_env_overrides, load_config, load_config_or_empty};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{wire_activation, ActivationRuntime, WiringError};
