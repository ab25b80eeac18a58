//! Port interfaces for the application layer
//!
//! Ports define the contract between the activation use cases and the
//! infrastructure/platform implementations (hosted backend, local extension
//! runtime, file system). The core stays independent of all of them.

pub mod activation_event;
pub mod app_dirs;
mod clock;
pub mod extension_runtime;
pub mod identity;
pub mod profile_store;

pub use activation_event::ActivationEventPort;
pub use app_dirs::{AppDirsError, AppDirsPort};
pub use clock::*;
pub use extension_runtime::{ExtensionRuntimeError, ExtensionRuntimePort};
pub use identity::{IdentityError, IdentityPort};
pub use profile_store::{ProfileStoreError, ProfileStorePort};
