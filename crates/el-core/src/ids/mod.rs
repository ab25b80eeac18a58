//! ID type wrappers for type safety.

mod id_macro;
pub mod attempt_id;
pub mod extension_address;
pub mod user_id;

pub use attempt_id::AttemptId;
pub use extension_address::{ExtensionAddress, InvalidExtensionAddress, DEFAULT_EXTENSION_ADDRESS};
pub use user_id::UserId;
