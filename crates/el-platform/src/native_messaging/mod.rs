//! Reaching the browser extension from outside the browser.
//!
//! The bridge is an executable that relays one native-messaging exchange to the
//! extension whose address it receives as its only argument.

mod bridge;
pub mod framing;

pub use bridge::{exchange, NativeMessagingBridge};
