//! Extension activation domain module.
//!
//! This module defines the activation handshake state machine types.

pub mod delivery;
pub mod error;
pub mod state_machine;

pub use delivery::{classify_reply, DeliveryMessage, DeliveryOutcome, SET_TOKEN_ACTION, SUCCESS_MARKER};
pub use error::ActivationError;
pub use state_machine::{
    ActivationAction, ActivationEvent, ActivationState, ActivationStateMachine, DeliveryTicket,
};
