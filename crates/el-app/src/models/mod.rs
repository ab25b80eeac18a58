mod activation_view;

pub use activation_view::{ActivationStep, ActivationView, StatusIcon};
