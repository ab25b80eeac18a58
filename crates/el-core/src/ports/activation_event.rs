use crate::activation::ActivationState;

#[async_trait::async_trait]
pub trait ActivationEventPort: Send + Sync {
    async fn emit_activation_state_changed(&self, state: ActivationState);

    /// The flow needs a fresh sign-in; `sign_in_url` is `None` if it could not be built.
    async fn emit_sign_in_required(&self, sign_in_url: Option<String>);
}
