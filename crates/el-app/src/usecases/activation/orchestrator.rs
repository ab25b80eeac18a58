//! Activation orchestrator.
//!
//! This module coordinates the activation state machine and its side effects.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use el_core::{
    activation::{
        ActivationAction, ActivationEvent, ActivationState, ActivationStateMachine, DeliveryTicket,
    },
    security::BearerToken,
    ids::{ExtensionAddress, InvalidExtensionAddress},
    ports::{
        ActivationEventPort, ClockPort, IdentityError, IdentityPort, ProfileStoreError,
        ProfileStorePort,
    },
    profile::ProfileDraft,
    session::Session,
};

use crate::models::ActivationView;
use crate::usecases::activation::{ActivationContext, ActivationSettings, DeliverTokenToExtension};

/// Errors produced by the activation orchestrator.
///
/// Activation failures themselves are states, not errors; these cover calls
/// the controller refuses and lookups it cannot make.
#[derive(Debug, thiserror::Error)]
pub enum ActivationOrchestratorError {
    #[error("a delivery attempt is already in flight")]
    SyncInFlight,
    #[error(transparent)]
    InvalidExtensionAddress(#[from] InvalidExtensionAddress),
    #[error("extension already activated for this view")]
    AlreadySynced,
    #[error("session lookup failed: {0}")]
    Identity(#[from] IdentityError),
    #[error("profile lookup failed: {0}")]
    ProfileLookup(#[source] ProfileStoreError),
}

/// Inbound call, turned into an [`ActivationEvent`] once the dispatch lock is held.
///
/// Delivery tickets are stamped with the attempt id and extension address
/// under that lock, so a concurrent address edit is seen either by the
/// ticket or by the supersede that follows it.
enum Request {
    Event(ActivationEvent),
    SessionDetected {
        has_profile: bool,
        token: Option<BearerToken>,
    },
    Retry {
        token: Option<BearerToken>,
    },
    EditAddress(ExtensionAddress),
}

impl Request {
    fn name(&self) -> &'static str {
        match self {
            Request::Event(event) => event.name(),
            Request::SessionDetected { .. } => "session_detected",
            Request::Retry { .. } => "retry_requested",
            Request::EditAddress(_) => "extension_address_changed",
        }
    }
}

/// Orchestrator that drives activation state and side effects.
pub struct ActivationOrchestrator {
    context: Arc<ActivationContext>,
    identity: Arc<dyn IdentityPort>,
    profile_store: Arc<dyn ProfileStorePort>,
    deliver_token: Arc<DeliverTokenToExtension>,
    event_port: Arc<dyn ActivationEventPort>,
    clock: Arc<dyn ClockPort>,
    sign_in_redirect: String,
}

impl ActivationOrchestrator {
    pub fn new(
        settings: ActivationSettings,
        identity: Arc<dyn IdentityPort>,
        profile_store: Arc<dyn ProfileStorePort>,
        deliver_token: Arc<DeliverTokenToExtension>,
        event_port: Arc<dyn ActivationEventPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            context: ActivationContext::new(settings.extension_address).arc(),
            identity,
            profile_store,
            deliver_token,
            event_port,
            clock,
            sign_in_redirect: settings.sign_in_redirect,
        }
    }

    /// One-time check on view load: pick the starting step from session and profile.
    pub async fn initialize(&self) -> Result<ActivationState, ActivationOrchestratorError> {
        let current = self.context.get_state().await;
        if current != ActivationState::NotStarted {
            debug!(state = ?current, "activation already initialized for this view");
            return Ok(current);
        }

        let Some(session) = self.identity.current_session().await? else {
            return self.dispatch(Request::Event(ActivationEvent::NoSession)).await;
        };

        if self.context.draft().await.full_name.is_empty() {
            self.context
                .set_draft(ProfileDraft::prefilled(session.display_name.as_deref()))
                .await;
        }

        let now = self.clock.now_ms();
        if session.is_expired(now) || session.access_token.is_empty() {
            info!(user_id = %session.user_id, "session expired, sign-in required");
            return self.dispatch(Request::Event(ActivationEvent::SessionExpired)).await;
        }

        let has_profile = match self.profile_store.get_profile(&session.user_id).await {
            Ok(profile) => profile.is_some(),
            Err(ProfileStoreError::Unauthorized { message }) => {
                info!(user_id = %session.user_id, reason = %message, "session refused by profile store");
                return self.dispatch(Request::Event(ActivationEvent::SessionExpired)).await;
            }
            Err(err) => return Err(ActivationOrchestratorError::ProfileLookup(err)),
        };
        info!(user_id = %session.user_id, has_profile, "activation session detected");

        let token = if has_profile {
            self.token_for(session)
        } else {
            None
        };
        self.dispatch(Request::SessionDetected { has_profile, token })
            .await
    }

    /// Submit the profile form. The draft is kept whatever the outcome.
    pub async fn submit_profile(
        &self,
        draft: ProfileDraft,
    ) -> Result<ActivationState, ActivationOrchestratorError> {
        self.context.set_draft(draft.clone()).await;
        let user_id = self.live_session().await.map(|session| session.user_id);
        self.dispatch(Request::Event(ActivationEvent::SubmitProfile { draft, user_id }))
            .await
    }

    /// Manual "Sync with Extension" using the current session and address.
    pub async fn retry_sync(&self) -> Result<ActivationState, ActivationOrchestratorError> {
        let token = self.live_token().await;
        self.dispatch(Request::Retry { token }).await
    }

    /// Troubleshooting panel edit. Supersedes an in-flight attempt.
    pub async fn edit_extension_address(
        &self,
        raw: &str,
    ) -> Result<ActivationState, ActivationOrchestratorError> {
        let address = ExtensionAddress::parse(raw)?;
        self.dispatch(Request::EditAddress(address)).await
    }

    pub fn open_troubleshooting(&self) {
        self.context.set_troubleshooting_open(true);
    }

    /// The user left the page; late replies from the abandoned attempt are dropped.
    pub async fn close_view(&self) -> Result<ActivationState, ActivationOrchestratorError> {
        self.context.set_troubleshooting_open(false);
        self.dispatch(Request::Event(ActivationEvent::ViewClosed)).await
    }

    pub async fn get_state(&self) -> ActivationState {
        self.context.get_state().await
    }

    pub async fn extension_address(&self) -> ExtensionAddress {
        self.context.address().await
    }

    pub async fn profile_draft(&self) -> ProfileDraft {
        self.context.draft().await
    }

    pub async fn view(&self) -> ActivationView {
        let state = self.context.get_state().await;
        let address = self.context.address().await;
        ActivationView::build(&state, &address, self.context.troubleshooting_open())
    }

    /// Apply `request`, then run any delivery it started outside the dispatch lock
    /// and feed the result back in.
    async fn dispatch(&self, request: Request) -> Result<ActivationState, ActivationOrchestratorError> {
        let mut deliveries = self.apply(request).await?;

        while let Some(ticket) = deliveries.pop() {
            let attempt = ticket.attempt;
            let outcome = self
                .deliver_token
                .execute(&ticket)
                .instrument(info_span!(
                    "usecase.activation_orchestrator.deliver",
                    attempt = %attempt,
                    address = %ticket.address
                ))
                .await;
            drop(ticket);
            deliveries.extend(
                self.apply(Request::Event(ActivationEvent::DeliveryResolved { attempt, outcome }))
                    .await?,
            );
        }

        Ok(self.context.get_state().await)
    }

    async fn apply(&self, request: Request) -> Result<Vec<DeliveryTicket>, ActivationOrchestratorError> {
        // Serializes transitions so two handlers never read the same state
        // and both start a delivery.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.activation_orchestrator.dispatch", event = request.name());
        async {
            let mut current = self.context.get_state().await;
            let event = match request {
                Request::Event(event) => event,
                Request::SessionDetected { has_profile, token } => ActivationEvent::SessionDetected {
                    has_profile,
                    delivery: self.stamp(token).await,
                },
                Request::Retry { token } => {
                    if matches!(current, ActivationState::Syncing { .. }) {
                        warn!(state = ?current, "retry rejected while a delivery is in flight");
                        return Err(ActivationOrchestratorError::SyncInFlight);
                    }
                    ActivationEvent::RetryRequested {
                        delivery: self.stamp(token).await,
                    }
                }
                Request::EditAddress(address) => {
                    if current == ActivationState::Synced {
                        return Err(ActivationOrchestratorError::AlreadySynced);
                    }
                    info!(address = %address, "extension address edited");
                    self.context.set_address(address).await;
                    ActivationEvent::ExtensionAddressChanged
                }
            };

            let mut pending_events = vec![event];
            let mut deliveries = Vec::new();

            while let Some(event) = pending_events.pop() {
                let from = current.clone();
                let event_name = event.name();
                let (next, actions) = ActivationStateMachine::transition(current, event);
                info!(from = ?from, to = ?next, event = %event_name, "activation state transition");
                let follow_up_events = self.execute_actions(actions, &mut deliveries).await;
                if next != from {
                    self.set_state_and_emit(next.clone()).await;
                }
                current = next;
                pending_events.extend(follow_up_events);
            }

            Ok(deliveries)
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(
        &self,
        actions: Vec<ActivationAction>,
        deliveries: &mut Vec<DeliveryTicket>,
    ) -> Vec<ActivationEvent> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            match action {
                ActivationAction::PersistProfile { record } => {
                    debug!(user_id = %record.id, "activation persisting profile");
                    match self.profile_store.insert_profile(&record).await {
                        Ok(()) => {
                            info!(user_id = %record.id, "profile saved");
                            let delivery = self.stamp(self.live_token().await).await;
                            follow_up_events.push(ActivationEvent::ProfilePersisted { delivery });
                        }
                        Err(ProfileStoreError::Unauthorized { message }) => {
                            info!(user_id = %record.id, reason = %message, "profile save refused, session expired");
                            follow_up_events.push(ActivationEvent::SessionExpired);
                        }
                        Err(err) => {
                            warn!(user_id = %record.id, error = %err, "profile save failed");
                            follow_up_events.push(ActivationEvent::ProfilePersistFailed {
                                message: err.user_message(),
                            });
                        }
                    }
                }
                ActivationAction::DeliverToken { ticket } => {
                    debug!(attempt = %ticket.attempt, "activation queued delivery");
                    deliveries.push(ticket);
                }
                ActivationAction::PromptSignIn => {
                    let url = match self.identity.sign_in_url(&self.sign_in_redirect) {
                        Ok(url) => Some(url),
                        Err(err) => {
                            warn!(error = %err, "could not build sign-in url");
                            None
                        }
                    };
                    self.event_port.emit_sign_in_required(url).await;
                }
            }
        }
        follow_up_events
    }

    async fn set_state_and_emit(&self, state: ActivationState) {
        self.context.set_state(state.clone()).await;
        self.event_port.emit_activation_state_changed(state).await;
    }

    /// Session whose token is still usable, if any. Lookup failures count as no session.
    async fn live_session(&self) -> Option<Session> {
        match self.identity.current_session().await {
            Ok(Some(session)) if !session.is_expired(self.clock.now_ms()) => Some(session),
            Ok(Some(session)) => {
                info!(user_id = %session.user_id, "session expired, sign-in required");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "session lookup failed, treating as signed out");
                None
            }
        }
    }

    async fn live_token(&self) -> Option<BearerToken> {
        let session = self.live_session().await?;
        self.token_for(session)
    }

    fn token_for(&self, session: Session) -> Option<BearerToken> {
        let user_id = session.user_id.clone();
        let token = session.usable_token(self.clock.now_ms());
        if token.is_none() {
            info!(user_id = %user_id, "no usable token for delivery");
        }
        token
    }

    /// Bind `token` to a fresh attempt and the current address. Caller holds the dispatch lock.
    async fn stamp(&self, token: Option<BearerToken>) -> Option<DeliveryTicket> {
        Some(DeliveryTicket {
            token: token?,
            attempt: self.context.next_attempt(),
            address: self.context.address().await,
        })
    }
}
