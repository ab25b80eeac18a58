use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use el_core::activation::ActivationState;
use el_core::ids::{AttemptId, ExtensionAddress};
use el_core::profile::ProfileDraft;
use tokio::sync::Mutex;

/// Per-view activation context: state, troubleshooting inputs and dispatch lock.
///
/// Everything here lives for one page view and is never persisted.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: Used only for transitions, never held across a delivery attempt.
/// - `state`: Used for both reading (`get_state`) and writing (during dispatch).
pub struct ActivationContext {
    state: Mutex<ActivationState>,
    address: Mutex<ExtensionAddress>,
    draft: Mutex<ProfileDraft>,
    troubleshooting_open: AtomicBool,
    last_attempt: AtomicU64,
    dispatch_lock: Mutex<()>,
}

impl ActivationContext {
    pub fn new(address: ExtensionAddress) -> Self {
        Self {
            state: Mutex::new(ActivationState::NotStarted),
            address: Mutex::new(address),
            draft: Mutex::new(ProfileDraft::default()),
            troubleshooting_open: AtomicBool::new(false),
            last_attempt: AtomicU64::new(0),
            dispatch_lock: Mutex::new(()),
        }
    }

    /// Returns the context wrapped in Arc for shared ownership.
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read; does NOT acquire `dispatch_lock`.
    pub async fn get_state(&self) -> ActivationState {
        self.state.lock().await.clone()
    }

    /// Only call while holding `dispatch_lock`.
    pub async fn set_state(&self, state: ActivationState) {
        *self.state.lock().await = state;
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    pub async fn address(&self) -> ExtensionAddress {
        self.address.lock().await.clone()
    }

    pub async fn set_address(&self, address: ExtensionAddress) {
        *self.address.lock().await = address;
    }

    pub async fn draft(&self) -> ProfileDraft {
        self.draft.lock().await.clone()
    }

    pub async fn set_draft(&self, draft: ProfileDraft) {
        *self.draft.lock().await = draft;
    }

    pub fn troubleshooting_open(&self) -> bool {
        self.troubleshooting_open.load(Ordering::SeqCst)
    }

    pub fn set_troubleshooting_open(&self, open: bool) {
        self.troubleshooting_open.store(open, Ordering::SeqCst);
    }

    /// Allocate the generation tag for a new delivery attempt.
    pub fn next_attempt(&self) -> AttemptId {
        AttemptId::new(self.last_attempt.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
