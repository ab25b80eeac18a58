//! Hand-written port doubles shared by the activation integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::{Mutex, Notify};

use el_app::usecases::{ActivationOrchestrator, ActivationSettings, DeliverTokenToExtension};
use el_core::activation::{ActivationState, DeliveryMessage};
use el_core::ids::{ExtensionAddress, UserId};
use el_core::ports::{
    ActivationEventPort, ClockPort, ExtensionRuntimeError, ExtensionRuntimePort, IdentityError,
    IdentityPort, ProfileStoreError, ProfileStorePort,
};
use el_core::profile::ProfileRecord;
use el_core::security::BearerToken;
use el_core::session::Session;

pub const NOW_MS: i64 = 1_700_000_000_000;
pub const USER: &str = "user-1";
pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-token";

#[derive(Clone)]
struct StoredSession {
    user_id: String,
    token: String,
    expires_at_ms: Option<i64>,
    display_name: Option<String>,
}

#[derive(Default)]
pub struct MockIdentity {
    session: StdMutex<Option<StoredSession>>,
    fail_lookup: StdMutex<bool>,
    lookup_gate: StdMutex<Option<Arc<Notify>>>,
    lookup_started: Notify,
}

impl MockIdentity {
    pub fn signed_in() -> Self {
        let identity = Self::default();
        identity.sign_in(USER, TOKEN, Some(NOW_MS + 3_600_000));
        identity
    }

    pub fn sign_in(&self, user_id: &str, token: &str, expires_at_ms: Option<i64>) {
        *self.session.lock().unwrap() = Some(StoredSession {
            user_id: user_id.to_string(),
            token: token.to_string(),
            expires_at_ms,
            display_name: Some("Ada Lovelace".to_string()),
        });
    }

    pub fn sign_out(&self) {
        *self.session.lock().unwrap() = None;
    }

    pub fn fail_lookups(&self) {
        *self.fail_lookup.lock().unwrap() = true;
    }

    /// The next session lookup waits for `gate` before reading the session.
    pub fn gate_next_lookup(&self, gate: Arc<Notify>) {
        *self.lookup_gate.lock().unwrap() = Some(gate);
    }

    /// Resolves once a gated lookup is waiting.
    pub async fn wait_for_lookup(&self) {
        self.lookup_started.notified().await;
    }
}

#[async_trait]
impl IdentityPort for MockIdentity {
    async fn current_session(&self) -> Result<Option<Session>, IdentityError> {
        let gate = self.lookup_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.lookup_started.notify_one();
            gate.notified().await;
        }
        if *self.fail_lookup.lock().unwrap() {
            return Err(IdentityError::SessionUnreadable("corrupt".into()));
        }
        Ok(self.session.lock().unwrap().clone().map(|stored| {
            let mut session = Session::new(UserId::new(stored.user_id), BearerToken::new(stored.token));
            if let Some(expires) = stored.expires_at_ms {
                session = session.with_expiry(expires);
            }
            if let Some(name) = stored.display_name {
                session = session.with_display_name(name);
            }
            session
        }))
    }

    fn sign_in_url(&self, redirect_path: &str) -> Result<String, IdentityError> {
        Ok(format!("https://auth.test/authorize?redirect_to={redirect_path}"))
    }
}

pub struct MockProfileStore {
    existing: StdMutex<Option<ProfileRecord>>,
    lookup_error: StdMutex<Option<ProfileStoreError>>,
    lookups: AtomicUsize,
    insert_error: StdMutex<Option<ProfileStoreError>>,
    pub inserted: Mutex<Vec<ProfileRecord>>,
}

impl MockProfileStore {
    pub fn empty() -> Self {
        Self {
            existing: StdMutex::new(None),
            lookup_error: StdMutex::new(None),
            lookups: AtomicUsize::new(0),
            insert_error: StdMutex::new(None),
            inserted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile() -> Self {
        let store = Self::empty();
        *store.existing.lock().unwrap() = Some(ProfileRecord {
            id: UserId::new(USER),
            full_name: "Ada Lovelace".into(),
            department: "CSE".into(),
            academic_year: "2023-2027".into(),
            date_of_birth: "2005-01-01".into(),
            mobile_number: "+919876543210".into(),
        });
        store
    }

    pub fn fail_lookups_with(&self, err: ProfileStoreError) {
        *self.lookup_error.lock().unwrap() = Some(err);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn fail_inserts_with(&self, err: ProfileStoreError) {
        *self.insert_error.lock().unwrap() = Some(err);
    }

    pub async fn snapshot(&self) -> Vec<ProfileRecord> {
        self.inserted.lock().await.clone()
    }
}

#[async_trait]
impl ProfileStorePort for MockProfileStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>, ProfileStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.lookup_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self
            .existing
            .lock()
            .unwrap()
            .clone()
            .filter(|record| &record.id == user_id))
    }

    async fn insert_profile(&self, record: &ProfileRecord) -> Result<(), ProfileStoreError> {
        if let Some(err) = self.insert_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.inserted.lock().await.push(record.clone());
        Ok(())
    }
}

/// Scripted reply for one `send_message` call.
pub enum Reply {
    Value(Value),
    Error(ExtensionRuntimeError),
    /// Wait for the gate before answering.
    Gated(Arc<Notify>, Value),
    Hang,
}

pub struct ScriptedRuntime {
    available: bool,
    replies: StdMutex<VecDeque<Reply>>,
    sent: Mutex<Vec<(String, Value)>>,
    send_started: Notify,
}

impl ScriptedRuntime {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            available: true,
            replies: StdMutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
            send_started: Notify::new(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Vec::new())
        }
    }

    pub fn success() -> Reply {
        Reply::Value(json!({ "status": "success" }))
    }

    pub async fn sent(&self) -> Vec<(String, Value)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_addresses(&self) -> Vec<String> {
        self.sent().await.into_iter().map(|(address, _)| address).collect()
    }

    /// Resolves once a send has begun.
    pub async fn wait_for_send(&self) {
        self.send_started.notified().await;
    }
}

#[async_trait]
impl ExtensionRuntimePort for ScriptedRuntime {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn send_message(
        &self,
        address: &ExtensionAddress,
        message: &DeliveryMessage<'_>,
    ) -> Result<Value, ExtensionRuntimeError> {
        self.sent
            .lock()
            .await
            .push((address.to_string(), message.to_json()));
        let reply = self.replies.lock().unwrap().pop_front();
        self.send_started.notify_one();
        match reply {
            Some(Reply::Value(value)) => Ok(value),
            Some(Reply::Error(err)) => Err(err),
            Some(Reply::Gated(gate, value)) => {
                gate.notified().await;
                Ok(value)
            }
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(ExtensionRuntimeError::NoReply),
        }
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    states: Mutex<Vec<ActivationState>>,
    sign_in_prompts: Mutex<Vec<Option<String>>>,
}

impl RecordingEvents {
    pub async fn states(&self) -> Vec<ActivationState> {
        self.states.lock().await.clone()
    }

    pub async fn sign_in_prompts(&self) -> Vec<Option<String>> {
        self.sign_in_prompts.lock().await.clone()
    }
}

#[async_trait]
impl ActivationEventPort for RecordingEvents {
    async fn emit_activation_state_changed(&self, state: ActivationState) {
        self.states.lock().await.push(state);
    }

    async fn emit_sign_in_required(&self, sign_in_url: Option<String>) {
        self.sign_in_prompts.lock().await.push(sign_in_url);
    }
}

pub struct FixedClock(pub i64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

pub struct Harness {
    pub orchestrator: Arc<ActivationOrchestrator>,
    pub identity: Arc<MockIdentity>,
    pub store: Arc<MockProfileStore>,
    pub runtime: Arc<ScriptedRuntime>,
    pub events: Arc<RecordingEvents>,
}

impl Harness {
    pub fn new(identity: MockIdentity, store: MockProfileStore, runtime: ScriptedRuntime) -> Self {
        Self::with_settings(identity, store, runtime, ActivationSettings::default())
    }

    pub fn with_settings(
        identity: MockIdentity,
        store: MockProfileStore,
        runtime: ScriptedRuntime,
        settings: ActivationSettings,
    ) -> Self {
        let identity = Arc::new(identity);
        let store = Arc::new(store);
        let runtime = Arc::new(runtime);
        let events = Arc::new(RecordingEvents::default());
        let deliver = Arc::new(DeliverTokenToExtension::new(
            runtime.clone(),
            settings.delivery_timeout,
        ));
        let orchestrator = Arc::new(ActivationOrchestrator::new(
            settings,
            identity.clone(),
            store.clone(),
            deliver,
            events.clone(),
            Arc::new(FixedClock(NOW_MS)),
        ));
        Self {
            orchestrator,
            identity,
            store,
            runtime,
            events,
        }
    }
}

