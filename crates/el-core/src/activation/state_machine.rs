//! Activation state machine.
//!
//! Defines a pure state transition function for the extension activation handshake.

use crate::activation::{ActivationError, DeliveryOutcome};
use crate::ids::{AttemptId, ExtensionAddress, UserId};
use crate::profile::{ProfileDraft, ProfileRecord};
use crate::security::BearerToken;

/// Activation flow state.
///
/// 激活流程状态。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActivationState {
    /// No session seen yet (sign-in screen).
    ///
    /// 尚未登录。
    NotStarted,
    /// Signed in, profile form pending.
    ///
    /// 已登录，等待填写资料。
    AwaitingProfile { error: Option<ActivationError> },
    /// Delivery attempt in flight.
    ///
    /// 正在向扩展投递令牌。
    Syncing { attempt: AttemptId },
    /// Extension acknowledged the token. Terminal for the view.
    ///
    /// 同步完成。
    Synced,
    /// Last attempt failed; retry and troubleshooting are offered.
    ///
    /// 同步失败。
    SyncFailed { reason: ActivationError },
}

/// Everything a delivery attempt needs, captured when the attempt starts.
#[derive(Debug, PartialEq, Eq)]
pub struct DeliveryTicket {
    pub attempt: AttemptId,
    pub address: ExtensionAddress,
    pub token: BearerToken,
}

/// Events that drive the activation flow.
///
/// 驱动激活流程的事件。
#[derive(Debug, PartialEq, Eq)]
pub enum ActivationEvent {
    /// Page load found a session. `delivery` is `None` when its token is unusable.
    ///
    /// 页面加载时检测到会话。
    SessionDetected {
        has_profile: bool,
        delivery: Option<DeliveryTicket>,
    },
    /// Page load found no session.
    ///
    /// 未检测到会话。
    NoSession,
    /// The session's token is expired, or the backend refused it.
    ///
    /// 会话已过期或被后端拒绝。
    SessionExpired,
    /// User submitted the profile form.
    ///
    /// 用户提交资料表单。
    SubmitProfile {
        draft: ProfileDraft,
        user_id: Option<UserId>,
    },
    /// Profile store accepted the record.
    ///
    /// 资料保存成功。
    ProfilePersisted { delivery: Option<DeliveryTicket> },
    /// Profile store refused the record.
    ///
    /// 资料保存失败。
    ProfilePersistFailed { message: String },
    /// A delivery attempt concluded.
    ///
    /// 投递结果返回。
    DeliveryResolved {
        attempt: AttemptId,
        outcome: DeliveryOutcome,
    },
    /// User pressed "Sync with Extension".
    ///
    /// 用户手动重试。
    RetryRequested { delivery: Option<DeliveryTicket> },
    /// User edited the extension address in the troubleshooting panel.
    ///
    /// 用户修改了扩展地址。
    ExtensionAddressChanged,
    /// User navigated away; any in-flight attempt is abandoned.
    ///
    /// 用户离开页面。
    ViewClosed,
}

impl ActivationEvent {
    /// Stable name for logs; never includes tokens or form contents.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationEvent::SessionDetected { .. } => "session_detected",
            ActivationEvent::NoSession => "no_session",
            ActivationEvent::SessionExpired => "session_expired",
            ActivationEvent::SubmitProfile { .. } => "submit_profile",
            ActivationEvent::ProfilePersisted { .. } => "profile_persisted",
            ActivationEvent::ProfilePersistFailed { .. } => "profile_persist_failed",
            ActivationEvent::DeliveryResolved { .. } => "delivery_resolved",
            ActivationEvent::RetryRequested { .. } => "retry_requested",
            ActivationEvent::ExtensionAddressChanged => "extension_address_changed",
            ActivationEvent::ViewClosed => "view_closed",
        }
    }
}

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, PartialEq, Eq)]
pub enum ActivationAction {
    /// Insert the onboarding record.
    ///
    /// 写入资料记录。
    PersistProfile { record: ProfileRecord },
    /// Send the token to the extension.
    ///
    /// 向扩展投递令牌。
    DeliverToken { ticket: DeliveryTicket },
    /// Send the user back to the sign-in entry point.
    ///
    /// 引导用户重新登录。
    PromptSignIn,
}

/// Pure activation state machine.
///
/// 纯状态机：不包含副作用。
pub struct ActivationStateMachine;

impl ActivationStateMachine {
    pub fn transition(
        state: ActivationState,
        event: ActivationEvent,
    ) -> (ActivationState, Vec<ActivationAction>) {
        match (state, event) {
            (ActivationState::Synced, _event) => (ActivationState::Synced, Vec::new()),
            (_, ActivationEvent::ViewClosed) => (ActivationState::NotStarted, Vec::new()),

            (ActivationState::NotStarted, ActivationEvent::NoSession) => {
                (ActivationState::NotStarted, vec![ActivationAction::PromptSignIn])
            }
            (ActivationState::NotStarted, ActivationEvent::SessionExpired) => (
                ActivationState::SyncFailed {
                    reason: ActivationError::AuthenticationMissing,
                },
                vec![ActivationAction::PromptSignIn],
            ),
            (ActivationState::AwaitingProfile { .. }, ActivationEvent::SessionExpired) => (
                ActivationState::AwaitingProfile {
                    error: Some(ActivationError::AuthenticationMissing),
                },
                vec![ActivationAction::PromptSignIn],
            ),
            (
                ActivationState::NotStarted,
                ActivationEvent::SessionDetected {
                    has_profile: false,
                    ..
                },
            ) => (ActivationState::AwaitingProfile { error: None }, Vec::new()),
            (
                ActivationState::NotStarted,
                ActivationEvent::SessionDetected {
                    has_profile: true,
                    delivery,
                },
            ) => Self::start_delivery(delivery),

            (
                ActivationState::AwaitingProfile { .. },
                ActivationEvent::SubmitProfile { draft, user_id },
            ) => {
                let Some(user_id) = user_id else {
                    return (
                        ActivationState::AwaitingProfile {
                            error: Some(ActivationError::AuthenticationMissing),
                        },
                        vec![ActivationAction::PromptSignIn],
                    );
                };
                if !draft.is_complete() {
                    return (
                        ActivationState::AwaitingProfile {
                            error: Some(ActivationError::IncompleteProfile),
                        },
                        Vec::new(),
                    );
                }
                (
                    ActivationState::AwaitingProfile { error: None },
                    vec![ActivationAction::PersistProfile {
                        record: draft.to_record(user_id),
                    }],
                )
            }
            (
                ActivationState::AwaitingProfile { .. },
                ActivationEvent::ProfilePersistFailed { message },
            ) => (
                ActivationState::AwaitingProfile {
                    error: Some(ActivationError::ProfilePersistFailure { message }),
                },
                Vec::new(),
            ),
            (
                ActivationState::AwaitingProfile { .. },
                ActivationEvent::ProfilePersisted { delivery },
            ) => Self::start_delivery(delivery),

            (
                ActivationState::Syncing { attempt },
                ActivationEvent::DeliveryResolved {
                    attempt: resolved,
                    outcome,
                },
            ) => {
                if resolved != attempt {
                    return (ActivationState::Syncing { attempt }, Vec::new());
                }
                match outcome {
                    DeliveryOutcome::Success => (ActivationState::Synced, Vec::new()),
                    DeliveryOutcome::Failed(reason) => {
                        (ActivationState::SyncFailed { reason }, Vec::new())
                    }
                }
            }
            (ActivationState::Syncing { .. }, ActivationEvent::ExtensionAddressChanged) => (
                ActivationState::SyncFailed {
                    reason: ActivationError::Superseded,
                },
                Vec::new(),
            ),

            (ActivationState::SyncFailed { .. }, ActivationEvent::RetryRequested { delivery }) => {
                Self::start_delivery(delivery)
            }

            (state, _event) => (state, Vec::new()),
        }
    }

    fn start_delivery(
        delivery: Option<DeliveryTicket>,
    ) -> (ActivationState, Vec<ActivationAction>) {
        match delivery {
            Some(ticket) => (
                ActivationState::Syncing {
                    attempt: ticket.attempt,
                },
                vec![ActivationAction::DeliverToken { ticket }],
            ),
            None => (
                ActivationState::SyncFailed {
                    reason: ActivationError::AuthenticationMissing,
                },
                vec![ActivationAction::PromptSignIn],
            ),
        }
    }
}
