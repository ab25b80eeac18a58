/// Activation failure kinds.
///
/// 激活失败类型。每一种都映射到一个可见状态，不会继续向上抛出。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivationError {
    /// No runtime able to reach local extensions in this environment.
    RuntimeUnavailable,
    /// The endpoint answered without the success marker, errored, or never answered.
    DeliveryRejected { detail: String },
    /// The profile store refused the write; `message` is shown verbatim.
    ProfilePersistFailure { message: String },
    /// No live session when one was required.
    AuthenticationMissing,
    /// Department or phone number left empty.
    IncompleteProfile,
    /// The attempt was abandoned because the address changed mid-flight.
    Superseded,
}

impl std::fmt::Display for ActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivationError::RuntimeUnavailable => f.write_str("runtime unavailable"),
            ActivationError::DeliveryRejected { detail } => {
                write!(f, "delivery rejected: {detail}")
            }
            ActivationError::ProfilePersistFailure { message } => f.write_str(message),
            ActivationError::AuthenticationMissing => f.write_str("authentication missing"),
            ActivationError::IncompleteProfile => {
                f.write_str("department and phone number are required")
            }
            ActivationError::Superseded => f.write_str("superseded by a newer attempt"),
        }
    }
}
