use serde::{Deserialize, Serialize};

use super::id_macro::impl_string_id;

/// Identity-provider user identifier.
///
/// Also the primary key of the profile record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl_string_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_serializes_as_plain_string() {
        let id = UserId::new("0b7f6c1e-4a52-4c1b-9d2e-3c1f0d9a8e77");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0b7f6c1e-4a52-4c1b-9d2e-3c1f0d9a8e77\"");
    }
}
