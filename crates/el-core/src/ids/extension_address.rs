use serde::{Deserialize, Serialize};

use super::id_macro::impl_string_id;

/// Address of the extension shipped to the store.
pub const DEFAULT_EXTENSION_ADDRESS: &str = "njnpnjnjndboojihhmeibamkcehbklke";

/// Opaque identifier of the local extension's message endpoint.
///
/// Only non-emptiness is checked; everything else is up to the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionAddress(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("extension address must not be empty")]
pub struct InvalidExtensionAddress;

impl ExtensionAddress {
    /// Parse a user-supplied address, trimming surrounding whitespace.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, InvalidExtensionAddress> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidExtensionAddress);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Default for ExtensionAddress {
    fn default() -> Self {
        Self(DEFAULT_EXTENSION_ADDRESS.to_string())
    }
}

impl TryFrom<String> for ExtensionAddress {
    type Error = InvalidExtensionAddress;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ExtensionAddress> for String {
    fn from(value: ExtensionAddress) -> Self {
        value.0
    }
}

impl_string_id!(ExtensionAddress);
