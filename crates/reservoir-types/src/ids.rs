//! Type-safe identifier wrappers.
//!
//! Characters are identified by the name the host chat application
//! reports for them. The name is kept verbatim: it is never folded into
//! a storage key by string concatenation, so names containing spaces,
//! underscores, or separator characters cannot collide.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identity of a character whose resource gauge is being tracked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Create an identifier from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the character name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CharacterId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for CharacterId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<CharacterId> for String {
    fn from(id: CharacterId) -> Self {
        id.0
    }
}
