//! Session identifiers.
//!
//! Callers address sessions with arbitrary strings. Before an ID touches
//! storage it is reduced to a [`SessionKey`]: every character that is not
//! alphanumeric, `-`, or `_` is dropped. Two raw IDs that reduce to the same
//! key address the same session.

use std::fmt;

use crate::error::StoreError;

/// Strip every character that is not alphanumeric, `-`, or `_`.
///
/// Idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// A sanitized, non-empty session identifier safe to use as a file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey {
    key: String,
    altered: bool,
}

impl SessionKey {
    /// Sanitize `raw` into a storage key.
    ///
    /// Fails with [`StoreError::InvalidIdentifier`] when nothing survives.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let key = sanitize(raw);
        if key.is_empty() {
            return Err(StoreError::InvalidIdentifier(raw.to_string()));
        }
        let altered = key != raw;
        Ok(Self { key, altered })
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Whether sanitization changed the caller's ID.
    ///
    /// Callers should surface this: a different raw ID may collide with it.
    pub fn was_altered(&self) -> bool {
        self.altered
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}
