// Credential Domain Model

use crate::domain::error::{DomainError, Result};
use std::collections::HashSet;
use std::fmt;

/// Process-wide allow-list of API keys.
///
/// Immutable after load. A key is either a member or not: there is no
/// expiry, scope or per-key metadata. Matching is exact and case-sensitive.
#[derive(Clone, Default)]
pub struct CredentialSet {
    keys: HashSet<String>,
}

impl CredentialSet {
    /// Build an allow-list from the given keys. Empty strings are dropped
    /// since an empty header value must never authorize.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys
                .into_iter()
                .map(Into::into)
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Parse a JSON array of strings, e.g. `["abc123","def456"]`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let keys: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidCredentials(e.to_string()))?;
        Ok(Self::new(keys))
    }

    /// `true` iff a key was presented and it is a member of the allow-list.
    pub fn is_authorized(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(key) if !key.is_empty() => self.keys.contains(key),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// Keys are secrets: only the count is printable.
impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("len", &self.keys.len())
            .finish()
    }
}
