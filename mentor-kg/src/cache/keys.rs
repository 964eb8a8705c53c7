//! Structured cache keys

use crate::cache::types::CacheKey;
use std::fmt;

/// Family of cached read, used as the key prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Assembled context pack
    ContextPack,

    /// Caller-defined family
    Custom(String),
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::ContextPack => write!(f, "context_pack"),
            KeyKind::Custom(s) => write!(f, "custom:{}", s),
        }
    }
}

/// Builds keys of the form `<kind>:<identifier>?<k>=<v>&...`.
///
/// Parameters keep insertion order so the same request always maps to the
/// same key.
pub struct CacheKeyBuilder {
    kind: KeyKind,
    identifier: String,
    params: Vec<(String, String)>,
}

impl CacheKeyBuilder {
    /// Create a new cache key builder
    pub fn new(kind: KeyKind) -> Self {
        Self {
            kind,
            identifier: String::new(),
            params: Vec::new(),
        }
    }

    /// Key for a context pack of `root` with `budget` items at `version`
    pub fn context_pack(root: &str, budget: usize, version: u64) -> CacheKey {
        Self::new(KeyKind::ContextPack)
            .identifier(root)
            .param("budget", budget.to_string())
            .param("v", version.to_string())
            .build()
    }

    /// Set the primary identifier
    pub fn identifier(mut self, id: impl Into<String>) -> Self {
        self.identifier = id.into();
        self
    }

    /// Add a parameter to the key
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Build the cache key
    pub fn build(self) -> CacheKey {
        let mut key = format!("{}:{}", self.kind, self.identifier);

        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            key.push('?');
            key.push_str(&params.join("&"));
        }

        key
    }
}
