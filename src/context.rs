//! # Execution Context
//!
//! A [`Context`] is the request-scoped bag of values that travels with a
//! record. Resolvers never inspect it: they hand the owner's context to every
//! query they build, so the storage engine sees the same context as the
//! caller that started the lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    values: BTreeMap<String, String>,
}

impl Context {
    /// The empty context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a copy of this context carrying `key = value`.
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(key.into(), value.into());
        Self { values }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_background(&self) -> bool {
        self.values.is_empty()
    }
}
