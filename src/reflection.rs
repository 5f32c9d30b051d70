//! # Schema Reflection
//!
//! Resolvers locate the records they point at by kind name. The [`Reflection`]
//! trait is that lookup: it turns a kind name into a fresh [`Relation`] over
//! all records of the kind.

use crate::error::Error;
use crate::relation::Relation;
use std::fmt::Debug;

/// Resolves a record kind name to its relation.
///
/// Implementations must be safe to call repeatedly and must answer an unknown
/// name with [`Error::UnknownRecord`] every time.
pub trait Reflection: Debug + Send + Sync {
    fn reflection(&self, name: &str) -> Result<Relation, Error>;
}
