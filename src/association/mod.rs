//! # Associations
//!
//! Declared relationships between record kinds and the resolvers that turn a
//! declaration into a fetch.
//!
//! ## Structure
//!
//! - [`BelongsTo`], [`HasMany`], [`HasOne`] - one resolver per relationship kind
//! - [`Association`] - the closed set of declarations a kind can hold
//! - [`registry`] - [`AssociationSchema`] (one per kind) and [`Associations`] (one per record)
//! - [`error`] - [`AssociationError`]
//!
//! ## Capabilities
//!
//! A resolver either produces one record ([`SingularAssociation`]) or one
//! lazy relation ([`CollectionAssociation`]). These two traits are the only
//! extension points; the registry picks the capability by matching on the
//! [`Association`] variant.

pub mod belongs_to;
pub mod error;
pub mod has_many;
pub mod has_one;
pub mod registry;

pub use belongs_to::BelongsTo;
pub use error::AssociationError;
pub use has_many::HasMany;
pub use has_one::{HasOne, HAS_ONE_PROBE_LIMIT};
pub use registry::{AssociationSchema, Associations};

use crate::record::Owner;
use crate::reflection::Reflection;
use crate::relation::Relation;
use crate::result::{CollectionResult, RecordResult};
use std::fmt;

/// Resolvers that produce at most one record.
pub trait SingularAssociation {
    fn access_association(&self, owner: &dyn Owner, reflection: &dyn Reflection) -> RecordResult;
}

/// Resolvers that produce a relation over many records.
pub trait CollectionAssociation {
    fn access_collection(&self, owner: &dyn Owner, reflection: &dyn Reflection) -> CollectionResult;
}

/// A declared association of a record kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Association {
    BelongsTo(BelongsTo),
    HasMany(HasMany),
    HasOne(HasOne),
}

impl Association {
    pub fn association_name(&self) -> String {
        match self {
            Association::BelongsTo(a) => a.association_name(),
            Association::HasMany(a) => a.association_name(),
            Association::HasOne(a) => a.association_name(),
        }
    }

    pub fn association_foreign_key(&self) -> String {
        match self {
            Association::BelongsTo(a) => a.association_foreign_key(),
            Association::HasMany(a) => a.association_foreign_key(),
            Association::HasOne(a) => a.association_foreign_key(),
        }
    }

    /// Name of the record kind this association points at.
    pub fn target_name(&self) -> &str {
        match self {
            Association::BelongsTo(a) => a.target_name(),
            Association::HasMany(a) => a.target_name(),
            Association::HasOne(a) => a.target_name(),
        }
    }

    pub fn owner_name(&self) -> &str {
        match self {
            Association::BelongsTo(a) => a.owner_name(),
            Association::HasMany(a) => a.owner_name(),
            Association::HasOne(a) => a.owner_name(),
        }
    }

    pub(crate) fn set_foreign_key(&mut self, foreign_key: String) {
        match self {
            Association::BelongsTo(a) => a.set_foreign_key(foreign_key),
            Association::HasMany(a) => a.set_foreign_key(foreign_key),
            Association::HasOne(a) => a.set_foreign_key(foreign_key),
        }
    }

    pub fn as_singular(&self) -> Option<&dyn SingularAssociation> {
        match self {
            Association::BelongsTo(a) => Some(a),
            Association::HasOne(a) => Some(a),
            Association::HasMany(_) => None,
        }
    }

    pub fn as_collection(&self) -> Option<&dyn CollectionAssociation> {
        match self {
            Association::HasMany(a) => Some(a),
            Association::BelongsTo(_) | Association::HasOne(_) => None,
        }
    }
}

impl From<BelongsTo> for Association {
    fn from(a: BelongsTo) -> Self {
        Association::BelongsTo(a)
    }
}

impl From<HasMany> for Association {
    fn from(a: HasMany) -> Self {
        Association::HasMany(a)
    }
}

impl From<HasOne> for Association {
    fn from(a: HasOne) -> Self {
        Association::HasOne(a)
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Association::BelongsTo(a) => fmt::Display::fmt(a, f),
            Association::HasMany(a) => fmt::Display::fmt(a, f),
            Association::HasOne(a) => fmt::Display::fmt(a, f),
        }
    }
}

/// An association paired with the relation of its target kind.
#[derive(Debug, Clone)]
pub struct AssociationReflection {
    pub relation: Relation,
    pub association: Association,
}
