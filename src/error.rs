//! # Errors
//!
//! Every fallible operation in the crate reports an [`Error`]. Schema errors
//! (`DuplicatePrimaryKey`, `ReservedAttributeName`, `DuplicateAttribute`,
//! `DuplicateAssociation`) abort the declaration of a record kind before any
//! record exists. Everything else is returned to the caller of the failing
//! operation; nothing is retried or swallowed.

use crate::association::AssociationError;
use crate::attribute::ValidationError;
use crate::value::Value;
use thiserror::Error;

/// Errors that can occur while declaring, populating or resolving records.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// An attribute that the record kind does not declare was referenced.
    #[error("unknown attribute {attr:?} for {record}")]
    UnknownAttribute { record: String, attr: String },

    /// More than one attribute was marked as primary key.
    #[error("multiple primary keys are not supported for {record}")]
    DuplicatePrimaryKey { record: String },

    /// An attribute uses the default primary key name without being the primary key.
    #[error("{attr:?} is an attribute of {record}, but not a primary key")]
    ReservedAttributeName { record: String, attr: String },

    /// The same attribute name was declared twice.
    #[error("attribute {attr:?} is declared twice for {record}")]
    DuplicateAttribute { record: String, attr: String },

    /// A value did not pass the attribute's validation rules.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An association that the record kind does not declare was referenced.
    #[error("unknown association {assoc:?} for {record}")]
    UnknownAssociation { record: String, assoc: String },

    /// The same association name was declared twice.
    #[error("association {assoc:?} is declared twice for {record}")]
    DuplicateAssociation { record: String, assoc: String },

    /// An association was used in a way its declaration does not allow.
    #[error(transparent)]
    Association(#[from] AssociationError),

    /// Reflection does not know a record kind with this name.
    #[error("unknown record {0:?}")]
    UnknownRecord(String),

    /// A record kind with this name is already registered.
    #[error("record {0:?} is already defined")]
    DuplicateRecord(String),

    /// A terminal `find` matched no row.
    #[error("{record} not found by {column} = {id}")]
    RecordNotFound {
        record: String,
        column: String,
        id: Value,
    },

    /// A stored row has no value for the primary key.
    #[error("{record} row is missing its primary key {column}")]
    MissingPrimaryKey { record: String, column: String },

    /// A stored row repeats the primary key of another row.
    #[error("{record} already has a row with {column} = {id}")]
    DuplicateKey {
        record: String,
        column: String,
        id: Value,
    },

    /// The storage engine failed to execute a query.
    #[error("storage error: {0}")]
    Storage(String),
}
