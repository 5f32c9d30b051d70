//! Error types for association access.

use thiserror::Error;

/// Errors raised when an association is used against its declaration, or
/// when stored data contradicts it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AssociationError {
    /// A collection association was accessed through the singular accessor.
    #[error("'{0}' is not a singular association")]
    NotSingular(String),

    /// A singular association was accessed through the collection accessor.
    #[error("'{0}' is not a collection association")]
    NotCollection(String),

    /// A `has_one` association matched more than one target row.
    #[error("declared 'has_one' association '{assoc}', but has many: [{records}]")]
    HasOneViolation { assoc: String, records: String },
}
