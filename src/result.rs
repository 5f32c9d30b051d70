//! # Fetch Results
//!
//! Every association resolver reports through an [`Outcome`]: either the
//! fetched value or the [`Error`] that prevented it, never both. Callers that
//! prefer plain `?` propagation convert with [`Outcome::into_result`].

use crate::error::Error;
use crate::record::Record;
use crate::relation::Relation;

/// One of (value, error).
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T>(Result<T, Error>);

/// Result of a singular association: the record, or `None` when a `has_one` target is absent.
pub type RecordResult = Outcome<Option<Record>>;

/// Result of a collection association: a relation that has not been executed yet.
pub type CollectionResult = Outcome<Relation>;

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self(Ok(value))
    }

    pub fn err(error: impl Into<Error>) -> Self {
        Self(Err(error.into()))
    }

    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    pub fn is_err(&self) -> bool {
        self.0.is_err()
    }

    /// The value, if this is a success.
    pub fn value(&self) -> Option<&T> {
        self.0.as_ref().ok()
    }

    /// The error, if this is a failure.
    pub fn error(&self) -> Option<&Error> {
        self.0.as_ref().err()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome(self.0.map(f))
    }

    pub fn into_result(self) -> Result<T, Error> {
        self.0
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(result: Result<T, Error>) -> Self {
        Self(result)
    }
}

impl<T> From<Outcome<T>> for Result<T, Error> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.0
    }
}
