//! # Attributes
//!
//! Schema-level attribute declarations and the per-record attribute registry.
//!
//! ## Structure
//!
//! - [`validation`] - typed validation rules and [`ValidationError`]
//! - [`registry`] - [`AttributeSchema`] (one per record kind) and [`Attributes`] (one per record)
//!
//! Attributes are declared through the typed builders [`IntAttr`], [`StringAttr`] and
//! [`BooleanAttr`], and marked as primary key by wrapping them in [`PrimaryKey`]:
//!
//! ```rust
//! use active_record::attribute::{Attribute, IntAttr, IntValidator, PrimaryKey, StringAttr};
//! use active_record::CastType;
//!
//! let uuid: Attribute = PrimaryKey(StringAttr::new("uuid")).into();
//! let age: Attribute = IntAttr::new("age").validates(IntValidator::GreaterThan(0)).into();
//!
//! assert!(uuid.is_primary_key());
//! assert_eq!(age.cast_type(), CastType::Int);
//! ```

pub mod registry;
pub mod validation;

pub use registry::{AttributeSchema, Attributes};
pub use validation::*;

use crate::value::{CastType, Value};

/// Name of the primary key synthesized for kinds that do not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// A declared attribute of a record kind. Immutable once declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    validators: Validators,
    primary_key: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, validators: Validators) -> Self {
        Self {
            name: name.into(),
            validators,
            primary_key: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cast_type(&self) -> CastType {
        self.validators.cast_type()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn validators(&self) -> &Validators {
        &self.validators
    }

    /// Runs the attribute's validators against `value`.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validators.validate(value)
    }
}

/// Integer attribute builder.
#[derive(Debug, Clone, PartialEq)]
pub struct IntAttr {
    pub name: String,
    pub validates: Vec<IntValidator>,
}

impl IntAttr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validates: Vec::new(),
        }
    }

    pub fn validates(mut self, rule: IntValidator) -> Self {
        self.validates.push(rule);
        self
    }
}

impl From<IntAttr> for Attribute {
    fn from(attr: IntAttr) -> Self {
        Attribute::new(attr.name, Validators::Int(attr.validates))
    }
}

/// String attribute builder.
#[derive(Debug, Clone, PartialEq)]
pub struct StringAttr {
    pub name: String,
    pub validates: Vec<StringValidator>,
}

impl StringAttr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validates: Vec::new(),
        }
    }

    pub fn validates(mut self, rule: StringValidator) -> Self {
        self.validates.push(rule);
        self
    }
}

impl From<StringAttr> for Attribute {
    fn from(attr: StringAttr) -> Self {
        Attribute::new(attr.name, Validators::String(attr.validates))
    }
}

/// Boolean attribute builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanAttr {
    pub name: String,
    pub validates: Vec<BooleanValidator>,
}

impl BooleanAttr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validates: Vec::new(),
        }
    }

    pub fn validates(mut self, rule: BooleanValidator) -> Self {
        self.validates.push(rule);
        self
    }
}

impl From<BooleanAttr> for Attribute {
    fn from(attr: BooleanAttr) -> Self {
        Attribute::new(attr.name, Validators::Boolean(attr.validates))
    }
}

/// Marks the wrapped attribute as the primary key of its record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKey<A>(pub A);

impl<A: Into<Attribute>> From<PrimaryKey<A>> for Attribute {
    fn from(pk: PrimaryKey<A>) -> Self {
        let mut attr = pk.0.into();
        attr.primary_key = true;
        attr
    }
}
