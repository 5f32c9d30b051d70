//! # Active Record
//!
//! > **Attribute and association resolution for an active-record style ORM.**
//!
//! This crate is the core that sits between declared record kinds and a
//! storage engine. Given a schema of typed attributes and typed associations,
//! it validates record values, works out how one record relates to others,
//! and lazily builds the query needed to fetch them.
//!
//! ## 🏗️ Design Philosophy
//!
//! - **Schemas are declared once**: a [`RecordKind`] is built by a declaration
//!   closure and shared (`Arc`) by every record of the kind.
//! - **Records own their state**: each [`Record`] owns its attribute values
//!   and its association cache; nothing is locked internally.
//! - **Failures are values**: every association fetch returns an
//!   [`Outcome`](result::Outcome) holding either the value or an [`Error`].
//!   Nothing panics in normal operation.
//!
//! ## 🚀 Core Concepts
//!
//! ### Attributes
//! Typed attribute declarations with validation rules, and exactly one
//! primary key per kind (an integer `id` is synthesized when none is
//! declared). See [`attribute`].
//!
//! ### Associations
//! `belongs_to`, `has_many` and `has_one`, each with its own foreign key
//! convention:
//!
//! | Association | Default foreign key | Fetch |
//! |-------------|---------------------|-------|
//! | `belongs_to("target")` | `target_id` on the owner | `find` by the target's primary key |
//! | `has_many("targets")` | `<owner>_id` on the targets | lazy relation, not executed |
//! | `has_one("target")` | `id` on the target | at most one row, two is an error |
//!
//! See [`association`].
//!
//! ### Collaborators
//! The crate does not store anything. It talks to storage through two traits:
//! [`Reflection`] (kind name → [`Relation`]) and [`QueryEngine`] (executes a
//! [`Query`](relation::Query)). The [`mock`] module provides an in-memory
//! implementation of both.
//!
//! ## 👩‍💻 Example
//!
//! ```rust
//! use active_record::attribute::{IntAttr, StringAttr};
//! use active_record::mock::MemoryStore;
//! use active_record::{RecordKind, Reflection, Value};
//!
//! let store = MemoryStore::new();
//! store.define(RecordKind::build("target", |r| {
//!     r.attribute(StringAttr::new("name"));
//!     r.attribute(IntAttr::new("owner_id"));
//! }).unwrap()).unwrap();
//! store.define(RecordKind::build("owner", |r| {
//!     r.has_many("target");
//! }).unwrap()).unwrap();
//!
//! store.insert("target", [("id", Value::from(1)), ("owner_id", Value::from(7))]).unwrap();
//! store.insert("target", [("id", Value::from(2)), ("owner_id", Value::from(8))]).unwrap();
//!
//! let owner = store.reflection("owner").unwrap()
//!     .new_record([("id", Value::from(7))]).unwrap();
//!
//! let targets = owner.access_collection("target").unwrap().to_a().unwrap();
//! assert_eq!(targets.len(), 1);
//! assert_eq!(targets[0].id(), Some(&Value::from(1)));
//! ```
//!
//! ## 🗺️ Module Tour
//!
//! - [`value`] - dynamic attribute values and cast types
//! - [`attribute`] - attribute declarations, validators, the attribute registry
//! - [`association`] - resolvers and the association registry
//! - [`record`] - record kinds and records
//! - [`relation`] - lazy queries and the [`QueryEngine`] trait
//! - [`reflection`] - the [`Reflection`] trait
//! - [`result`] - [`RecordResult`] and [`CollectionResult`]
//! - [`context`] - the execution context carried into every query
//! - [`mock`] - in-memory store for tests
//! - [`tracing`] - subscriber setup

pub mod association;
pub mod attribute;
pub mod context;
pub mod error;
pub mod mock;
pub mod record;
pub mod reflection;
pub mod relation;
pub mod result;
pub mod tracing;
pub mod value;

// Re-export core types for convenience
pub use association::{Association, AssociationError, BelongsTo, HasMany, HasOne};
pub use attribute::{Attribute, AttributeSchema, Attributes, DEFAULT_PRIMARY_KEY};
pub use context::Context;
pub use error::Error;
pub use record::{Owner, Record, RecordKind};
pub use reflection::Reflection;
pub use relation::{QueryEngine, Relation};
pub use result::{CollectionResult, Outcome, RecordResult};
pub use value::{CastType, Value};
