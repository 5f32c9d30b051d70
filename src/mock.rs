//! # In-Memory Store & Testing Guide
//!
//! [`MemoryStore`] implements both collaborator traits, [`Reflection`] and
//! [`QueryEngine`], over plain in-memory tables. It lets you exercise record
//! kinds and their associations end-to-end without a database.
//!
//! ## When to use the store vs a real engine
//!
//! | Feature | MemoryStore | Real engine |
//! |---------|-------------|-------------|
//! | **Speed** | Instant (in-memory) | Depends on storage |
//! | **Determinism** | Rows come back in insertion order | Engine defined |
//! | **Nil predicates** | Never match | SQL `NULL` semantics |
//! | **Query log** | Every executed [`Query`] is recorded | Engine specific |
//! | **Error Injection** | Easy ([`MemoryStore::fail_next`]) | Hard |
//!
//! ## Example
//!
//! ```rust
//! use active_record::attribute::{IntAttr, StringAttr};
//! use active_record::mock::MemoryStore;
//! use active_record::{RecordKind, Reflection, Value};
//!
//! let store = MemoryStore::new();
//! store.define(RecordKind::build("target", |r| {
//!     r.attribute(StringAttr::new("name"));
//! }).unwrap()).unwrap();
//! store.define(RecordKind::build("owner", |r| {
//!     r.attribute(IntAttr::new("target_id"));
//!     r.belongs_to("target");
//! }).unwrap()).unwrap();
//!
//! store.insert("target", [("id", Value::from(5)), ("name", Value::from("widget"))]).unwrap();
//!
//! let owners = store.reflection("owner").unwrap();
//! let mut owner = owners
//!     .new_record([("id", Value::from(1)), ("target_id", Value::from(5))])
//!     .unwrap();
//!
//! let target = owner.access_association("target").unwrap().unwrap();
//! assert_eq!(target.attribute("name"), Some(&Value::from("widget")));
//! ```

use crate::attribute::Attributes;
use crate::error::Error;
use crate::record::RecordKind;
use crate::reflection::Reflection;
use crate::relation::{Query, QueryEngine, Relation, Row};
use crate::value::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

/// In-memory tables with a query log.
///
/// Cloning is cheap: clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    kinds: RwLock<BTreeMap<String, Arc<RecordKind>>>,
    tables: RwLock<HashMap<String, Vec<Row>>>,
    log: Mutex<Vec<Query>>,
    failures: Mutex<VecDeque<Error>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record kind with an empty table.
    pub fn define(&self, kind: RecordKind) -> Result<Arc<RecordKind>, Error> {
        let mut kinds = self.inner.kinds.write().unwrap_or_else(PoisonError::into_inner);
        if kinds.contains_key(kind.name()) {
            return Err(Error::DuplicateRecord(kind.name().to_string()));
        }
        let name = kind.name().to_string();
        let kind = Arc::new(kind);
        kinds.insert(name.clone(), kind.clone());
        self.inner
            .tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), Vec::new());
        info!(record = %name, "Defined");
        Ok(kind)
    }

    /// Appends a row to the table of `record`.
    ///
    /// Columns must be declared attributes and values must pass their
    /// validators. The primary key is required and unique within the table.
    pub fn insert<K: Into<String>>(
        &self,
        record: &str,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<(), Error> {
        let kind = self.kind(record)?;
        let attributes = Attributes::with_schema(kind.attributes().clone(), values)?;
        for (name, value) in attributes.iter() {
            if let Some(attr) = kind.attributes().get(name) {
                attr.validate(value)?;
            }
        }

        let column = kind.primary_key().to_string();
        let id = match attributes.id() {
            Some(id) if !id.is_nil() => id.clone(),
            _ => {
                return Err(Error::MissingPrimaryKey {
                    record: record.to_string(),
                    column,
                })
            }
        };

        let row: Row = attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();

        let mut tables = self.inner.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = tables.entry(record.to_string()).or_default();
        if table.iter().any(|existing| existing.get(&column) == Some(&id)) {
            return Err(Error::DuplicateKey {
                record: record.to_string(),
                column,
                id,
            });
        }
        table.push(row);
        debug!(record, size = table.len(), "Inserted");
        Ok(())
    }

    /// Every query executed so far, oldest first.
    pub fn queries(&self) -> Vec<Query> {
        self.inner.log.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear_queries(&self) {
        self.inner.log.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Makes the next executed query fail with `error`.
    pub fn fail_next(&self, error: Error) {
        self.inner
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    fn kind(&self, name: &str) -> Result<Arc<RecordKind>, Error> {
        self.inner
            .kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownRecord(name.to_string()))
    }
}

impl Reflection for MemoryStore {
    fn reflection(&self, name: &str) -> Result<Relation, Error> {
        let kind = self.kind(name)?;
        Ok(Relation::new(
            kind,
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        ))
    }
}

impl QueryEngine for MemoryStore {
    fn execute(&self, query: &Query) -> Result<Vec<Row>, Error> {
        self.inner
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());

        let failure = self
            .inner
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(e) = failure {
            return Err(e);
        }

        let tables = self.inner.tables.read().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .get(&query.record)
            .ok_or_else(|| Error::UnknownRecord(query.record.clone()))?;

        // Nil never equals anything, not even an unset column.
        let matches = table.iter().filter(|row| {
            query
                .predicates
                .iter()
                .all(|p| !p.value.is_nil() && row.get(&p.column) == Some(&p.value))
        });
        let rows: Vec<Row> = match query.limit {
            Some(n) => matches.take(n).cloned().collect(),
            None => matches.cloned().collect(),
        };
        debug!(record = %query.record, matched = rows.len(), "Executed");
        Ok(rows)
    }
}
