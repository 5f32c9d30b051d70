//! # Relations
//!
//! A [`Relation`] is a lazy query over one record kind. Narrowing calls
//! ([`Relation::with_context`], [`Relation::where_eq`], [`Relation::limit`])
//! return a new relation and touch no storage; only [`Relation::to_a`] and
//! [`Relation::find`] hand a [`Query`] to the [`QueryEngine`].

use crate::error::Error;
use crate::context::Context;
use crate::record::{Record, RecordKind};
use crate::reflection::Reflection;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// One stored row, keyed by attribute name.
pub type Row = HashMap<String, Value>;

/// Equality constraint on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub value: Value,
}

/// What a [`QueryEngine`] is asked to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub record: String,
    pub predicates: Vec<Predicate>,
    pub limit: Option<usize>,
    pub context: Context,
}

/// Executes queries against storage.
pub trait QueryEngine: Debug + Send + Sync {
    /// Rows of `query.record` matching every predicate, at most `query.limit` of them.
    fn execute(&self, query: &Query) -> Result<Vec<Row>, Error>;
}

/// Lazy, chainable query handle over one record kind.
#[derive(Debug, Clone)]
pub struct Relation {
    kind: Arc<RecordKind>,
    engine: Arc<dyn QueryEngine>,
    reflection: Arc<dyn Reflection>,
    predicates: Vec<Predicate>,
    limit: Option<usize>,
    context: Context,
}

impl Relation {
    pub fn new(
        kind: Arc<RecordKind>,
        engine: Arc<dyn QueryEngine>,
        reflection: Arc<dyn Reflection>,
    ) -> Self {
        Self {
            kind,
            engine,
            reflection,
            predicates: Vec::new(),
            limit: None,
            context: Context::background(),
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn kind(&self) -> &Arc<RecordKind> {
        &self.kind
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Runs the relation's queries under `context`.
    pub fn with_context(&self, context: Context) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    /// Narrows the relation to rows where `column` equals `value`.
    pub fn where_eq(&self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut relation = self.clone();
        relation.predicates.push(Predicate {
            column: column.into(),
            value: value.into(),
        });
        relation
    }

    pub fn limit(&self, n: usize) -> Self {
        Self {
            limit: Some(n),
            ..self.clone()
        }
    }

    /// The query this relation would execute.
    pub fn query(&self) -> Query {
        Query {
            record: self.kind.name().to_string(),
            predicates: self.predicates.clone(),
            limit: self.limit,
            context: self.context.clone(),
        }
    }

    /// Executes the relation and loads every matching record.
    pub fn to_a(&self) -> Result<Vec<Record>, Error> {
        let query = self.query();
        debug!(
            record = %query.record,
            predicates = ?query.predicates,
            limit = ?query.limit,
            "Executing"
        );

        self.engine
            .execute(&query)?
            .into_iter()
            .map(|row| self.load(row))
            .collect()
    }

    /// Loads the record whose primary key equals `id`.
    pub fn find(&self, id: impl Into<Value>) -> Result<Record, Error> {
        let id = id.into();
        let column = self.kind.primary_key().to_string();
        let mut records = self.where_eq(column.clone(), id.clone()).limit(1).to_a()?;
        records.pop().ok_or_else(|| Error::RecordNotFound {
            record: self.kind.name().to_string(),
            column,
            id,
        })
    }

    /// Builds an unsaved record of this kind, bound to this relation's context.
    pub fn new_record<K: Into<String>>(
        &self,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Record, Error> {
        Record::new(
            self.kind.clone(),
            self.reflection.clone(),
            values,
            self.context.clone(),
        )
    }

    fn load(&self, row: Row) -> Result<Record, Error> {
        self.new_record(row)
    }
}
