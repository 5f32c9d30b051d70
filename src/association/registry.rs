//! # Association Registry
//!
//! [`AssociationSchema`] holds the associations declared by one record kind.
//! [`Associations`] is the per-record registry: it dispatches lookups by name
//! to the declared resolver and caches singular results.
//!
//! ## Caching
//!
//! The first successful [`Associations::association`] call for a name stores
//! its result; later calls return the stored record without touching storage.
//! The cache is never invalidated automatically, so changes to the stored
//! relationship after the first access are not observed.
//!
//! ## Copy semantics
//!
//! Cloning shares the schema and the reflection handle (`Arc`) and copies the
//! cache map. Cached records are copied with it.

use super::{Association, AssociationError, AssociationReflection};
use crate::error::Error;
use crate::record::{Owner, Record};
use crate::reflection::Reflection;
use crate::relation::Relation;
use crate::result::{CollectionResult, Outcome, RecordResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The associations declared by one record kind, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationSchema {
    record_name: String,
    keys: BTreeMap<String, Association>,
}

impl AssociationSchema {
    /// Builds the schema. Each association is keyed by its target name, which
    /// must be unique within the kind.
    pub fn new(
        record_name: impl Into<String>,
        assocs: impl IntoIterator<Item = Association>,
    ) -> Result<Self, Error> {
        let record_name = record_name.into();
        let mut keys = BTreeMap::new();
        for assoc in assocs {
            let name = assoc.target_name().to_string();
            if keys.contains_key(&name) {
                return Err(Error::DuplicateAssociation {
                    record: record_name,
                    assoc: name,
                });
            }
            keys.insert(name, assoc);
        }
        Ok(Self { record_name, keys })
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    pub fn get(&self, name: &str) -> Option<&Association> {
        self.keys.get(name)
    }

    pub fn has_association(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// Declared association names, sorted.
    pub fn association_names(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Association)> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The associations of one record.
#[derive(Debug, Clone)]
pub struct Associations {
    schema: Arc<AssociationSchema>,
    reflection: Arc<dyn Reflection>,
    values: HashMap<String, Option<Record>>,
}

impl Associations {
    pub fn new(schema: Arc<AssociationSchema>, reflection: Arc<dyn Reflection>) -> Self {
        Self {
            schema,
            reflection,
            values: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<AssociationSchema> {
        &self.schema
    }

    pub fn reflection(&self) -> &Arc<dyn Reflection> {
        &self.reflection
    }

    pub fn record_name(&self) -> &str {
        self.schema.record_name()
    }

    pub fn has_association(&self, name: &str) -> bool {
        self.schema.has_association(name)
    }

    /// True when every name is declared.
    pub fn has_associations<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> bool {
        names
            .into_iter()
            .all(|name| self.has_association(name.as_ref()))
    }

    pub fn association_names(&self) -> Vec<String> {
        self.schema.association_names()
    }

    /// True when a value for `name` is cached.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Pairs the association `name` with its target relation.
    ///
    /// `None` when the association is not declared or its target cannot be reflected.
    pub fn reflect_on_association(&self, name: &str) -> Option<AssociationReflection> {
        let association = self.schema.get(name)?;
        self.reflect(association)
    }

    /// Reflections of every association whose target can currently be reflected.
    pub fn reflect_on_all_associations(&self) -> Vec<AssociationReflection> {
        self.schema
            .iter()
            .filter_map(|(_, association)| self.reflect(association))
            .collect()
    }

    fn reflect(&self, association: &Association) -> Option<AssociationReflection> {
        match self.reflection.reflection(association.target_name()) {
            Ok(relation) => Some(AssociationReflection {
                relation,
                association: association.clone(),
            }),
            Err(e) => {
                debug!(
                    record = self.record_name(),
                    target = association.target_name(),
                    error = %e,
                    "Skipping unreflectable association"
                );
                None
            }
        }
    }

    fn get(&self, name: &str) -> Result<&Association, Error> {
        self.schema.get(name).ok_or_else(|| Error::UnknownAssociation {
            record: self.record_name().to_string(),
            assoc: name.to_string(),
        })
    }

    /// Resolves the singular association `name` for `owner`.
    #[instrument(skip(self, owner), fields(record = %self.record_name()))]
    pub fn association(&mut self, name: &str, owner: &dyn Owner) -> RecordResult {
        let association = match self.get(name) {
            Ok(association) => association,
            Err(e) => return Outcome::err(e),
        };

        if let Some(cached) = self.values.get(name) {
            debug!("Cache hit");
            return Outcome::ok(cached.clone());
        }

        let Some(singular) = association.as_singular() else {
            return Outcome::err(AssociationError::NotSingular(name.to_string()));
        };

        let outcome = singular.access_association(owner, self.reflection.as_ref());
        match outcome.value() {
            Some(record) => {
                self.values.insert(name.to_string(), record.clone());
            }
            None => {
                if let Some(e) = outcome.error() {
                    warn!(error = %e, "Association failed");
                }
            }
        }
        outcome
    }

    /// [`Associations::association`] as a plain `Result`.
    pub fn access_association(
        &mut self,
        name: &str,
        owner: &dyn Owner,
    ) -> Result<Option<Record>, Error> {
        self.association(name, owner).into_result()
    }

    /// Resolves the collection association `name` for `owner`. Not cached.
    #[instrument(skip(self, owner), fields(record = %self.record_name()))]
    pub fn collection(&self, name: &str, owner: &dyn Owner) -> CollectionResult {
        let association = match self.get(name) {
            Ok(association) => association,
            Err(e) => return Outcome::err(e),
        };

        let Some(collection) = association.as_collection() else {
            return Outcome::err(AssociationError::NotCollection(name.to_string()));
        };

        let outcome = collection.access_collection(owner, self.reflection.as_ref());
        if let Some(e) = outcome.error() {
            warn!(error = %e, "Collection failed");
        }
        outcome
    }

    /// [`Associations::collection`] as a plain `Result`.
    pub fn access_collection(&self, name: &str, owner: &dyn Owner) -> Result<Relation, Error> {
        self.collection(name, owner).into_result()
    }

    /// Stores `record` as the value of the singular association `name`.
    pub fn assign_association(&mut self, name: &str, record: Option<Record>) -> Result<(), Error> {
        let association = self.get(name)?;
        if association.as_singular().is_none() {
            return Err(AssociationError::NotSingular(name.to_string()).into());
        }
        self.values.insert(name.to_string(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::association::{BelongsTo, HasMany, HasOne};

    fn schema() -> AssociationSchema {
        AssociationSchema::new(
            "owner",
            [
                Association::from(BelongsTo::new("owner", "target")),
                HasMany::new("owner", "targets").into(),
                HasOne::new("owner", "profile").into(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(schema().association_names(), vec!["profile", "target", "targets"]);
    }

    #[test]
    fn test_duplicate_association_fails() {
        let result = AssociationSchema::new(
            "owner",
            [
                Association::from(BelongsTo::new("owner", "target")),
                HasOne::new("owner", "target").into(),
            ],
        );
        assert_eq!(
            result,
            Err(Error::DuplicateAssociation {
                record: "owner".into(),
                assoc: "target".into()
            })
        );
    }

    #[test]
    fn test_lookup() {
        let schema = schema();
        assert!(schema.has_association("targets"));
        assert!(!schema.has_association("ghosts"));
        assert!(matches!(schema.get("target"), Some(Association::BelongsTo(_))));
    }
}
