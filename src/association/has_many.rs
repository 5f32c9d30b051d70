use super::CollectionAssociation;
use crate::attribute::DEFAULT_PRIMARY_KEY;
use crate::error::Error;
use crate::record::Owner;
use crate::reflection::Reflection;
use crate::relation::Relation;
use crate::result::CollectionResult;
use std::fmt;
use tracing::debug;

/// Each owner has zero or more target records referencing it.
///
/// ```text
/// +----------------+         +--------------------+
/// |     owners     |         |       targets      |
/// +------+---------+         +----------+---------+
/// | id   | integer |<---+    | id       | integer |
/// | name | string  |    +---*| owner_id | integer |
/// +------+---------+         | name     | string  |
///                            +----------+---------+
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HasMany {
    owner: String,
    target: String,
    foreign_key: Option<String>,
}

impl HasMany {
    pub fn new(owner: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Overrides the foreign key column of the targets.
    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub(crate) fn set_foreign_key(&mut self, foreign_key: String) {
        self.foreign_key = Some(foreign_key);
    }

    pub fn owner_name(&self) -> &str {
        &self.owner
    }

    pub fn target_name(&self) -> &str {
        &self.target
    }

    pub fn association_name(&self) -> String {
        self.target.clone()
    }

    /// The override, or `<lowercased owner>_id`.
    pub fn association_foreign_key(&self) -> String {
        match &self.foreign_key {
            Some(fk) => fk.clone(),
            None => format!("{}_{}", self.owner.to_lowercase(), DEFAULT_PRIMARY_KEY),
        }
    }

    fn narrow(&self, owner: &dyn Owner, reflection: &dyn Reflection) -> Result<Relation, Error> {
        let targets = reflection.reflection(&self.target)?;

        let foreign_key = self.association_foreign_key();
        let owner_id = owner.id().cloned().unwrap_or_default();
        debug!(owner = owner.name(), target = %self.target, %foreign_key, %owner_id, "has_many");

        // Not executed here: the caller decides when to load the rows.
        Ok(targets
            .with_context(owner.context().clone())
            .where_eq(foreign_key, owner_id))
    }
}

impl CollectionAssociation for HasMany {
    fn access_collection(
        &self,
        owner: &dyn Owner,
        reflection: &dyn Reflection,
    ) -> CollectionResult {
        self.narrow(owner, reflection).into()
    }
}

impl fmt::Display for HasMany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Association type: 'has_many', name: '{}'>", self.target)
    }
}
