use super::{AssociationError, SingularAssociation};
use crate::attribute::DEFAULT_PRIMARY_KEY;
use crate::error::Error;
use crate::record::{Owner, Record};
use crate::reflection::Reflection;
use crate::result::RecordResult;
use std::fmt;
use tracing::{debug, warn};

/// Rows fetched to check `has_one` cardinality. Two is enough to detect a violation.
pub const HAS_ONE_PROBE_LIMIT: usize = 2;

/// At most one target record references the owner.
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
pub struct HasOne {
    owner: String,
    target: String,
    foreign_key: Option<String>,
}

impl HasOne {
    pub fn new(owner: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Overrides the foreign key column of the target.
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

    /// The override, or `<target>_id`.
    ///
    /// Unlike the other associations this is a foreign-key shaped string, not
    /// the target kind's name. Lookups by target go through [`HasOne::target_name`].
    pub fn association_name(&self) -> String {
        match &self.foreign_key {
            Some(fk) => fk.clone(),
            None => format!("{}_{}", self.target, DEFAULT_PRIMARY_KEY),
        }
    }

    /// The override, or the primary key name.
    pub fn association_foreign_key(&self) -> String {
        match &self.foreign_key {
            Some(fk) => fk.clone(),
            None => DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    fn fetch(
        &self,
        owner: &dyn Owner,
        reflection: &dyn Reflection,
    ) -> Result<Option<Record>, Error> {
        let targets = reflection.reflection(&self.target)?;

        let foreign_key = self.association_foreign_key();
        let owner_id = owner.id().cloned().unwrap_or_default();
        debug!(owner = owner.name(), target = %self.target, %foreign_key, %owner_id, "has_one");

        let mut records = targets
            .with_context(owner.context().clone())
            .where_eq(foreign_key, owner_id)
            .limit(HAS_ONE_PROBE_LIMIT)
            .to_a()?;

        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop()),
            n => {
                warn!(
                    owner = owner.name(),
                    target = %self.target,
                    matched = n,
                    "has_one matched many"
                );
                let records = records
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(AssociationError::HasOneViolation {
                    assoc: self.target.clone(),
                    records,
                }
                .into())
            }
        }
    }
}

impl SingularAssociation for HasOne {
    fn access_association(&self, owner: &dyn Owner, reflection: &dyn Reflection) -> RecordResult {
        self.fetch(owner, reflection).into()
    }
}

impl fmt::Display for HasOne {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Association type: 'has_one', name: '{}'>", self.target)
    }
}
