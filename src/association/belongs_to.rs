use super::SingularAssociation;
use crate::attribute::DEFAULT_PRIMARY_KEY;
use crate::error::Error;
use crate::record::{Owner, Record};
use crate::reflection::Reflection;
use crate::result::RecordResult;
use std::fmt;
use tracing::debug;

/// The owner holds a reference to one target record.
///
/// ```text
/// +------------------------+        +----------------+
/// |          owners        |        |     targets    |
/// +------------+-----------+        +------+---------+
/// | id         | integer   |    +-->| id   | integer | pk
/// | target_id  | integer   |*---+   | name | string  |
/// +------------+-----------+        +------+---------+
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BelongsTo {
    owner: String,
    target: String,
    foreign_key: Option<String>,
}

impl BelongsTo {
    pub fn new(owner: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            foreign_key: None,
        }
    }

    /// Overrides the foreign key column of the owner.
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

    /// The override, or `<target>_id`. The target name is used as declared.
    pub fn association_foreign_key(&self) -> String {
        match &self.foreign_key {
            Some(fk) => fk.clone(),
            None => format!("{}_{}", self.target, DEFAULT_PRIMARY_KEY),
        }
    }

    fn fetch(
        &self,
        owner: &dyn Owner,
        reflection: &dyn Reflection,
    ) -> Result<Option<Record>, Error> {
        let targets = reflection.reflection(&self.target)?;

        let foreign_key = self.association_foreign_key();
        let target_id = owner.attribute(&foreign_key).cloned().unwrap_or_default();
        debug!(owner = owner.name(), target = %self.target, %foreign_key, %target_id, "belongs_to");

        targets
            .with_context(owner.context().clone())
            .find(target_id)
            .map(Some)
    }
}

impl SingularAssociation for BelongsTo {
    fn access_association(&self, owner: &dyn Owner, reflection: &dyn Reflection) -> RecordResult {
        self.fetch(owner, reflection).into()
    }
}

impl fmt::Display for BelongsTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Association type: 'belongs_to', name: '{}'>", self.target)
    }
}
