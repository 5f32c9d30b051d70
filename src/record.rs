//! # Records
//!
//! A [`RecordKind`] is the declared schema of a named entity: its attributes
//! and its associations. It is built once and shared by every [`Record`] of
//! the kind.
//!
//! ```rust
//! use active_record::attribute::{IntAttr, StringAttr};
//! use active_record::RecordKind;
//!
//! let owner = RecordKind::build("owner", |r| {
//!     r.attribute(StringAttr::new("name"));
//!     r.attribute(IntAttr::new("target_id"));
//!     r.belongs_to("target");
//!     r.has_many("targets").foreign_key("holder_id");
//! })
//! .unwrap();
//!
//! assert_eq!(owner.primary_key(), "id");
//! assert_eq!(owner.associations().association_names(), vec!["target", "targets"]);
//! ```

use crate::association::{
    Association, AssociationReflection, AssociationSchema, Associations, BelongsTo, HasMany, HasOne,
};
use crate::attribute::{Attribute, AttributeSchema, Attributes, PrimaryKey};
use crate::context::Context;
use crate::error::Error;
use crate::reflection::Reflection;
use crate::relation::Relation;
use crate::result::{CollectionResult, RecordResult};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// The declared schema of one record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordKind {
    name: String,
    attributes: Arc<AttributeSchema>,
    associations: Arc<AssociationSchema>,
}

impl RecordKind {
    /// Declares a record kind. Schema errors abort the declaration.
    pub fn build(
        name: impl Into<String>,
        declare: impl FnOnce(&mut KindBuilder),
    ) -> Result<Self, Error> {
        let mut builder = KindBuilder {
            name: name.into(),
            attributes: Vec::new(),
            associations: Vec::new(),
        };
        declare(&mut builder);

        let attributes = AttributeSchema::new(builder.name.clone(), builder.attributes)?;
        let associations = AssociationSchema::new(builder.name.clone(), builder.associations)?;
        Ok(Self {
            name: builder.name,
            attributes: Arc::new(attributes),
            associations: Arc::new(associations),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &str {
        self.attributes.primary_key()
    }

    pub fn attributes(&self) -> &Arc<AttributeSchema> {
        &self.attributes
    }

    pub fn associations(&self) -> &Arc<AssociationSchema> {
        &self.associations
    }
}

/// Collects declarations inside [`RecordKind::build`].
#[derive(Debug)]
pub struct KindBuilder {
    name: String,
    attributes: Vec<Attribute>,
    associations: Vec<Association>,
}

impl KindBuilder {
    pub fn attribute(&mut self, attr: impl Into<Attribute>) -> &mut Self {
        self.attributes.push(attr.into());
        self
    }

    /// Declares `attr` as the primary key.
    pub fn primary_key(&mut self, attr: impl Into<Attribute>) -> &mut Self {
        self.attributes.push(PrimaryKey(attr.into()).into());
        self
    }

    pub fn belongs_to(&mut self, target: impl Into<String>) -> AssociationDecl<'_> {
        self.declare(BelongsTo::new(self.name.clone(), target).into())
    }

    pub fn has_many(&mut self, target: impl Into<String>) -> AssociationDecl<'_> {
        self.declare(HasMany::new(self.name.clone(), target).into())
    }

    pub fn has_one(&mut self, target: impl Into<String>) -> AssociationDecl<'_> {
        self.declare(HasOne::new(self.name.clone(), target).into())
    }

    fn declare(&mut self, association: Association) -> AssociationDecl<'_> {
        self.associations.push(association);
        let last = self.associations.len() - 1;
        AssociationDecl(&mut self.associations[last])
    }
}

/// A freshly declared association, open for options.
pub struct AssociationDecl<'a>(&'a mut Association);

impl AssociationDecl<'_> {
    /// Overrides the default foreign key.
    pub fn foreign_key(self, foreign_key: impl Into<String>) {
        self.0.set_foreign_key(foreign_key.into());
    }
}

/// What association resolvers need to know about the record they start from.
pub trait Owner {
    /// Name of the owner's record kind.
    fn name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&Value>;
    fn id(&self) -> Option<&Value>;
    fn context(&self) -> &Context;
}

/// Borrowed owner view used while the record's association registry is mutably borrowed.
struct OwnerRef<'a> {
    name: &'a str,
    attributes: &'a Attributes,
    context: &'a Context,
}

impl Owner for OwnerRef<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.access_attribute(name)
    }

    fn id(&self) -> Option<&Value> {
        self.attributes.id()
    }

    fn context(&self) -> &Context {
        self.context
    }
}

/// One in-memory record.
///
/// Cloning a record shares its kind and copies its attribute values and
/// cached associations.
#[derive(Debug, Clone)]
pub struct Record {
    kind: Arc<RecordKind>,
    attributes: Attributes,
    associations: Associations,
    context: Context,
}

impl Record {
    /// Creates a record of `kind`. Every value name must be a declared attribute.
    pub fn new<K: Into<String>>(
        kind: Arc<RecordKind>,
        reflection: Arc<dyn Reflection>,
        values: impl IntoIterator<Item = (K, Value)>,
        context: Context,
    ) -> Result<Self, Error> {
        let attributes = Attributes::with_schema(kind.attributes().clone(), values)?;
        let associations = Associations::new(kind.associations().clone(), reflection);
        Ok(Self {
            kind,
            attributes,
            associations,
            context,
        })
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

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn associations(&self) -> &Associations {
        &self.associations
    }

    fn split(&mut self) -> (OwnerRef<'_>, &mut Associations) {
        let owner = OwnerRef {
            name: self.kind.name(),
            attributes: &self.attributes,
            context: &self.context,
        };
        (owner, &mut self.associations)
    }

    fn owner(&self) -> OwnerRef<'_> {
        OwnerRef {
            name: self.kind.name(),
            attributes: &self.attributes,
            context: &self.context,
        }
    }

    // --- Attributes ---

    pub fn primary_key(&self) -> &str {
        self.attributes.primary_key()
    }

    pub fn id(&self) -> Option<&Value> {
        self.attributes.id()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.access_attribute(name)
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes.attribute_names()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.has_attribute(name)
    }

    pub fn assign_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        self.attributes.assign_attribute(name, value)
    }

    pub fn access_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.access_attribute(name)
    }

    pub fn attribute_present(&self, name: &str) -> bool {
        self.attributes.attribute_present(name)
    }

    // --- Associations ---

    pub fn association_names(&self) -> Vec<String> {
        self.associations.association_names()
    }

    pub fn has_association(&self, name: &str) -> bool {
        self.associations.has_association(name)
    }

    pub fn has_associations<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> bool {
        self.associations.has_associations(names)
    }

    pub fn reflect_on_association(&self, name: &str) -> Option<AssociationReflection> {
        self.associations.reflect_on_association(name)
    }

    pub fn reflect_on_all_associations(&self) -> Vec<AssociationReflection> {
        self.associations.reflect_on_all_associations()
    }

    pub fn association(&mut self, name: &str) -> RecordResult {
        let (owner, associations) = self.split();
        associations.association(name, &owner)
    }

    pub fn access_association(&mut self, name: &str) -> Result<Option<Record>, Error> {
        let (owner, associations) = self.split();
        associations.access_association(name, &owner)
    }

    pub fn collection(&self, name: &str) -> CollectionResult {
        self.associations.collection(name, &self.owner())
    }

    pub fn access_collection(&self, name: &str) -> Result<Relation, Error> {
        self.associations.access_collection(name, &self.owner())
    }

    pub fn assign_association(&mut self, name: &str, record: Option<Record>) -> Result<(), Error> {
        self.associations.assign_association(name, record)
    }
}

impl Owner for Record {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.access_attribute(name)
    }

    fn id(&self) -> Option<&Value> {
        self.attributes.id()
    }

    fn context(&self) -> &Context {
        &self.context
    }
}

/// Records are equal when they have the same kind name and attribute values.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind.name() == other.kind.name() && self.attributes == other.attributes
    }
}

/// `#<owner id: 1, name: "widget">`, attributes in name order.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}", self.kind.name())?;
        for (i, name) in self.attributes.attribute_names().iter().enumerate() {
            let value = self.attributes.access_attribute(name).unwrap_or(&Value::Nil);
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        write!(f, ">")
    }
}
