//! # Attribute Registry
//!
//! [`AttributeSchema`] holds the attributes declared by one record kind and is
//! built once, when the kind is declared. [`Attributes`] pairs a shared schema
//! with the values of one record.
//!
//! ## Copy semantics
//!
//! Cloning [`Attributes`] shares the schema (`Arc`) and copies the value map, so
//! assignments on the clone never show up on the original.

use super::{Attribute, IntAttr, PrimaryKey, DEFAULT_PRIMARY_KEY};
use crate::error::Error;
use crate::value::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

/// The attributes declared by one record kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    record_name: String,
    primary_key: String,
    keys: BTreeMap<String, Attribute>,
}

impl AttributeSchema {
    /// Builds the schema of `record_name`.
    ///
    /// Exactly one attribute may be marked as primary key. When none is, an
    /// integer primary key named [`DEFAULT_PRIMARY_KEY`] is synthesized, and no
    /// other attribute may use that name.
    pub fn new(
        record_name: impl Into<String>,
        attrs: impl IntoIterator<Item = Attribute>,
    ) -> Result<Self, Error> {
        let record_name = record_name.into();
        let mut primary_key: Option<String> = None;
        let mut keys = BTreeMap::new();

        for attr in attrs {
            if attr.is_primary_key() {
                if primary_key.is_some() {
                    return Err(Error::DuplicatePrimaryKey {
                        record: record_name,
                    });
                }
                primary_key = Some(attr.name().to_string());
            }
            if keys.contains_key(attr.name()) {
                return Err(Error::DuplicateAttribute {
                    record: record_name,
                    attr: attr.name().to_string(),
                });
            }
            keys.insert(attr.name().to_string(), attr);
        }

        if let Some(attr) = keys.get(DEFAULT_PRIMARY_KEY) {
            if !attr.is_primary_key() {
                return Err(Error::ReservedAttributeName {
                    record: record_name,
                    attr: DEFAULT_PRIMARY_KEY.to_string(),
                });
            }
        }

        let primary_key = match primary_key {
            Some(name) => name,
            None => {
                let pk: Attribute = PrimaryKey(IntAttr::new(DEFAULT_PRIMARY_KEY)).into();
                keys.insert(DEFAULT_PRIMARY_KEY.to_string(), pk);
                DEFAULT_PRIMARY_KEY.to_string()
            }
        };

        Ok(Self {
            record_name,
            primary_key,
            keys,
        })
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    /// Name of the primary key attribute.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.keys.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.keys.contains_key(name)
    }

    /// Declared attribute names, sorted.
    pub fn attribute_names(&self) -> Vec<String> {
        self.keys.keys().cloned().collect()
    }

    fn unknown(&self, attr: &str) -> Error {
        Error::UnknownAttribute {
            record: self.record_name.clone(),
            attr: attr.to_string(),
        }
    }
}

/// The attribute values of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    schema: Arc<AttributeSchema>,
    values: HashMap<String, Value>,
}

impl Attributes {
    /// Declares a schema for `record_name` and creates an instance holding `values`.
    pub fn new<K: Into<String>>(
        record_name: impl Into<String>,
        attrs: impl IntoIterator<Item = Attribute>,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, Error> {
        let schema = AttributeSchema::new(record_name, attrs)?;
        Self::with_schema(Arc::new(schema), values)
    }

    /// Creates an instance of an existing schema. Every value name must be declared.
    ///
    /// Values are not validated: rows loaded from storage are taken as they are.
    pub fn with_schema<K: Into<String>>(
        schema: Arc<AttributeSchema>,
        values: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Self, Error> {
        let mut map = HashMap::new();
        for (name, value) in values {
            let name = name.into();
            if !schema.has_attribute(&name) {
                return Err(schema.unknown(&name));
            }
            map.insert(name, value);
        }
        Ok(Self {
            schema,
            values: map,
        })
    }

    pub fn schema(&self) -> &Arc<AttributeSchema> {
        &self.schema
    }

    pub fn record_name(&self) -> &str {
        self.schema.record_name()
    }

    pub fn primary_key(&self) -> &str {
        self.schema.primary_key()
    }

    /// Current value of the primary key.
    pub fn id(&self) -> Option<&Value> {
        self.values.get(self.schema.primary_key())
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.schema.attribute_names()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.schema.has_attribute(name)
    }

    /// Assigns `value` to the attribute `name` after validating it.
    ///
    /// On failure the stored values are left untouched.
    pub fn assign_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Error> {
        let Some(attr) = self.schema.get(name) else {
            warn!(record = self.record_name(), attr = name, "Unknown attribute");
            return Err(self.schema.unknown(name));
        };
        let value = value.into();
        if let Err(e) = attr.validate(&value) {
            warn!(record = self.record_name(), attr = name, error = %e, "Validation failed");
            return Err(e.into());
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Value of `name`, or `None` when the attribute is unknown or unset.
    pub fn access_attribute(&self, name: &str) -> Option<&Value> {
        if !self.has_attribute(name) {
            return None;
        }
        self.values.get(name)
    }

    /// True when `name` is declared and holds a non-nil value.
    pub fn attribute_present(&self, name: &str) -> bool {
        self.access_attribute(name).is_some_and(|v| !v.is_nil())
    }

    /// Assigned `(name, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
