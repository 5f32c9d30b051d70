//! # Validators
//!
//! Each attribute type owns a list of rules. [`Validators::validate`] first
//! checks that the value has the attribute's cast type (nil is accepted by
//! every type) and then runs every rule; the first failing rule is reported.

use crate::value::{CastType, Value};
use thiserror::Error;

/// Errors reported by attribute validators.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("expected {expected} value, got {actual}")]
    TypeMismatch {
        expected: CastType,
        actual: &'static str,
    },

    #[error("can't be blank")]
    Blank,

    #[error("must be greater than {0}")]
    NotGreaterThan(i64),

    #[error("must be greater than or equal to {0}")]
    NotGreaterThanOrEqualTo(i64),

    #[error("must be less than {0}")]
    NotLessThan(i64),

    #[error("must be less than or equal to {0}")]
    NotLessThanOrEqualTo(i64),

    #[error("is too short (minimum is {0} characters)")]
    TooShort(usize),

    #[error("is too long (maximum is {0} characters)")]
    TooLong(usize),

    #[error("{0} is not included in the list")]
    NotIncluded(Value),

    #[error("{0} is reserved")]
    Excluded(Value),
}

/// Rules for integer attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum IntValidator {
    Presence,
    GreaterThan(i64),
    GreaterThanOrEqualTo(i64),
    LessThan(i64),
    LessThanOrEqualTo(i64),
    Inclusion(Vec<i64>),
    Exclusion(Vec<i64>),
}

impl IntValidator {
    fn validate(&self, value: Option<i64>) -> Result<(), ValidationError> {
        let Some(n) = value else {
            return match self {
                IntValidator::Presence => Err(ValidationError::Blank),
                _ => Ok(()),
            };
        };
        match self {
            IntValidator::Presence => Ok(()),
            IntValidator::GreaterThan(min) if n <= *min => {
                Err(ValidationError::NotGreaterThan(*min))
            }
            IntValidator::GreaterThanOrEqualTo(min) if n < *min => {
                Err(ValidationError::NotGreaterThanOrEqualTo(*min))
            }
            IntValidator::LessThan(max) if n >= *max => Err(ValidationError::NotLessThan(*max)),
            IntValidator::LessThanOrEqualTo(max) if n > *max => {
                Err(ValidationError::NotLessThanOrEqualTo(*max))
            }
            IntValidator::Inclusion(allowed) if !allowed.contains(&n) => {
                Err(ValidationError::NotIncluded(Value::Int(n)))
            }
            IntValidator::Exclusion(denied) if denied.contains(&n) => {
                Err(ValidationError::Excluded(Value::Int(n)))
            }
            _ => Ok(()),
        }
    }
}

/// Rules for string attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum StringValidator {
    /// Non-nil and non-empty.
    Presence,
    MinLength(usize),
    MaxLength(usize),
    Inclusion(Vec<String>),
    Exclusion(Vec<String>),
}

impl StringValidator {
    fn validate(&self, value: Option<&str>) -> Result<(), ValidationError> {
        let Some(s) = value else {
            return match self {
                StringValidator::Presence => Err(ValidationError::Blank),
                _ => Ok(()),
            };
        };
        let len = s.chars().count();
        match self {
            StringValidator::Presence if s.is_empty() => Err(ValidationError::Blank),
            StringValidator::MinLength(min) if len < *min => Err(ValidationError::TooShort(*min)),
            StringValidator::MaxLength(max) if len > *max => Err(ValidationError::TooLong(*max)),
            StringValidator::Inclusion(allowed) if !allowed.iter().any(|a| a == s) => {
                Err(ValidationError::NotIncluded(Value::from(s)))
            }
            StringValidator::Exclusion(denied) if denied.iter().any(|d| d == s) => {
                Err(ValidationError::Excluded(Value::from(s)))
            }
            _ => Ok(()),
        }
    }
}

/// Rules for boolean attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanValidator {
    Presence,
}

/// The typed rule set of one attribute. The variant fixes the cast type.
#[derive(Debug, Clone, PartialEq)]
pub enum Validators {
    Int(Vec<IntValidator>),
    String(Vec<StringValidator>),
    Boolean(Vec<BooleanValidator>),
}

impl Validators {
    pub fn cast_type(&self) -> CastType {
        match self {
            Validators::Int(_) => CastType::Int,
            Validators::String(_) => CastType::String,
            Validators::Boolean(_) => CastType::Boolean,
        }
    }

    /// Validates `value` against the cast type and every rule.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match (self, value) {
            (Validators::Int(rules), Value::Nil) => {
                rules.iter().try_for_each(|r| r.validate(None))
            }
            (Validators::Int(rules), Value::Int(n)) => {
                rules.iter().try_for_each(|r| r.validate(Some(*n)))
            }
            (Validators::String(rules), Value::Nil) => {
                rules.iter().try_for_each(|r| r.validate(None))
            }
            (Validators::String(rules), Value::String(s)) => {
                rules.iter().try_for_each(|r| r.validate(Some(s.as_str())))
            }
            (Validators::Boolean(rules), Value::Nil) => {
                if rules.contains(&BooleanValidator::Presence) {
                    Err(ValidationError::Blank)
                } else {
                    Ok(())
                }
            }
            (Validators::Boolean(_), Value::Boolean(_)) => Ok(()),
            (validators, other) => Err(ValidationError::TypeMismatch {
                expected: validators.cast_type(),
                actual: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_rules() {
        let v = Validators::Int(vec![
            IntValidator::GreaterThan(0),
            IntValidator::LessThanOrEqualTo(10),
        ]);
        assert_eq!(v.validate(&Value::Int(5)), Ok(()));
        assert_eq!(v.validate(&Value::Int(0)), Err(ValidationError::NotGreaterThan(0)));
        assert_eq!(
            v.validate(&Value::Int(11)),
            Err(ValidationError::NotLessThanOrEqualTo(10))
        );
        // nil passes every rule but presence
        assert_eq!(v.validate(&Value::Nil), Ok(()));
    }

    #[test]
    fn test_string_rules() {
        let v = Validators::String(vec![
            StringValidator::Presence,
            StringValidator::MaxLength(3),
        ]);
        assert_eq!(v.validate(&Value::from("abc")), Ok(()));
        assert_eq!(v.validate(&Value::from("")), Err(ValidationError::Blank));
        assert_eq!(v.validate(&Value::Nil), Err(ValidationError::Blank));
        assert_eq!(v.validate(&Value::from("abcd")), Err(ValidationError::TooLong(3)));
    }

    #[test]
    fn test_inclusion_and_exclusion() {
        let v = Validators::String(vec![StringValidator::Inclusion(vec![
            "draft".into(),
            "published".into(),
        ])]);
        assert_eq!(
            v.validate(&Value::from("deleted")),
            Err(ValidationError::NotIncluded(Value::from("deleted")))
        );

        let v = Validators::Int(vec![IntValidator::Exclusion(vec![13])]);
        assert_eq!(
            v.validate(&Value::Int(13)),
            Err(ValidationError::Excluded(Value::Int(13)))
        );
    }

    #[test]
    fn test_type_mismatch() {
        let v = Validators::Int(vec![]);
        assert_eq!(
            v.validate(&Value::from("5")),
            Err(ValidationError::TypeMismatch {
                expected: CastType::Int,
                actual: "string"
            })
        );
        let v = Validators::Boolean(vec![BooleanValidator::Presence]);
        assert_eq!(v.validate(&Value::Nil), Err(ValidationError::Blank));
        assert_eq!(v.validate(&Value::from(false)), Ok(()));
    }
}
