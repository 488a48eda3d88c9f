pub mod account;
pub mod resources;
pub mod shard;
pub mod stream;
pub mod tag;
pub mod strings;

use std::{fmt, ops::Deref, ops::RangeInclusive};

use compact_str::{CompactString, ToCompactString};

/// The kind of rule a field value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Required,
    Length { min: usize, max: usize },
    Pattern(&'static str),
    Range { min: u128, max: u128 },
    Count { min: usize, max: usize },
    Ordering(&'static str),
    Coverage,
    Unique,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("must be specified"),
            Self::Length { min, max } => {
                write!(f, "must be between {min} and {max} characters in length")
            }
            Self::Pattern(pattern) => write!(f, "must match pattern `{pattern}`"),
            Self::Range { min, max } => write!(f, "must be between {min} and {max}"),
            Self::Count { min, max } => write!(f, "must contain between {min} and {max} items"),
            Self::Ordering(rule) => write!(f, "must satisfy `{rule}`"),
            Self::Coverage => f.write_str("must cover the hash key space without gaps"),
            Self::Unique => f.write_str("must not contain duplicates"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{field}` {constraint}, got {value:?}")]
pub struct ValidationError {
    pub field: CompactString,
    pub constraint: Constraint,
    pub value: CompactString,
}

impl ValidationError {
    pub fn new(
        field: impl Into<CompactString>,
        constraint: Constraint,
        value: impl fmt::Display,
    ) -> Self {
        Self {
            field: field.into(),
            constraint,
            value: value.to_compact_string(),
        }
    }

    /// Same violation reported under a different field path, e.g. `Tags[2].Key`.
    pub fn at(self, field: impl Into<CompactString>) -> Self {
        Self {
            field: field.into(),
            ..self
        }
    }
}

/// Every violation found in one request, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn first(&self) -> &ValidationError {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

pub fn check_range(
    field: &'static str,
    value: u64,
    range: RangeInclusive<u64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            Constraint::Range {
                min: u128::from(*range.start()),
                max: u128::from(*range.end()),
            },
            value,
        ))
    }
}

/// Accumulates violations while a request is checked field by field.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationError>,
}

impl Validator {
    pub fn push(&mut self, error: ValidationError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn check(&mut self, result: Result<(), ValidationError>) -> &mut Self {
        if let Err(e) = result {
            self.errors.push(e);
        }
        self
    }

    pub fn range(
        &mut self,
        field: &'static str,
        value: u64,
        range: RangeInclusive<u64>,
    ) -> &mut Self {
        self.check(check_range(field, value, range))
    }

    pub fn count(
        &mut self,
        field: &'static str,
        count: usize,
        range: RangeInclusive<usize>,
    ) -> &mut Self {
        if !range.contains(&count) {
            self.errors.push(ValidationError::new(
                field,
                Constraint::Count {
                    min: *range.start(),
                    max: *range.end(),
                },
                count,
            ));
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Field-level checks for a request, run before it may be dispatched.
pub trait Validate {
    fn check(&self, validator: &mut Validator);

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::default();
        self.check(&mut validator);
        validator.finish()
    }

    fn validated(self) -> Result<Validated<Self>, ValidationErrors>
    where
        Self: Sized,
    {
        Validated::new(self)
    }
}

/// A request that passed validation. It can be read but never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T>(T);

impl<T: Validate> Validated<T> {
    pub fn new(value: T) -> Result<Self, ValidationErrors> {
        value.validate()?;
        Ok(Self(value))
    }
}

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<T> for Validated<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}
