use super::{Constraint, ValidationError};

pub trait StrProps: std::fmt::Debug + Clone {
    /// Whether the string is used as an exclusive-start pagination cursor.
    const IS_CURSOR: bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameProps;

impl StrProps for NameProps {
    const IS_CURSOR: bool = false;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExclusiveStartProps;

impl StrProps for ExclusiveStartProps {
    const IS_CURSOR: bool = true;
}

pub const IDENTIFIER_PATTERN: &str = "[a-zA-Z0-9_.-]+";

/// Shared rule for stream names and shard ids.
pub(crate) fn check_identifier(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > max_len {
        return Err(ValidationError::new(
            field,
            Constraint::Length {
                min: 1,
                max: max_len,
            },
            value,
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(ValidationError::new(
            field,
            Constraint::Pattern(IDENTIFIER_PATTERN),
            value,
        ));
    }
    Ok(())
}

/// Trait impls common to every validated string newtype of the form
/// `$name<T: StrProps>(CompactString, PhantomData<T>)`.
///
/// The type must implement `TryFrom<CompactString, Error = ValidationError>`.
macro_rules! impl_str_newtype {
    ($name:ident, $field:literal, $cursor_field:literal) => {
        impl<T: $crate::types::strings::StrProps> $name<T> {
            /// Wire name of the field this value occupies.
            pub fn field_name() -> &'static str {
                if T::IS_CURSOR { $cursor_field } else { $field }
            }
        }

        impl<T: $crate::types::strings::StrProps> serde::Serialize for $name<T> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de, T: $crate::types::strings::StrProps> serde::Deserialize<'de> for $name<T> {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = compact_str::CompactString::deserialize(deserializer)?;
                s.try_into().map_err(serde::de::Error::custom)
            }
        }

        impl<T: $crate::types::strings::StrProps> AsRef<str> for $name<T> {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl<T: $crate::types::strings::StrProps> std::ops::Deref for $name<T> {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T: $crate::types::strings::StrProps> std::str::FromStr for $name<T> {
            type Err = $crate::types::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                compact_str::CompactString::from(s).try_into()
            }
        }

        impl<T: $crate::types::strings::StrProps> std::fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<T: $crate::types::strings::StrProps> std::fmt::Display for $name<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<T: $crate::types::strings::StrProps> From<$name<T>> for compact_str::CompactString {
            fn from(value: $name<T>) -> Self {
                value.0
            }
        }

        impl From<$name<$crate::types::strings::NameProps>>
            for $name<$crate::types::strings::ExclusiveStartProps>
        {
            fn from(value: $name<$crate::types::strings::NameProps>) -> Self {
                Self(value.0, std::marker::PhantomData)
            }
        }
    };
}

pub(crate) use impl_str_newtype;
