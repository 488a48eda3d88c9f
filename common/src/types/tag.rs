use std::{fmt, marker::PhantomData, ops::Deref, str::FromStr};

use compact_str::{CompactString, ToCompactString};

use super::{
    Constraint, ValidationError,
    strings::{ExclusiveStartProps, NameProps, StrProps, impl_str_newtype},
};
use crate::caps;

pub const TAG_PATTERN: &str = r"[\p{L}\p{Z}\p{N}_.:/=+\-@%]*";

/// Combining marks some scripts flag as alphabetic. They are not letters.
fn is_combining_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Space, line and paragraph separators. Controls such as tab are excluded.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        ' ' | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

fn is_tag_char(c: char) -> bool {
    (c.is_alphabetic() && !is_combining_mark(c))
        || c.is_numeric()
        || is_separator(c)
        || matches!(c, '_' | '.' | ':' | '/' | '=' | '+' | '-' | '@' | '%')
}

fn check_tag_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::new(
            field,
            Constraint::Length { min, max },
            value,
        ));
    }
    if !value.chars().all(is_tag_char) {
        return Err(ValidationError::new(
            field,
            Constraint::Pattern(TAG_PATTERN),
            value,
        ));
    }
    Ok(())
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKeyStr<T: StrProps>(CompactString, PhantomData<T>);

impl<T: StrProps> TryFrom<CompactString> for TagKeyStr<T> {
    type Error = ValidationError;

    fn try_from(key: CompactString) -> Result<Self, Self::Error> {
        check_tag_text(Self::field_name(), &key, 1, caps::MAX_TAG_KEY_LEN)?;
        Ok(Self(key, PhantomData))
    }
}

impl_str_newtype!(TagKeyStr, "TagKey", "ExclusiveStartTagKey");

pub type TagKey = TagKeyStr<NameProps>;

pub type ExclusiveStartTagKey = TagKeyStr<ExclusiveStartProps>;

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct TagValue(CompactString);

impl TryFrom<CompactString> for TagValue {
    type Error = ValidationError;

    fn try_from(value: CompactString) -> Result<Self, Self::Error> {
        check_tag_text("TagValue", &value, 0, caps::MAX_TAG_VALUE_LEN)?;
        Ok(Self(value))
    }
}

impl FromStr for TagValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_compact_string().try_into()
    }
}

impl Deref for TagValue {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for TagValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for TagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TagValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = CompactString::deserialize(deserializer)?;
        s.try_into().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub key: TagKey,
    pub value: TagValue,
}

impl Tag {
    pub fn new(key: TagKey, value: TagValue) -> Self {
        Self { key, value }
    }
}
