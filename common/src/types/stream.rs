use std::{marker::PhantomData, ops::RangeInclusive};

use compact_str::CompactString;

use super::{
    Constraint, ValidationError,
    resources::Page,
    shard::Shard,
    strings::{ExclusiveStartProps, NameProps, StrProps, check_identifier, impl_str_newtype},
};
use crate::caps;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamNameStr<T: StrProps>(CompactString, PhantomData<T>);

impl<T: StrProps> TryFrom<CompactString> for StreamNameStr<T> {
    type Error = ValidationError;

    fn try_from(name: CompactString) -> Result<Self, Self::Error> {
        check_identifier(Self::field_name(), &name, caps::MAX_STREAM_NAME_LEN)?;
        Ok(Self(name, PhantomData))
    }
}

impl_str_newtype!(StreamNameStr, "StreamName", "ExclusiveStartStreamName");

pub type StreamName = StreamNameStr<NameProps>;

pub type ExclusiveStartStreamName = StreamNameStr<ExclusiveStartProps>;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamStatus {
    Creating,
    Deleting,
    Active,
    Updating,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalingType {
    #[default]
    UniformScaling,
}

/// Which way a retention adjustment moves the stored period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionChange {
    Increase,
    Decrease,
}

impl RetentionChange {
    pub fn bounds(self) -> RangeInclusive<u32> {
        match self {
            Self::Increase => caps::RETENTION_HOURS_INCREASE,
            Self::Decrease => caps::RETENTION_HOURS_DECREASE,
        }
    }

    pub fn check(self, hours: u32) -> Result<(), ValidationError> {
        let bounds = self.bounds();
        if bounds.contains(&hours) {
            Ok(())
        } else {
            Err(ValidationError::new(
                "RetentionPeriodHours",
                Constraint::Range {
                    min: u128::from(*bounds.start()),
                    max: u128::from(*bounds.end()),
                },
                hours,
            ))
        }
    }

    /// Whether moving from `current` to `requested` goes the right way.
    pub fn permits(self, current: u32, requested: u32) -> bool {
        match self {
            Self::Increase => requested > current,
            Self::Decrease => requested < current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescription {
    pub name: StreamName,
    pub status: StreamStatus,
    pub retention_period_hours: u32,
    pub shards: Page<Shard>,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    proptest! {
        #[test]
        fn accepts_every_conforming_name(name in "[a-zA-Z0-9_.-]{1,128}") {
            prop_assert!(name.parse::<StreamName>().is_ok());
        }

        #[test]
        fn rejects_names_with_foreign_chars(
            head in "[a-zA-Z0-9_.-]{0,60}",
            bad in "[^a-zA-Z0-9_.-]",
            tail in "[a-zA-Z0-9_.-]{0,60}",
        ) {
            let name = format!("{head}{bad}{tail}");
            let err = name.parse::<StreamName>().unwrap_err();
            prop_assert_eq!(err.field.as_str(), "StreamName");
            let is_length_or_pattern = matches!(
                err.constraint,
                Constraint::Pattern(_) | Constraint::Length { .. }
            );
            prop_assert!(is_length_or_pattern);
        }
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_long(&"a".repeat(129))]
    fn rejects_bad_lengths(#[case] name: &str) {
        let err = name.parse::<StreamName>().unwrap_err();
        assert_eq!(err.constraint, Constraint::Length { min: 1, max: 128 });
    }

    #[test]
    fn cursor_variant_reports_its_own_field() {
        let err = "no spaces".parse::<ExclusiveStartStreamName>().unwrap_err();
        assert_eq!(err.field, "ExclusiveStartStreamName");
        assert_eq!(err.constraint, Constraint::Pattern("[a-zA-Z0-9_.-]+"));
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<StreamName>(r#""orders.v2""#).is_ok());
        assert!(serde_json::from_str::<StreamName>(r#""orders/v2""#).is_err());
    }

    #[rstest]
    #[case(RetentionChange::Decrease, 10, false)]
    #[case(RetentionChange::Decrease, 24, true)]
    #[case(RetentionChange::Decrease, 168, true)]
    #[case(RetentionChange::Decrease, 169, false)]
    #[case(RetentionChange::Increase, 0, false)]
    #[case(RetentionChange::Increase, 1, true)]
    #[case(RetentionChange::Increase, 168, true)]
    #[case(RetentionChange::Increase, 169, false)]
    fn retention_bounds(#[case] change: RetentionChange, #[case] hours: u32, #[case] ok: bool) {
        assert_eq!(change.check(hours).is_ok(), ok);
    }

    #[test]
    fn status_strings() {
        assert_eq!(StreamStatus::Active.to_string(), "ACTIVE");
        assert_eq!("UPDATING".parse::<StreamStatus>().unwrap(), StreamStatus::Updating);
        assert_eq!(ScalingType::UniformScaling.to_string(), "UNIFORM_SCALING");
    }
}
