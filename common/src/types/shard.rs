use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use compact_str::{CompactString, ToCompactString};

use super::{
    Constraint, ValidationError,
    strings::{ExclusiveStartProps, NameProps, StrProps, check_identifier, impl_str_newtype},
};
use crate::caps;

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardIdStr<T: StrProps>(CompactString, PhantomData<T>);

impl<T: StrProps> TryFrom<CompactString> for ShardIdStr<T> {
    type Error = ValidationError;

    fn try_from(id: CompactString) -> Result<Self, Self::Error> {
        check_identifier(Self::field_name(), &id, caps::MAX_SHARD_ID_LEN)?;
        Ok(Self(id, PhantomData))
    }
}

impl_str_newtype!(ShardIdStr, "ShardId", "ExclusiveStartShardId");

pub type ShardId = ShardIdStr<NameProps>;

pub type ExclusiveStartShardId = ShardIdStr<ExclusiveStartProps>;

impl ShardId {
    /// Conventional id for the `index`-th shard ever created in a stream.
    pub fn from_index(index: u64) -> Self {
        Self(format!("shardId-{index:012}").into(), PhantomData)
    }
}

/// A position in the 128-bit hash key space, written as a decimal string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashKey(u128);

impl HashKey {
    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u128 {
        self.0
    }

    fn parse_field(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new(field, Constraint::Pattern("[0-9]+"), s));
        }
        s.parse::<u128>().map(Self).map_err(|_| {
            ValidationError::new(
                field,
                Constraint::Range {
                    min: 0,
                    max: u128::MAX,
                },
                s,
            )
        })
    }
}

impl FromStr for HashKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("HashKey", s)
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for HashKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_compact_string())
    }
}

impl<'de> serde::Deserialize<'de> for HashKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = CompactString::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive range of hash keys owned by one shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKeyRange {
    starting: HashKey,
    ending: HashKey,
}

impl HashKeyRange {
    pub const FULL: Self = Self {
        starting: HashKey::MIN,
        ending: HashKey::MAX,
    };

    pub fn new(starting: HashKey, ending: HashKey) -> Result<Self, ValidationError> {
        if starting > ending {
            return Err(ValidationError::new(
                "HashKeyRange",
                Constraint::Ordering("StartingHashKey <= EndingHashKey"),
                format_args!("[{starting}, {ending}]"),
            ));
        }
        Ok(Self { starting, ending })
    }

    pub fn parse(starting: &str, ending: &str) -> Result<Self, ValidationError> {
        let starting = HashKey::parse_field("StartingHashKey", starting)?;
        let ending = HashKey::parse_field("EndingHashKey", ending)?;
        Self::new(starting, ending)
    }

    pub fn starting(&self) -> HashKey {
        self.starting
    }

    pub fn ending(&self) -> HashKey {
        self.ending
    }

    pub fn contains(&self, key: HashKey) -> bool {
        self.starting <= key && key <= self.ending
    }

    /// Splits the whole key space into `count` contiguous ranges of near-equal width.
    /// The last range absorbs the remainder.
    pub fn partition(count: u32) -> Vec<Self> {
        let count = u128::from(count.max(1));
        let step = u128::MAX / count;
        (0..count)
            .map(|i| Self {
                starting: HashKey(i * step),
                ending: if i + 1 == count {
                    HashKey::MAX
                } else {
                    HashKey((i + 1) * step - 1)
                },
            })
            .collect()
    }

    /// Checks that `ranges` tile the whole key space: sorted by starting key, they
    /// must begin at zero, end at the maximum, and abut without gaps or overlap.
    pub fn check_coverage<'a>(
        ranges: impl IntoIterator<Item = &'a HashKeyRange>,
    ) -> Result<(), ValidationError> {
        let mut ranges: Vec<_> = ranges.into_iter().copied().collect();
        ranges.sort_by_key(|r| r.starting);

        let gap = |at: u128| {
            ValidationError::new("HashKeyRange", Constraint::Coverage, format_args!("{at}"))
        };

        let mut next = Some(0u128);
        for range in ranges {
            match next {
                Some(expected) if range.starting.0 == expected => {
                    next = range.ending.0.checked_add(1);
                }
                Some(expected) => return Err(gap(expected)),
                None => return Err(gap(range.starting.0)),
            }
        }
        match next {
            None => Ok(()),
            Some(expected) => Err(gap(expected)),
        }
    }
}

/// Decimal sequence number of a record, compared numerically.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SequenceNumber(CompactString);

impl SequenceNumber {
    const PATTERN: &'static str = "0|[1-9][0-9]{0,128}";

    fn parse_field(field: &'static str, s: CompactString) -> Result<Self, ValidationError> {
        let well_formed = !s.is_empty()
            && s.len() <= caps::MAX_SEQUENCE_NUMBER_DIGITS
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s.len() == 1 || !s.starts_with('0'));
        if !well_formed {
            return Err(ValidationError::new(field, Constraint::Pattern(Self::PATTERN), s));
        }
        Ok(Self(s))
    }
}

impl From<u128> for SequenceNumber {
    fn from(value: u128) -> Self {
        Self(value.to_compact_string())
    }
}

impl TryFrom<CompactString> for SequenceNumber {
    type Error = ValidationError;

    fn try_from(s: CompactString) -> Result<Self, Self::Error> {
        Self::parse_field("SequenceNumber", s)
    }
}

impl FromStr for SequenceNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.to_compact_string().try_into()
    }
}

impl Ord for SequenceNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        // Canonical decimals: a longer string is always the larger number.
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for SequenceNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SequenceNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for SequenceNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for SequenceNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = CompactString::deserialize(deserializer)?;
        s.try_into().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceNumberRange {
    starting: SequenceNumber,
    ending: Option<SequenceNumber>,
}

impl SequenceNumberRange {
    pub fn open(starting: SequenceNumber) -> Self {
        Self {
            starting,
            ending: None,
        }
    }

    pub fn new(
        starting: SequenceNumber,
        ending: Option<SequenceNumber>,
    ) -> Result<Self, ValidationError> {
        if let Some(end) = &ending
            && *end < starting
        {
            return Err(ValidationError::new(
                "SequenceNumberRange",
                Constraint::Ordering("StartingSequenceNumber <= EndingSequenceNumber"),
                format_args!("[{starting}, {end}]"),
            ));
        }
        Ok(Self { starting, ending })
    }

    pub fn starting(&self) -> &SequenceNumber {
        &self.starting
    }

    pub fn ending(&self) -> Option<&SequenceNumber> {
        self.ending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.ending.is_none()
    }

    /// Fixes the ending sequence number. Closing an already closed range keeps
    /// the original ending.
    pub fn close(self, ending: SequenceNumber) -> Result<Self, ValidationError> {
        match self.ending {
            Some(_) => Ok(self),
            None => Self::new(self.starting, Some(ending)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    pub shard_id: ShardId,
    pub parent_shard_id: Option<ShardId>,
    pub adjacent_parent_shard_id: Option<ShardId>,
    pub hash_key_range: HashKeyRange,
    pub sequence_number_range: SequenceNumberRange,
}

impl Shard {
    pub fn is_open(&self) -> bool {
        self.sequence_number_range.is_open()
    }

    /// Checks that the open shards among `shards` tile the hash key space.
    pub fn check_open_coverage<'a>(
        shards: impl IntoIterator<Item = &'a Shard>,
    ) -> Result<(), ValidationError> {
        HashKeyRange::check_coverage(
            shards
                .into_iter()
                .filter(|s| s.is_open())
                .map(|s| &s.hash_key_range),
        )
    }
}
