use serde::{Deserialize, Serialize};
use shardline_common::types::{
    self, ValidationError,
    shard::{HashKey, SequenceNumber, ShardId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HashKeyRange {
    /// Lowest hash key owned by the shard, as a decimal string.
    pub starting_hash_key: HashKey,
    /// Highest hash key owned by the shard, as a decimal string.
    pub ending_hash_key: HashKey,
}

impl TryFrom<HashKeyRange> for types::shard::HashKeyRange {
    type Error = ValidationError;

    fn try_from(value: HashKeyRange) -> Result<Self, Self::Error> {
        Self::new(value.starting_hash_key, value.ending_hash_key)
    }
}

impl From<types::shard::HashKeyRange> for HashKeyRange {
    fn from(value: types::shard::HashKeyRange) -> Self {
        Self {
            starting_hash_key: value.starting(),
            ending_hash_key: value.ending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SequenceNumberRange {
    pub starting_sequence_number: SequenceNumber,
    /// Absent while the shard is open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ending_sequence_number: Option<SequenceNumber>,
}

impl TryFrom<SequenceNumberRange> for types::shard::SequenceNumberRange {
    type Error = ValidationError;

    fn try_from(value: SequenceNumberRange) -> Result<Self, Self::Error> {
        Self::new(value.starting_sequence_number, value.ending_sequence_number)
    }
}

impl From<types::shard::SequenceNumberRange> for SequenceNumberRange {
    fn from(value: types::shard::SequenceNumberRange) -> Self {
        Self {
            starting_sequence_number: value.starting().clone(),
            ending_sequence_number: value.ending().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Shard {
    pub shard_id: ShardId,
    /// Shard this one was split from, or the first of two merged shards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_shard_id: Option<ShardId>,
    /// Second parent when this shard is the result of a merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacent_parent_shard_id: Option<ShardId>,
    pub hash_key_range: HashKeyRange,
    pub sequence_number_range: SequenceNumberRange,
}

impl TryFrom<Shard> for types::shard::Shard {
    type Error = ValidationError;

    fn try_from(value: Shard) -> Result<Self, Self::Error> {
        let Shard {
            shard_id,
            parent_shard_id,
            adjacent_parent_shard_id,
            hash_key_range,
            sequence_number_range,
        } = value;

        Ok(Self {
            shard_id,
            parent_shard_id,
            adjacent_parent_shard_id,
            hash_key_range: hash_key_range.try_into()?,
            sequence_number_range: sequence_number_range.try_into()?,
        })
    }
}

impl From<types::shard::Shard> for Shard {
    fn from(value: types::shard::Shard) -> Self {
        let types::shard::Shard {
            shard_id,
            parent_shard_id,
            adjacent_parent_shard_id,
            hash_key_range,
            sequence_number_range,
        } = value;

        Self {
            shard_id,
            parent_shard_id,
            adjacent_parent_shard_id,
            hash_key_range: hash_key_range.into(),
            sequence_number_range: sequence_number_range.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_shard_wire_shape() {
        let json = r#"{
            "ShardId": "shardId-000000000001",
            "ParentShardId": "shardId-000000000000",
            "HashKeyRange": {
                "StartingHashKey": "0",
                "EndingHashKey": "340282366920938463463374607431768211455"
            },
            "SequenceNumberRange": { "StartingSequenceNumber": "42" }
        }"#;
        let wire: Shard = serde_json::from_str(json).unwrap();
        let shard = types::shard::Shard::try_from(wire.clone()).unwrap();
        assert!(shard.is_open());
        assert_eq!(shard.hash_key_range, types::shard::HashKeyRange::FULL);
        assert_eq!(Shard::from(shard), wire);
    }

    #[test]
    fn reversed_hash_range_is_rejected_after_parsing() {
        let json = r#"{
            "ShardId": "s",
            "HashKeyRange": { "StartingHashKey": "9", "EndingHashKey": "1" },
            "SequenceNumberRange": { "StartingSequenceNumber": "0" }
        }"#;
        let wire: Shard = serde_json::from_str(json).unwrap();
        let err = types::shard::Shard::try_from(wire).unwrap_err();
        assert_eq!(err.field, "HashKeyRange");
    }
}
