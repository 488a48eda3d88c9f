use std::collections::BTreeMap;

use shardline_common::{
    caps,
    types::{
        check_range,
        resources::{ListLimit, Page},
        stream::StreamName,
        tag::{ExclusiveStartTagKey, Tag, TagKey, TagValue},
    },
};
use tracing::instrument;

use super::{
    Backend,
    error::{AddTagsError, ListTagsError, RemoveTagsError, TagLimitExceededError},
};

impl Backend {
    /// Adds tags or overwrites the values of existing keys.
    #[instrument(ret, err, skip(self))]
    pub fn add_tags_to_stream(
        &self,
        stream: StreamName,
        tags: BTreeMap<TagKey, TagValue>,
    ) -> Result<(), AddTagsError> {
        check_range("Tags", tags.len() as u64, tags_per_request())?;

        let mut state = self.state.write();
        let meta = state.stream_mut(&stream)?;
        let added = tags.keys().filter(|key| !meta.tags.contains_key(*key)).count();
        let requested = meta.tags.len() + added;
        if requested > caps::MAX_TAGS_PER_STREAM {
            return Err(TagLimitExceededError {
                stream,
                limit: caps::MAX_TAGS_PER_STREAM,
                requested,
            }
            .into());
        }
        meta.tags.extend(tags);
        Ok(())
    }

    /// Removes tags by key. Keys that are not present are ignored.
    #[instrument(ret, err, skip(self))]
    pub fn remove_tags_from_stream(
        &self,
        stream: StreamName,
        tag_keys: Vec<TagKey>,
    ) -> Result<(), RemoveTagsError> {
        check_range("TagKeys", tag_keys.len() as u64, tags_per_request())?;

        let mut state = self.state.write();
        let meta = state.stream_mut(&stream)?;
        for key in &tag_keys {
            meta.tags.remove(key);
        }
        Ok(())
    }

    /// Tags in ascending key order, starting after the cursor.
    #[instrument(err, skip(self))]
    pub fn list_tags_for_stream(
        &self,
        stream: StreamName,
        exclusive_start_tag_key: Option<ExclusiveStartTagKey>,
        limit: Option<usize>,
    ) -> Result<Page<Tag>, ListTagsError> {
        let limit = match limit {
            Some(limit) => {
                check_range("Limit", limit as u64, 1..=caps::MAX_LIST_TAGS_LIMIT as u64)?;
                ListLimit::capped(limit, caps::MAX_LIST_TAGS_LIMIT)
            }
            None => ListLimit::capped(0, caps::MAX_LIST_TAGS_LIMIT),
        };

        let state = self.state.read();
        let meta = state.stream(&stream)?;
        let mut tags = meta
            .tags
            .iter()
            .filter(|(key, _)| {
                exclusive_start_tag_key
                    .as_ref()
                    .is_none_or(|after| key.as_ref() > after.as_ref())
            })
            .map(|(key, value)| Tag::new(key.clone(), value.clone()));

        let values: Vec<_> = tags.by_ref().take(limit.as_usize()).collect();
        let has_more = tags.next().is_some();
        Ok(Page::new(values, has_more))
    }
}

fn tags_per_request() -> std::ops::RangeInclusive<u64> {
    let range = caps::TAGS_PER_REQUEST;
    *range.start() as u64..=*range.end() as u64
}
