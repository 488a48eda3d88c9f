use std::collections::BTreeMap;

use shardline_common::types::tag::TagKey;
use shardline_lite::backend::error::{AddTagsError, ListTagsError, RemoveTagsError};

use crate::common::*;

#[test]
fn test_add_overwrite_and_remove_tags() {
    let backend = create_backend();
    let stream = test_stream_name("tags");
    backend.create_stream(stream.clone(), 1).unwrap();

    backend
        .add_tags_to_stream(
            stream.clone(),
            BTreeMap::from([tag("env", "dev"), tag("team", "core")]),
        )
        .unwrap();
    backend
        .add_tags_to_stream(stream.clone(), BTreeMap::from([tag("env", "prod")]))
        .unwrap();

    let page = backend
        .list_tags_for_stream(stream.clone(), None, None)
        .unwrap();
    let tags: Vec<_> = page
        .values
        .iter()
        .map(|t| (t.key.to_string(), t.value.to_string()))
        .collect();
    assert_eq!(
        tags,
        [
            ("env".to_owned(), "prod".to_owned()),
            ("team".to_owned(), "core".to_owned())
        ]
    );

    backend
        .remove_tags_from_stream(
            stream.clone(),
            vec!["env".parse().unwrap(), "absent".parse().unwrap()],
        )
        .unwrap();
    let page = backend.list_tags_for_stream(stream, None, None).unwrap();
    assert_eq!(page.values.len(), 1);
    assert_eq!(page.values[0].key.as_ref(), "team");
}

#[test]
fn test_tag_limit_per_stream() {
    let backend = create_backend();
    let stream = test_stream_name("tag-limit");
    backend.create_stream(stream.clone(), 1).unwrap();

    for batch in 0..5 {
        let tags = (0..10)
            .map(|i| tag(&format!("k{batch}-{i}"), "v"))
            .collect::<BTreeMap<_, _>>();
        backend.add_tags_to_stream(stream.clone(), tags).unwrap();
    }

    // Overwriting an existing key does not count against the limit.
    backend
        .add_tags_to_stream(stream.clone(), BTreeMap::from([tag("k0-0", "w")]))
        .unwrap();

    let result = backend.add_tags_to_stream(stream, BTreeMap::from([tag("extra", "v")]));
    assert!(matches!(
        result,
        Err(AddTagsError::TagLimitExceeded(e)) if e.limit == 50 && e.requested == 51
    ));
}

#[test]
fn test_tag_request_size_bounds() {
    let backend = create_backend();
    let stream = test_stream_name("tag-bounds");
    backend.create_stream(stream.clone(), 1).unwrap();

    assert!(matches!(
        backend.add_tags_to_stream(stream.clone(), BTreeMap::new()),
        Err(AddTagsError::Validation(_))
    ));
    let eleven: Vec<TagKey> = (0..11).map(|i| format!("k{i}").parse().unwrap()).collect();
    assert!(matches!(
        backend.remove_tags_from_stream(stream.clone(), eleven),
        Err(RemoveTagsError::Validation(_))
    ));
    assert!(matches!(
        backend.list_tags_for_stream(stream, None, Some(51)),
        Err(ListTagsError::Validation(_))
    ));
}

#[test]
fn test_list_tags_pages_by_key() {
    let backend = create_backend();
    let stream = test_stream_name("tag-pages");
    backend.create_stream(stream.clone(), 1).unwrap();
    backend
        .add_tags_to_stream(
            stream.clone(),
            BTreeMap::from([tag("a", ""), tag("b", ""), tag("c", "")]),
        )
        .unwrap();

    let first = backend
        .list_tags_for_stream(stream.clone(), None, Some(2))
        .unwrap();
    assert!(first.has_more);
    let rest = backend
        .list_tags_for_stream(stream, Some("b".parse().unwrap()), Some(2))
        .unwrap();
    assert!(!rest.has_more);
    assert_eq!(rest.values.len(), 1);
    assert_eq!(rest.values[0].key.as_ref(), "c");
}

#[test]
fn test_tags_on_missing_stream() {
    let backend = create_backend();
    let stream = test_stream_name("nope");
    assert!(matches!(
        backend.add_tags_to_stream(stream.clone(), BTreeMap::from([tag("a", "b")])),
        Err(AddTagsError::StreamNotFound(_))
    ));
    assert!(matches!(
        backend.list_tags_for_stream(stream, None, None),
        Err(ListTagsError::StreamNotFound(_))
    ));
}
