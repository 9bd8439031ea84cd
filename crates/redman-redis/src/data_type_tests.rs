//! Tests for handler dispatch

use redman_core::{Error, KeyType, UpdateOp};

use crate::data_type::{INDEX_DELETE_SCRIPT, handler_for, op_mismatch};

#[test]
fn test_handler_for_editable_kinds() {
    for kind in [
        KeyType::String,
        KeyType::Hash,
        KeyType::List,
        KeyType::Set,
        KeyType::Zset,
    ] {
        let handler = handler_for(kind).unwrap();
        assert_eq!(handler.kind(), kind);
    }
}

#[test]
fn test_handler_for_stream_unsupported() {
    let err = handler_for(KeyType::Stream).unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
    assert!(err.to_string().contains("stream"));
}

#[test]
fn test_handler_for_none_unsupported() {
    assert!(matches!(
        handler_for(KeyType::None),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_op_mismatch_names_both_sides() {
    let op = UpdateOp::StringSet {
        value: "v".to_string(),
    };
    let err = op_mismatch(KeyType::Hash, &op);
    assert!(matches!(err, Error::InvalidRequest(_)));
    let message = err.to_string();
    assert!(message.contains("StringSet"));
    assert!(message.contains("hash"));
}

#[test]
fn test_index_delete_script_uses_a_sentinel() {
    assert!(INDEX_DELETE_SCRIPT.contains("redis.call('lset', KEYS[1], ARGV[1]"));
    assert!(INDEX_DELETE_SCRIPT.contains("redis.call('lrem', KEYS[1], 1"));
    assert!(INDEX_DELETE_SCRIPT.contains("__DELETED__"));
}
