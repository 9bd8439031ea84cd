//! Tests for scan reply decoding

use redman_core::{Error, KeyType};

use crate::keys::{TYPE_TTL_SCRIPT, decode_scan_entry, push_capped};

fn entry(key: redis::Value, kind: redis::Value, ttl: redis::Value) -> redis::Value {
    redis::Value::Array(vec![key, kind, ttl])
}

#[test]
fn test_decode_plain_entry() {
    let descriptor = decode_scan_entry(entry(
        redis::Value::BulkString(b"laravel:user:1".to_vec()),
        redis::Value::SimpleString("hash".to_string()),
        redis::Value::Int(300),
    ))
    .unwrap();
    assert_eq!(descriptor.key, "laravel:user:1");
    assert_eq!(descriptor.key_type, KeyType::Hash);
    assert_eq!(descriptor.ttl, 300);
}

#[test]
fn test_decode_wrapped_type_reply() {
    // RESP3 connections may wrap the status payload
    let descriptor = decode_scan_entry(entry(
        redis::Value::BulkString(b"counter".to_vec()),
        redis::Value::VerbatimString {
            format: redis::VerbatimFormat::Text,
            text: "string".to_string(),
        },
        redis::Value::Int(-1),
    ))
    .unwrap();
    assert_eq!(descriptor.key_type, KeyType::String);
    assert_eq!(descriptor.ttl, -1);
    assert!(!descriptor.has_expiry());
}

#[test]
fn test_decode_ttl_passthrough() {
    for ttl in [-2_i64, -1, 0, 86400] {
        let descriptor = decode_scan_entry(entry(
            redis::Value::BulkString(b"k".to_vec()),
            redis::Value::SimpleString("list".to_string()),
            redis::Value::Int(ttl),
        ))
        .unwrap();
        assert_eq!(descriptor.ttl, ttl);
    }
}

#[test]
fn test_decode_unknown_type_is_an_error() {
    let err = decode_scan_entry(entry(
        redis::Value::BulkString(b"k".to_vec()),
        redis::Value::SimpleString("quadtree".to_string()),
        redis::Value::Int(-1),
    ))
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[test]
fn test_decode_malformed_shapes() {
    assert!(matches!(
        decode_scan_entry(redis::Value::Int(0)),
        Err(Error::Backend(_))
    ));
    assert!(matches!(
        decode_scan_entry(redis::Value::Array(vec![redis::Value::Int(1)])),
        Err(Error::Backend(_))
    ));
    assert!(matches!(
        decode_scan_entry(entry(
            redis::Value::BulkString(b"k".to_vec()),
            redis::Value::SimpleString("hash".to_string()),
            redis::Value::BulkString(b"soon".to_vec()),
        )),
        Err(Error::Backend(_))
    ));
}

#[test]
fn test_push_capped_stops_at_the_limit() {
    let mut keys = Vec::new();
    assert!(!push_capped(&mut keys, "a".to_string(), 3));
    assert!(!push_capped(&mut keys, "b".to_string(), 3));
    assert!(push_capped(&mut keys, "c".to_string(), 3));
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn test_push_capped_limit_one() {
    let mut keys = Vec::new();
    assert!(push_capped(&mut keys, "only".to_string(), 1));
    assert_eq!(keys.len(), 1);
}

#[test]
fn test_push_capped_batches_larger_than_remaining_capacity() {
    // a server page bigger than what the cap allows stops mid-batch,
    // the way both paging loops consume it
    let pages = vec![
        vec!["a", "b", "c", "d"],
        vec!["e", "f", "g", "h"],
        vec!["i"],
    ];
    let limit = 5;
    let mut keys = Vec::new();
    'paging: for page in pages {
        for key in page {
            if push_capped(&mut keys, key.to_string(), limit) {
                break 'paging;
            }
        }
    }
    assert_eq!(keys, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn test_type_ttl_script_reads_both() {
    assert!(TYPE_TTL_SCRIPT.contains("redis.call('type', KEYS[1])"));
    assert!(TYPE_TTL_SCRIPT.contains("redis.call('ttl', KEYS[1])"));
}
