//! Tests for the manager facade's pure paths
//!
//! Everything here runs without a server: configuration lookups, the
//! parse-before-resolve ordering, and INFO text parsing.

use redman_core::{ConnectionConfig, Error, ManagerConfig, UpdateRequest};

use crate::manager::{RedisManager, display_key, parse_info};
use crate::prefix::KeyPrefix;

fn manager() -> RedisManager {
    RedisManager::new(
        ManagerConfig::default()
            .with_connection("default", ConnectionConfig::default().with_prefix("app:")),
    )
}

#[test]
fn test_connections_sorted() {
    let manager = RedisManager::new(
        ManagerConfig::default()
            .with_connection("sessions", ConnectionConfig::default())
            .with_connection("cache", ConnectionConfig::default())
            .with_connection("default", ConnectionConfig::default()),
    );
    assert_eq!(manager.connections(), vec!["cache", "default", "sessions"]);
}

#[test]
fn test_from_toml_str() {
    let manager = RedisManager::from_toml_str(
        r#"
        [connections.default]
        prefix = "laravel:"
        "#,
    )
    .unwrap();
    assert_eq!(manager.connections(), vec!["default"]);
}

#[tokio::test]
async fn test_resolve_unknown_connection_fails_without_io() {
    let err = manager().resolve("missing").await.unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_scan_zero_limit_short_circuits() {
    // even an unknown connection never gets resolved for an empty page
    let keys = manager().scan("missing", "*", 0).await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn test_del_empty_short_circuits() {
    let deleted = manager().del("missing", &[]).await.unwrap();
    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn test_update_parses_before_resolving() {
    // the malformed request wins over the unknown connection name,
    // proving no resolution happens for a request that can't be applied
    let request = UpdateRequest::new("k", "hash");
    let err = manager().update("missing", &request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_store_rejects_unknown_type_before_resolving() {
    let request = UpdateRequest::new("k", "quadtree").with_value("v");
    let err = manager().store("missing", &request).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedType(_)));
}

#[tokio::test]
async fn test_remove_on_string_not_supported() {
    let request = UpdateRequest::new("k", "string");
    let err = manager().remove("missing", &request).await.unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
}

#[tokio::test]
async fn test_execute_empty_line() {
    let err = manager().execute("missing", "   ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[test]
fn test_display_key_always_carries_the_prefix() {
    // both spellings of the same key display as the prefixed name,
    // which is also the name the server was queried under
    let prefix = KeyPrefix::new("app:");
    assert_eq!(display_key(&prefix, "users"), "app:users");
    assert_eq!(display_key(&prefix, "app:users"), "app:users");
}

#[test]
fn test_display_key_empty_prefix() {
    let prefix = KeyPrefix::default();
    assert_eq!(display_key(&prefix, "users"), "users");
}

#[test]
fn test_parse_info_sections() {
    let sections = parse_info(
        "# Server\r\nredis_version:7.2.4\r\nuptime_in_seconds:86400\r\n\r\n# Memory\r\nused_memory:1048576\r\n",
    );
    assert_eq!(sections["Server"]["redis_version"], "7.2.4");
    assert_eq!(sections["Server"]["uptime_in_seconds"], "86400");
    assert_eq!(sections["Memory"]["used_memory"], "1048576");
}

#[test]
fn test_parse_info_headerless_lines() {
    let sections = parse_info("loading:0\n# Clients\nconnected_clients:2\n");
    assert_eq!(sections[""]["loading"], "0");
    assert_eq!(sections["Clients"]["connected_clients"], "2");
}

#[test]
fn test_parse_info_ignores_noise() {
    let sections = parse_info("\n\n# Empty\n\nnot a property line\n");
    assert!(!sections.contains_key("Empty"));
}
