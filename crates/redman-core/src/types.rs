//! Key and value records handed to the rendering layer

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Canonical Redis key types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// String value
    String,
    /// List (linked list)
    List,
    /// Set (unordered unique strings)
    Set,
    /// Sorted set (ordered by score)
    Zset,
    /// Hash (field-value pairs)
    Hash,
    /// Stream (append-only log)
    Stream,
    /// Key doesn't exist
    None,
}

impl KeyType {
    /// Parse a native TYPE reply. Unknown type codes are an error rather
    /// than a silent default.
    pub fn from_native(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "string" => Ok(KeyType::String),
            "list" => Ok(KeyType::List),
            "set" => Ok(KeyType::Set),
            "zset" => Ok(KeyType::Zset),
            "hash" => Ok(KeyType::Hash),
            "stream" => Ok(KeyType::Stream),
            "none" => Ok(KeyType::None),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }

    /// Get the native type string
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::Zset => "zset",
            KeyType::Hash => "hash",
            KeyType::Stream => "stream",
            KeyType::None => "none",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scanned key: display (prefixed) name, type and ttl
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Key name as displayed, with the namespace prefix applied
    pub key: String,
    /// Canonical key type
    pub key_type: KeyType,
    /// Time-to-live in seconds (-1 = no expiry, -2 = key doesn't exist)
    pub ttl: i64,
}

impl KeyDescriptor {
    /// Create a new descriptor
    pub fn new(key: impl Into<String>, key_type: KeyType, ttl: i64) -> Self {
        Self {
            key: key.into(),
            key_type,
            ttl,
        }
    }

    /// Check if the key has an expiry set
    pub fn has_expiry(&self) -> bool {
        self.ttl >= 0
    }

    /// Check if the key exists
    pub fn exists(&self) -> bool {
        self.ttl != -2 && self.key_type != KeyType::None
    }
}

/// One member of a sorted set with its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

/// The fetched payload of a key; shape depends on the key type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypedValue {
    /// Raw string value
    String(String),
    /// Field -> value pairs, order irrelevant
    Hash(HashMap<String, String>),
    /// Ordered, index-addressable sequence
    List(Vec<String>),
    /// Unordered members
    Set(Vec<String>),
    /// Members ordered by score ascending; equal scores keep the
    /// server's lexicographic member order
    Zset(Vec<ScoredMember>),
}

/// Result of fetching one key: its descriptor plus the typed payload.
///
/// Fetching an absent key is not an error: the descriptor comes back
/// with `KeyType::None`, ttl -2 and no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedKey {
    /// Key name as displayed, with the namespace prefix applied
    pub key: String,
    pub key_type: KeyType,
    pub ttl: i64,
    pub value: Option<TypedValue>,
}

impl FetchedKey {
    /// The explicit "not found" result for an absent key
    pub fn missing(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_type: KeyType::None,
            ttl: -2,
            value: None,
        }
    }

    /// Check if the key existed at fetch time
    pub fn exists(&self) -> bool {
        self.key_type != KeyType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_type_from_native() {
        assert_eq!(KeyType::from_native("string").unwrap(), KeyType::String);
        assert_eq!(KeyType::from_native("STRING").unwrap(), KeyType::String);
        assert_eq!(KeyType::from_native("list").unwrap(), KeyType::List);
        assert_eq!(KeyType::from_native("set").unwrap(), KeyType::Set);
        assert_eq!(KeyType::from_native("zset").unwrap(), KeyType::Zset);
        assert_eq!(KeyType::from_native("hash").unwrap(), KeyType::Hash);
        assert_eq!(KeyType::from_native("stream").unwrap(), KeyType::Stream);
        assert_eq!(KeyType::from_native("none").unwrap(), KeyType::None);
    }

    #[test]
    fn test_key_type_from_native_unknown() {
        let err = KeyType::from_native("quadtree").unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        assert!(err.to_string().contains("quadtree"));
    }

    #[test]
    fn test_key_type_as_str_round_trip() {
        for kind in [
            KeyType::String,
            KeyType::List,
            KeyType::Set,
            KeyType::Zset,
            KeyType::Hash,
            KeyType::Stream,
            KeyType::None,
        ] {
            assert_eq!(KeyType::from_native(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_key_type_display() {
        assert_eq!(format!("{}", KeyType::String), "string");
        assert_eq!(format!("{}", KeyType::Zset), "zset");
        assert_eq!(format!("{}", KeyType::None), "none");
    }

    #[test]
    fn test_key_type_serialization() {
        let json = serde_json::to_string(&KeyType::Zset).unwrap();
        assert_eq!(json, "\"zset\"");
        let back: KeyType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, KeyType::Zset);
    }

    #[test]
    fn test_key_descriptor_has_expiry() {
        assert!(KeyDescriptor::new("k", KeyType::String, 3600).has_expiry());
        assert!(!KeyDescriptor::new("k", KeyType::String, -1).has_expiry());
        assert!(!KeyDescriptor::new("k", KeyType::None, -2).has_expiry());
    }

    #[test]
    fn test_key_descriptor_exists() {
        assert!(KeyDescriptor::new("k", KeyType::String, -1).exists());
        assert!(!KeyDescriptor::new("k", KeyType::String, -2).exists());
        assert!(!KeyDescriptor::new("k", KeyType::None, -1).exists());
    }

    #[test]
    fn test_key_descriptor_serialization() {
        let descriptor = KeyDescriptor::new("app:user:1", KeyType::Hash, 300);
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains("\"key\":\"app:user:1\""));
        assert!(json.contains("\"key_type\":\"hash\""));
        assert!(json.contains("\"ttl\":300"));
        let back: KeyDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }

    #[test]
    fn test_fetched_key_missing() {
        let fetched = FetchedKey::missing("app:gone");
        assert_eq!(fetched.key, "app:gone");
        assert_eq!(fetched.key_type, KeyType::None);
        assert_eq!(fetched.ttl, -2);
        assert!(fetched.value.is_none());
        assert!(!fetched.exists());
    }

    #[test]
    fn test_typed_value_serialization() {
        let value = TypedValue::Zset(vec![
            ScoredMember::new("low", 1.0),
            ScoredMember::new("high", 9.5),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["zset"][0]["member"], "low");
        assert_eq!(json["zset"][1]["score"], 9.5);
    }
}
