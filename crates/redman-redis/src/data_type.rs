//! Per-structure data handlers
//!
//! Each of the five editable Redis structures gets a handler implementing
//! the same four operations; ttl get/set is shared trait behavior rather
//! than something every handler re-implements. Handlers receive logical
//! (unprefixed) keys and apply the session's namespace prefix at the
//! command boundary.

mod hashes;
mod lists;
mod sets;
mod sorted_sets;
mod strings;

pub use hashes::Hashes;
#[cfg(test)]
pub(crate) use lists::INDEX_DELETE_SCRIPT;
pub use lists::Lists;
pub use sets::Sets;
pub use sorted_sets::SortedSets;
pub use strings::Strings;

use async_trait::async_trait;

use redman_core::{Error, KeyType, RemoveOp, Result, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};

/// The uniform contract of one Redis structure kind
#[async_trait]
pub trait DataType: Send + Sync + std::fmt::Debug {
    /// The structure this handler edits
    fn kind(&self) -> KeyType;

    /// Read the full typed payload of a key
    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue>;

    /// Apply an edit to an existing key
    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()>;

    /// Create a key (or its first entry), optionally with an expiry
    async fn store(
        &self,
        session: &mut RedisSession,
        key: &str,
        op: &StoreOp,
        ttl: Option<i64>,
    ) -> Result<()>;

    /// Remove one element within a key; returns the number removed
    async fn remove(&self, session: &mut RedisSession, key: &str, op: &RemoveOp) -> Result<u64>;

    /// Current ttl of the key in seconds (-1 no expiry, -2 absent)
    async fn ttl(&self, session: &mut RedisSession, key: &str) -> Result<i64> {
        use redis::AsyncCommands;
        let raw = session.raw_key(key);
        session.conn_mut().ttl(raw).await.map_err(backend_err)
    }

    /// Apply an expiry. Only positive values set one; zero or negative
    /// leaves any existing expiry untouched.
    async fn set_ttl(&self, session: &mut RedisSession, key: &str, ttl: i64) -> Result<()> {
        if ttl > 0 {
            use redis::AsyncCommands;
            let raw = session.raw_key(key);
            let _: () = session
                .conn_mut()
                .expire(raw, ttl)
                .await
                .map_err(backend_err)?;
        }
        Ok(())
    }
}

/// Look up the handler for a key type.
///
/// Streams and absent keys have no editor; asking for one is an
/// unsupported-type error rather than a silent default.
pub fn handler_for(kind: KeyType) -> Result<&'static dyn DataType> {
    match kind {
        KeyType::String => Ok(&Strings),
        KeyType::Hash => Ok(&Hashes),
        KeyType::List => Ok(&Lists),
        KeyType::Set => Ok(&Sets),
        KeyType::Zset => Ok(&SortedSets),
        other => Err(Error::UnsupportedType(other.as_str().to_string())),
    }
}

/// An operation parsed for one structure kind reached a handler for
/// another; only possible when callers bypass the request parser.
pub(crate) fn op_mismatch(kind: KeyType, op: &dyn std::fmt::Debug) -> Error {
    Error::InvalidRequest(format!("operation {op:?} does not apply to a {kind} key"))
}
