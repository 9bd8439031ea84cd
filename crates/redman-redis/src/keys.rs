//! Keyspace scanning
//!
//! Pages through the keyspace with SCAN (never KEYS), annotating each
//! collected key with its type and ttl in a single pipelined round-trip.
//! Type and ttl are read together by one embedded script invocation per
//! key, so the pair stays consistent even while other clients mutate the
//! key.

use redis::aio::MultiplexedConnection;

use redman_core::{Error, KeyDescriptor, KeyType, Protocol, Result};

use crate::client::{RedisSession, backend_err};
use crate::reply::text_payload;

/// COUNT hint passed to SCAN on each page
const SCAN_PAGE: usize = 100;

/// Atomic per-key type + ttl lookup, run once per scanned key
pub(crate) const TYPE_TTL_SCRIPT: &str = r#"
local type = redis.call('type', KEYS[1])
local ttl = redis.call('ttl', KEYS[1])

return {KEYS[1], type, ttl}
"#;

/// Scan raw keys matching a glob pattern, annotated with type and ttl.
///
/// The pattern is namespaced with the session's key prefix before it
/// reaches the server, and at most `limit` descriptors come back. The
/// returned descriptors keep the raw (prefixed) key for display.
#[tracing::instrument(skip(session), fields(connection = session.name()))]
pub async fn scan_keys(
    session: &mut RedisSession,
    pattern: &str,
    limit: usize,
) -> Result<Vec<KeyDescriptor>> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let raw_pattern = session.prefix().apply(pattern);
    let raw_keys = match session.profile() {
        // RESP3 connections walk raw scan cursors directly
        Protocol::Resp3 => collect_with_cursor(session.conn_mut(), &raw_pattern, limit).await?,
        // RESP2 connections page through the client's glob iterator
        Protocol::Resp2 => collect_with_iterator(session.conn_mut(), &raw_pattern, limit).await?,
    };

    tracing::debug!(
        pattern = %raw_pattern,
        matched = raw_keys.len(),
        "keyspace scan collected"
    );

    if raw_keys.is_empty() {
        return Ok(Vec::new());
    }

    // One pipelined round-trip annotates every collected key. The server
    // only knows raw keys, so the script runs on them as-is. A failing
    // script anywhere in the batch fails the whole scan.
    let mut pipe = redis::pipe();
    for raw in &raw_keys {
        pipe.cmd("EVAL").arg(TYPE_TTL_SCRIPT).arg(1).arg(raw);
    }
    let replies: Vec<redis::Value> = pipe
        .query_async(session.conn_mut())
        .await
        .map_err(backend_err)?;

    replies.into_iter().map(decode_scan_entry).collect()
}

/// Cursor walk: SCAN cursor MATCH pattern COUNT n until done or capped
async fn collect_with_cursor(
    conn: &mut MultiplexedConnection,
    pattern: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: u64 = 0;

    loop {
        let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_PAGE)
            .query_async(conn)
            .await
            .map_err(backend_err)?;

        for key in batch {
            if push_capped(&mut keys, key, limit) {
                return Ok(keys);
            }
        }

        cursor = next;
        if cursor == 0 {
            break;
        }
    }

    Ok(keys)
}

/// Iterator paging via the client library's glob helper, capped at limit
async fn collect_with_iterator(
    conn: &mut MultiplexedConnection,
    pattern: &str,
    limit: usize,
) -> Result<Vec<String>> {
    use redis::AsyncCommands;

    let mut keys = Vec::new();
    let mut iter: redis::AsyncIter<'_, String> =
        conn.scan_match(pattern).await.map_err(backend_err)?;
    while let Some(key) = iter.next_item().await {
        if push_capped(&mut keys, key, limit) {
            break;
        }
    }

    Ok(keys)
}

/// Append one collected key, reporting whether the cap is now reached.
/// Both paging paths stop as soon as this returns true, so a scan never
/// yields more than `limit` keys regardless of batch sizes.
pub(crate) fn push_capped(keys: &mut Vec<String>, key: String, limit: usize) -> bool {
    keys.push(key);
    keys.len() >= limit
}

/// Decode one `{key, type, ttl}` script reply into a descriptor
pub(crate) fn decode_scan_entry(value: redis::Value) -> Result<KeyDescriptor> {
    let items = match value {
        redis::Value::Array(items) => items,
        other => {
            return Err(Error::Backend(format!(
                "unexpected type/ttl reply shape: {other:?}"
            )));
        }
    };
    let [key, kind, ttl] = <[redis::Value; 3]>::try_from(items)
        .map_err(|items| Error::Backend(format!("type/ttl reply of length {}", items.len())))?;

    let key = text_payload(&key)
        .ok_or_else(|| Error::Backend(format!("non-textual key in scan reply: {key:?}")))?;
    let kind_text = text_payload(&kind)
        .ok_or_else(|| Error::Backend(format!("non-textual type in scan reply: {kind:?}")))?;
    let ttl = match ttl {
        redis::Value::Int(n) => n,
        other => {
            return Err(Error::Backend(format!(
                "non-integer ttl in scan reply: {other:?}"
            )));
        }
    };

    Ok(KeyDescriptor::new(key, KeyType::from_native(&kind_text)?, ttl))
}
