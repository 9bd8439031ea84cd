//! List values: LRANGE / LPUSH / RPUSH / LSET / positional delete

use async_trait::async_trait;
use redis::AsyncCommands;

use redman_core::{KeyType, PushSide, RemoveOp, Result, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};
use crate::data_type::{DataType, op_mismatch};

/// Delete-by-index: lists only remove by value, so the element is first
/// overwritten with a sentinel and the sentinel removed. An element that
/// already equals the sentinel elsewhere in the list could be removed
/// instead; admin data rarely contains it, and the swap stays server-side
/// and atomic.
pub(crate) const INDEX_DELETE_SCRIPT: &str = r#"
redis.call('lset', KEYS[1], ARGV[1], '__DELETED__')

return redis.call('lrem', KEYS[1], 1, '__DELETED__')
"#;

#[derive(Debug)]
pub struct Lists;

#[async_trait]
impl DataType for Lists {
    fn kind(&self) -> KeyType {
        KeyType::List
    }

    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue> {
        let raw = session.raw_key(key);
        let items: Vec<String> = session
            .conn_mut()
            .lrange(raw, 0, -1)
            .await
            .map_err(backend_err)?;
        Ok(TypedValue::List(items))
    }

    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()> {
        let raw = session.raw_key(key);
        match op {
            UpdateOp::ListPush { side, item } => {
                let _: () = match side {
                    PushSide::Left => session.conn_mut().lpush(raw, item).await,
                    PushSide::Right => session.conn_mut().rpush(raw, item).await,
                }
                .map_err(backend_err)?;
                Ok(())
            }
            UpdateOp::ListSet { index, value } => {
                let _: () = session
                    .conn_mut()
                    .lset(raw, *index as isize, value)
                    .await
                    .map_err(backend_err)?;
                Ok(())
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }

    async fn store(
        &self,
        session: &mut RedisSession,
        key: &str,
        op: &StoreOp,
        ttl: Option<i64>,
    ) -> Result<()> {
        match op {
            StoreOp::List { item } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .rpush(raw, item)
                    .await
                    .map_err(backend_err)?;
                if let Some(ttl) = ttl {
                    self.set_ttl(session, key, ttl).await?;
                }
                Ok(())
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }

    async fn remove(&self, session: &mut RedisSession, key: &str, op: &RemoveOp) -> Result<u64> {
        match op {
            RemoveOp::ListIndex { index } => {
                let raw = session.raw_key(key);
                let removed: u64 = redis::cmd("EVAL")
                    .arg(INDEX_DELETE_SCRIPT)
                    .arg(1)
                    .arg(&raw)
                    .arg(*index)
                    .query_async(session.conn_mut())
                    .await
                    .map_err(backend_err)?;
                Ok(removed)
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }
}
