//! Sorted-set values: ZRANGE WITHSCORES / ZADD / ZREM

use async_trait::async_trait;
use redis::AsyncCommands;

use redman_core::{KeyType, RemoveOp, Result, ScoredMember, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};
use crate::data_type::{DataType, op_mismatch};

#[derive(Debug)]
pub struct SortedSets;

#[async_trait]
impl DataType for SortedSets {
    fn kind(&self) -> KeyType {
        KeyType::Zset
    }

    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue> {
        let raw = session.raw_key(key);
        let pairs: Vec<(String, f64)> = session
            .conn_mut()
            .zrange_withscores(raw, 0, -1)
            .await
            .map_err(backend_err)?;
        Ok(TypedValue::Zset(
            pairs
                .into_iter()
                .map(|(member, score)| ScoredMember { member, score })
                .collect(),
        ))
    }

    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()> {
        match op {
            // re-adding an existing member just rescores it
            UpdateOp::ZsetAdd { member, score } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .zadd(raw, member, *score)
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
            StoreOp::Zset { member, score } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .zadd(raw, member, *score)
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
            RemoveOp::ZsetMember { member } => {
                let raw = session.raw_key(key);
                let removed: u64 = session
                    .conn_mut()
                    .zrem(raw, member)
                    .await
                    .map_err(backend_err)?;
                Ok(removed)
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }
}
