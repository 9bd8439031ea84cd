//! Set values: SMEMBERS / SADD / SREM / atomic member swap

use async_trait::async_trait;
use redis::AsyncCommands;

use redman_core::{KeyType, RemoveOp, Result, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};
use crate::data_type::{DataType, op_mismatch};

#[derive(Debug)]
pub struct Sets;

#[async_trait]
impl DataType for Sets {
    fn kind(&self) -> KeyType {
        KeyType::Set
    }

    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue> {
        let raw = session.raw_key(key);
        let members: Vec<String> = session
            .conn_mut()
            .smembers(raw)
            .await
            .map_err(backend_err)?;
        Ok(TypedValue::Set(members))
    }

    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()> {
        let raw = session.raw_key(key);
        match op {
            UpdateOp::SetAdd { member } => {
                let _: () = session
                    .conn_mut()
                    .sadd(raw, member)
                    .await
                    .map_err(backend_err)?;
                Ok(())
            }
            // editing a member is a remove + add; both land in one
            // transaction so no reader observes the halfway state
            UpdateOp::SetSwap { old, new } => {
                let mut pipe = redis::pipe();
                pipe.atomic().srem(&raw, old).sadd(&raw, new);
                let _: (i64, i64) = pipe
                    .query_async(session.conn_mut())
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
            StoreOp::Set { members } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .sadd(raw, members)
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
            RemoveOp::SetMember { member } => {
                let raw = session.raw_key(key);
                let removed: u64 = session
                    .conn_mut()
                    .srem(raw, member)
                    .await
                    .map_err(backend_err)?;
                Ok(removed)
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }
}
