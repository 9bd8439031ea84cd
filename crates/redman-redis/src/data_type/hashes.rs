//! Hash values: HGETALL / HSET / HDEL

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;

use redman_core::{KeyType, RemoveOp, Result, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};
use crate::data_type::{DataType, op_mismatch};

#[derive(Debug)]
pub struct Hashes;

#[async_trait]
impl DataType for Hashes {
    fn kind(&self) -> KeyType {
        KeyType::Hash
    }

    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue> {
        let raw = session.raw_key(key);
        let fields: HashMap<String, String> =
            session.conn_mut().hgetall(raw).await.map_err(backend_err)?;
        Ok(TypedValue::Hash(fields))
    }

    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()> {
        match op {
            // an inline cell edit parses to the same field write
            UpdateOp::HashSet { field, value } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .hset(raw, field, value)
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
            StoreOp::Hash { field, value } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .hset(raw, field, value)
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
            RemoveOp::HashField { field } => {
                let raw = session.raw_key(key);
                let removed: u64 = session
                    .conn_mut()
                    .hdel(raw, field)
                    .await
                    .map_err(backend_err)?;
                Ok(removed)
            }
            other => Err(op_mismatch(self.kind(), other)),
        }
    }
}
