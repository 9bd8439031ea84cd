//! String values: GET / SET

use async_trait::async_trait;
use redis::AsyncCommands;

use redman_core::{Error, KeyType, RemoveOp, Result, StoreOp, TypedValue, UpdateOp};

use crate::client::{RedisSession, backend_err};
use crate::data_type::{DataType, op_mismatch};

#[derive(Debug)]
pub struct Strings;

#[async_trait]
impl DataType for Strings {
    fn kind(&self) -> KeyType {
        KeyType::String
    }

    async fn fetch(&self, session: &mut RedisSession, key: &str) -> Result<TypedValue> {
        let raw = session.raw_key(key);
        let value: Option<String> = session.conn_mut().get(raw).await.map_err(backend_err)?;
        Ok(TypedValue::String(value.unwrap_or_default()))
    }

    async fn update(&self, session: &mut RedisSession, key: &str, op: &UpdateOp) -> Result<()> {
        match op {
            UpdateOp::StringSet { value } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .set(raw, value)
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
            StoreOp::String { value } => {
                let raw = session.raw_key(key);
                let _: () = session
                    .conn_mut()
                    .set(raw, value)
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

    async fn remove(&self, _session: &mut RedisSession, _key: &str, _op: &RemoveOp) -> Result<u64> {
        Err(Error::NotSupported(
            "strings have no removable elements; delete the key instead".to_string(),
        ))
    }
}
