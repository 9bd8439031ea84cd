//! Connection resolution
//!
//! Turns a named `ConnectionConfig` into a live, verified session. The
//! reply profile (RESP2 or RESP3) is negotiated once here and stored in
//! the session; every later code path branches on the stored tag instead
//! of re-probing the server.

use redis::aio::MultiplexedConnection;
use redis::{ConnectionAddr, ConnectionInfo, ProtocolVersion, RedisConnectionInfo};

use redman_core::{ConnectionConfig, Error, Protocol, Result};

use crate::prefix::KeyPrefix;

/// Map a redis client/server error into the core taxonomy, keeping the
/// server's message intact.
pub(crate) fn backend_err(e: redis::RedisError) -> Error {
    Error::Backend(e.to_string())
}

/// Build the client connection parameters for a configuration
pub fn connection_info(config: &ConnectionConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            username: config.username.clone(),
            password: config.password.clone(),
            protocol: match config.protocol {
                Protocol::Resp2 => ProtocolVersion::RESP2,
                Protocol::Resp3 => ProtocolVersion::RESP3,
            },
        },
    }
}

/// Open and verify a connection for a named configuration
#[tracing::instrument(skip(config), fields(host = %config.host, port = config.port))]
pub async fn connect(name: &str, config: &ConnectionConfig) -> Result<RedisSession> {
    tracing::debug!("connecting to Redis");

    let client = redis::Client::open(connection_info(config))
        .map_err(|e| Error::Backend(format!("failed to create Redis client: {e}")))?;

    let mut connection = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| Error::Backend(format!("failed to connect to Redis: {e}")))?;

    // Verify the connection actually works by sending PING. This catches
    // authentication errors that otherwise would not surface until the
    // first real command.
    let ping: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut connection).await;
    match ping {
        Ok(response) => {
            if response != "PONG" {
                tracing::warn!("unexpected PING response: {}", response);
            }
            tracing::debug!("Redis connection verified with PING");
        }
        Err(e) => {
            let message = e.to_string();
            if message.contains("NOAUTH") || message.contains("Authentication") {
                return Err(Error::Backend(
                    "Redis authentication required; provide a password in the connection settings"
                        .to_string(),
                ));
            }
            return Err(Error::Backend(format!(
                "Redis connection verification failed: {e}"
            )));
        }
    }

    Ok(RedisSession {
        name: name.to_string(),
        conn: connection,
        profile: config.protocol,
        prefix: KeyPrefix::new(config.prefix.clone()),
    })
}

/// A resolved connection: the live client handle plus the reply profile
/// and key prefix fixed at resolution time.
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct RedisSession {
    name: String,
    conn: MultiplexedConnection,
    profile: Protocol,
    prefix: KeyPrefix,
}

impl RedisSession {
    /// The connection name this session was resolved for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reply profile negotiated at connect time
    pub fn profile(&self) -> Protocol {
        self.profile
    }

    /// The configured key namespace prefix
    pub fn prefix(&self) -> &KeyPrefix {
        &self.prefix
    }

    /// Apply the namespace prefix to a logical key, producing the raw
    /// name the server knows
    pub fn raw_key(&self, logical: &str) -> String {
        self.prefix.apply(logical)
    }

    pub fn conn_mut(&mut self) -> &mut MultiplexedConnection {
        &mut self.conn
    }
}

impl std::fmt::Debug for RedisSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSession")
            .field("name", &self.name)
            .field("profile", &self.profile)
            .field("prefix", &self.prefix.as_str())
            .finish()
    }
}
