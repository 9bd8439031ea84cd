//! The manager facade
//!
//! One `RedisManager` serves every configured connection. Sessions are
//! resolved lazily on first use and cached by name; clones of a cached
//! session share the underlying multiplexed connection, so concurrent
//! operations against the same name do not reconnect.
//!
//! Display keys carry the connection's namespace prefix. The facade
//! strips the prefix once on the way in and the handlers re-apply it at
//! the command boundary, so a key pasted from the listing and a key
//! typed without the prefix both land on the same server-side name.

use std::collections::HashMap;

use tokio::sync::Mutex;

use redman_core::{
    Error, FetchedKey, KeyDescriptor, KeyType, ManagerConfig, Result, UpdateRequest,
};

use crate::client::{RedisSession, backend_err, connect};
use crate::data_type::handler_for;
use crate::keys::scan_keys;
use crate::prefix::KeyPrefix;
use crate::reply::{text_payload, to_json};

/// Facade over all configured Redis connections
#[derive(Debug)]
pub struct RedisManager {
    config: ManagerConfig,
    sessions: Mutex<HashMap<String, RedisSession>>,
}

impl RedisManager {
    /// Create a manager for a configuration
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a manager from TOML configuration text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(Self::new(ManagerConfig::from_toml_str(text)?))
    }

    /// Configured connection names, sorted for stable display
    pub fn connections(&self) -> Vec<&str> {
        self.config.names()
    }

    /// Resolve a named connection to a live session, connecting on first
    /// use. Unknown names fail before any network traffic.
    pub async fn resolve(&self, connection: &str) -> Result<RedisSession> {
        let config = self.config.connection(connection)?;

        // The lock is held across connect so two racing callers do not
        // open two connections for the same name.
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(connection) {
            return Ok(session.clone());
        }

        let session = connect(connection, config).await?;
        sessions.insert(connection.to_string(), session.clone());
        Ok(session)
    }

    /// Scan keys matching a glob pattern, with type and ttl, capped at
    /// `limit` descriptors
    pub async fn scan(
        &self,
        connection: &str,
        pattern: &str,
        limit: usize,
    ) -> Result<Vec<KeyDescriptor>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut session = self.resolve(connection).await?;
        scan_keys(&mut session, pattern, limit).await
    }

    /// Fetch one key's type, ttl and full typed payload.
    ///
    /// A key that does not exist comes back as a missing record rather
    /// than an error, so the browsing layer can render "no such key".
    /// The returned key always carries the namespace prefix, whichever
    /// spelling the caller passed in.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, connection: &str, key: &str) -> Result<FetchedKey> {
        let mut session = self.resolve(connection).await?;
        let logical = session.prefix().strip(key).to_string();
        let raw = display_key(session.prefix(), key);

        let exists: bool = {
            use redis::AsyncCommands;
            session.conn_mut().exists(&raw).await.map_err(backend_err)?
        };
        if !exists {
            return Ok(FetchedKey::missing(raw));
        }

        let kind = native_type(&mut session, &raw).await?;
        if kind == KeyType::None {
            // deleted between EXISTS and TYPE
            return Ok(FetchedKey::missing(raw));
        }
        let handler = handler_for(kind)?;
        let value = handler.fetch(&mut session, &logical).await?;
        let ttl = handler.ttl(&mut session, &logical).await?;

        Ok(FetchedKey {
            key: raw,
            key_type: kind,
            ttl,
            value: Some(value),
        })
    }

    /// Apply an edit request to an existing key.
    ///
    /// The request parses to a tagged operation before the connection is
    /// resolved; a malformed request never touches the server. A ttl in
    /// the request is applied after the edit, for every structure alike.
    #[tracing::instrument(skip(self, request), fields(key = %request.key))]
    pub async fn update(&self, connection: &str, request: &UpdateRequest) -> Result<()> {
        let op = request.update_op()?;
        let ttl = request.ttl_seconds()?;
        let handler = handler_for(request.kind()?)?;

        let mut session = self.resolve(connection).await?;
        let logical = session.prefix().strip(&request.key).to_string();

        handler.update(&mut session, &logical, &op).await?;
        if let Some(ttl) = ttl {
            handler.set_ttl(&mut session, &logical, ttl).await?;
        }
        Ok(())
    }

    /// Create a key (or its first entry) from a request, applying any
    /// requested ttl
    #[tracing::instrument(skip(self, request), fields(key = %request.key))]
    pub async fn store(&self, connection: &str, request: &UpdateRequest) -> Result<()> {
        let op = request.store_op()?;
        let ttl = request.ttl_seconds()?;
        let handler = handler_for(request.kind()?)?;

        let mut session = self.resolve(connection).await?;
        let logical = session.prefix().strip(&request.key).to_string();

        handler.store(&mut session, &logical, &op, ttl).await
    }

    /// Remove one element within a key; returns the number removed
    #[tracing::instrument(skip(self, request), fields(key = %request.key))]
    pub async fn remove(&self, connection: &str, request: &UpdateRequest) -> Result<u64> {
        let op = request.remove_op()?;
        let handler = handler_for(request.kind()?)?;

        let mut session = self.resolve(connection).await?;
        let logical = session.prefix().strip(&request.key).to_string();

        handler.remove(&mut session, &logical, &op).await
    }

    /// Delete whole keys; returns the number actually deleted.
    ///
    /// Display keys are normalized (prefix stripped then re-applied) so
    /// prefixed and unprefixed spellings of the same key both work.
    #[tracing::instrument(skip(self, keys), fields(count = keys.len()))]
    pub async fn del(&self, connection: &str, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut session = self.resolve(connection).await?;
        let raw_keys: Vec<String> = keys
            .iter()
            .map(|key| display_key(session.prefix(), key))
            .collect();

        use redis::AsyncCommands;
        session
            .conn_mut()
            .del(raw_keys)
            .await
            .map_err(backend_err)
    }

    /// Run an arbitrary command line against a connection, returning the
    /// raw reply rendered as JSON.
    ///
    /// The line splits on whitespace; no quoting. Key arguments are sent
    /// as typed, without prefixing.
    #[tracing::instrument(skip(self, line))]
    pub async fn execute(&self, connection: &str, line: &str) -> Result<serde_json::Value> {
        let mut parts = line.split_whitespace();
        let command = parts
            .next()
            .ok_or_else(|| Error::InvalidRequest("empty command".to_string()))?;

        let mut session = self.resolve(connection).await?;
        let mut cmd = redis::cmd(&command.to_ascii_uppercase());
        for arg in parts {
            cmd.arg(arg);
        }
        let reply: redis::Value = cmd
            .query_async(session.conn_mut())
            .await
            .map_err(backend_err)?;

        Ok(to_json(&reply))
    }

    /// Server INFO, parsed into section -> property -> value
    pub async fn info(&self, connection: &str) -> Result<HashMap<String, HashMap<String, String>>> {
        let mut session = self.resolve(connection).await?;
        let text: String = redis::cmd("INFO")
            .query_async(session.conn_mut())
            .await
            .map_err(backend_err)?;
        Ok(parse_info(&text))
    }
}

/// Normalize an inbound key to its raw display form: strip the prefix
/// if present, then re-apply it, so prefixed and bare spellings of the
/// same key both display (and address) the prefixed name
pub(crate) fn display_key(prefix: &KeyPrefix, key: &str) -> String {
    prefix.apply(prefix.strip(key))
}

/// TYPE of a raw key, decoded to the canonical kind
async fn native_type(session: &mut RedisSession, raw: &str) -> Result<KeyType> {
    let reply: redis::Value = redis::cmd("TYPE")
        .arg(raw)
        .query_async(session.conn_mut())
        .await
        .map_err(backend_err)?;
    let name = text_payload(&reply)
        .ok_or_else(|| Error::Backend(format!("non-textual TYPE reply: {reply:?}")))?;
    KeyType::from_native(&name)
}

/// Parse INFO text into sections keyed by their `# Section` headers.
/// Properties before the first header land in an unnamed section.
pub(crate) fn parse_info(text: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = String::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('#') {
            current = header.trim().to_string();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            sections
                .entry(current.clone())
                .or_default()
                .insert(name.to_string(), value.to_string());
        }
    }

    sections
}
