//! Connection configuration
//!
//! A manager is configured with a mapping of connection name to
//! connection settings. Settings deserialize from TOML, e.g.:
//!
//! ```toml
//! [connections.default]
//! host = "127.0.0.1"
//! port = 6379
//! prefix = "myapp:"
//!
//! [connections.sessions]
//! host = "10.0.0.5"
//! password = "secret"
//! db = 2
//! protocol = "resp3"
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Reply profile of a connection, fixed once at resolution time.
///
/// RESP3 connections receive typed/wrapped replies (maps, doubles,
/// verbatim strings) and page the keyspace with raw scan cursors; RESP2
/// connections receive plain scalar replies and page through the client
/// library's iteration helper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Resp2,
    Resp3,
}

/// Settings for one named Redis connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Username (ACL), if the server requires one
    #[serde(default)]
    pub username: Option<String>,
    /// Password, if the server requires one
    #[serde(default)]
    pub password: Option<String>,
    /// Database index (0-15)
    #[serde(default)]
    pub db: i64,
    /// Namespace prefix prepended to every key on the wire
    #[serde(default)]
    pub prefix: String,
    /// Reply profile to negotiate at connect time
    #[serde(default)]
    pub protocol: Protocol,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: None,
            password: None,
            db: 0,
            prefix: String::new(),
            protocol: Protocol::default(),
        }
    }
}

impl ConnectionConfig {
    /// Create a configuration for the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database index
    pub fn with_db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// Set the key namespace prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the reply profile
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// The full manager configuration: connection name -> settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

impl ManagerConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Register a connection under a name
    pub fn with_connection(mut self, name: impl Into<String>, config: ConnectionConfig) -> Self {
        self.connections.insert(name.into(), config);
        self
    }

    /// Look up a named connection; unknown names are a configuration error
    pub fn connection(&self, name: &str) -> Result<&ConnectionConfig> {
        self.connections
            .get(name)
            .ok_or_else(|| Error::Configuration(format!("unknown connection: {name}")))
    }

    /// Configured connection names, sorted for stable display
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.connections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
