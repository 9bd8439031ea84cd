//! Redman Core - shared vocabulary for the Redis admin panel
//!
//! This crate holds everything the boundary layer and the Redis adapter
//! agree on without either pulling in the other:
//!
//! - `Error` / `Result` - the error taxonomy
//! - `ManagerConfig` / `ConnectionConfig` - named connection settings
//! - `KeyType`, `KeyDescriptor`, `TypedValue` - plain records handed to
//!   the rendering layer
//! - `UpdateRequest` and its tagged operations - the wire-shaped edit
//!   request and its one-place parsing

mod config;
mod error;
mod request;
mod types;

pub use config::*;
pub use error::*;
pub use request::*;
pub use types::*;
