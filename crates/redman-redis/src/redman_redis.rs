//! Redis adapter for the Redman admin panel
//!
//! Connects to named Redis servers, scans the keyspace with type and ttl
//! annotation, and dispatches fetch/update/store/remove operations to
//! per-structure handlers. Everything here returns plain records from
//! `redman-core`; rendering and routing live in the host admin
//! framework.

mod client;
#[cfg(test)]
mod client_tests;
mod data_type;
#[cfg(test)]
mod data_type_tests;
mod keys;
#[cfg(test)]
mod keys_tests;
mod manager;
#[cfg(test)]
mod manager_tests;
mod prefix;
#[cfg(test)]
mod prefix_tests;
mod reply;
#[cfg(test)]
mod reply_tests;

pub use client::*;
pub use data_type::*;
pub use keys::*;
pub use manager::*;
pub use prefix::*;
pub use reply::*;
