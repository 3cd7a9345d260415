//! # SOLID Kit Shared
//!
//! Common types used across all SOLID Kit crates.
//!
//! - `Entity` - named instance carrying attached traits and its own operations
//! - `Capability` / `Operation` - shared units of behaviour
//! - `RoleContract` / `Invariant` / `Verdict` - behavioural contracts
//! - `OutputSink` - text side channel for operation effects
//! - `Catalog` - YAML/JSON description of traits, roles and entities

pub mod error;
pub mod entity;
pub mod capability;
pub mod contract;
pub mod output;
pub mod config;

// Re-exports
pub use error::*;
pub use entity::*;
pub use capability::*;
pub use contract::*;
pub use output::*;
pub use config::*;
