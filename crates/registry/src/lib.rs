//! # SOLID Kit Registry
//!
//! Catalog of named traits and their composition onto entities.
//!
//! ## Components
//!
//! - `CapabilityRegistry` - Trait definitions, attachment and invocation

pub mod capability_registry;

pub use capability_registry::CapabilityRegistry;
