//! # SOLID Kit Contracts
//!
//! Decides whether an entity can stand in for a role.
//!
//! ## Components
//!
//! - `ContractChecker` - Role registration and substitutability checks

pub mod contract_checker;

pub use contract_checker::ContractChecker;
