//! # SOLID Kit Workbench
//!
//! Integration layer: a catalog of named entities, the capability registry,
//! the contract checker and the audit ledger behind one API.

mod workbench;

pub use workbench::{Workbench, WorkbenchConfig};

// Re-export dependencies
pub use audit::CheckLog;
pub use contracts::ContractChecker;
pub use registry::CapabilityRegistry;
