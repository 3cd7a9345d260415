//! # SOLID Kit Audit
//!
//! Bounded in-memory ledger of invocations and contract verdicts.

mod check_log;

pub use check_log::{CheckEntry, CheckEventType, CheckLog, CheckStats};
