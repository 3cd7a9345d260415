//! CheckLog - Ledger of invocations and contract verdicts

use serde::{Deserialize, Serialize};
use shared::{ContractViolation, Verdict};
use std::collections::VecDeque;

/// Ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckEntry {
    pub timestamp: String,
    pub event_type: CheckEventType,
    pub entity: String,
    pub role: Option<String>,
    pub operation: Option<String>,
    pub success: bool,
    pub detail: Option<String>,
    pub violation: Option<ContractViolation>,
}

/// Types of ledger events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckEventType {
    Invocation,
    InvocationFailed,
    ContractPass,
    ContractViolation,
    AdmissionDenied,
}

/// Bounded ledger; the oldest entry is dropped once full
#[derive(Debug)]
pub struct CheckLog {
    entries: VecDeque<CheckEntry>,
    max_entries: usize,
}

impl CheckLog {
    /// Create a new CheckLog
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            max_entries,
        }
    }

    /// Record an entry
    pub fn log(&mut self, entry: CheckEntry) {
        if self.max_entries == 0 {
            return;
        }
        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Record a trait invocation
    pub fn log_invocation(&mut self, entity: &str, operation: &str, success: bool, detail: Option<&str>) {
        self.log(CheckEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: if success {
                CheckEventType::Invocation
            } else {
                CheckEventType::InvocationFailed
            },
            entity: entity.to_string(),
            role: None,
            operation: Some(operation.to_string()),
            success,
            detail: detail.map(|s| s.to_string()),
            violation: None,
        });
    }

    /// Record the verdict of a substitutability check
    pub fn log_verdict(&mut self, entity: &str, role: &str, operation: &str, verdict: &Verdict) {
        let violation = verdict.violation().cloned();
        self.log(CheckEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: if verdict.is_pass() {
                CheckEventType::ContractPass
            } else {
                CheckEventType::ContractViolation
            },
            entity: entity.to_string(),
            role: Some(role.to_string()),
            operation: Some(operation.to_string()),
            success: verdict.is_pass(),
            detail: violation.as_ref().map(|v| v.to_string()),
            violation,
        });
    }

    /// Record an entity turned away at a role gate
    pub fn log_denial(&mut self, violation: &ContractViolation) {
        self.log(CheckEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event_type: CheckEventType::AdmissionDenied,
            entity: violation.entity.clone(),
            role: Some(violation.role.clone()),
            operation: Some(violation.operation.clone()),
            success: false,
            detail: Some(format!("Denied as '{}'", violation.role)),
            violation: Some(violation.clone()),
        });
    }

    /// Get recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Vec<&CheckEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Get recent contract violations, newest first
    pub fn get_recent_violations(&self, limit: usize) -> Vec<&CheckEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.event_type == CheckEventType::ContractViolation)
            .take(limit)
            .collect()
    }

    /// Get statistics
    pub fn get_stats(&self) -> CheckStats {
        let count = |ty: CheckEventType| self.entries.iter().filter(|e| e.event_type == ty).count();

        CheckStats {
            total_entries: self.entries.len(),
            failure_count: self.entries.iter().filter(|e| !e.success).count(),
            violation_count: count(CheckEventType::ContractViolation),
            denial_count: count(CheckEventType::AdmissionDenied),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

/// Ledger statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStats {
    pub total_entries: usize,
    pub failure_count: usize,
    pub violation_count: usize,
    pub denial_count: usize,
}

impl Default for CheckLog {
    fn default() -> Self {
        Self::new(10000)
    }
}
