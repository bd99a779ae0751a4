//! Command validation and the in-memory audit log.
//!
//! Every call to [`CommandValidator::validate`] appends exactly one
//! [`AuditEntry`], whatever the outcome. The log is never trimmed and lives
//! as long as the validator.

use crate::policy::{PolicySet, base_command};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Policy name reported when allowlist enforcement blocks a command.
pub const ALLOWLIST_POLICY: &str = "allowlist";

/// Number of entries returned in [`Stats::recent_log`].
pub const RECENT_LOG_LEN: usize = 10;

const PASSED: &str = "Command passed all policy checks";
const NOT_ALLOWLISTED: &str = "Command is not in the allowlist";

/// Outcome recorded for an audited command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Allowed,
    Blocked,
}

/// One validation decision, in call order.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub command: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of validating a single command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the command may proceed.
    pub allowed: bool,
    /// Policy message when blocked, a generic pass message otherwise.
    pub reason: String,
    /// Name of the policy that blocked the command.
    pub policy: Option<String>,
    /// The declared pattern that fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_matched: Option<String>,
}

/// Aggregate counters plus the tail of the audit log.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total_commands: usize,
    pub blocked: usize,
    pub allowed: usize,
    /// Up to [`RECENT_LOG_LEN`] most recent entries, oldest first.
    pub recent_log: Vec<AuditEntry>,
}

/// Validates commands against a [`PolicySet`] and keeps the audit trail.
#[derive(Debug)]
pub struct CommandValidator {
    policies: PolicySet,
    enforce_allowlist: bool,
    audit_log: Vec<AuditEntry>,
    blocked: usize,
}

impl CommandValidator {
    /// Create a validator with an empty audit log.
    ///
    /// The allowlist is only consulted when `enforce_allowlist` is set.
    pub fn new(policies: PolicySet, enforce_allowlist: bool) -> Self {
        Self {
            policies,
            enforce_allowlist,
            audit_log: Vec::new(),
            blocked: 0,
        }
    }

    /// The policy table this validator checks against.
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Check a command and record the decision.
    pub fn validate(&mut self, command: &str) -> ValidationResult {
        let command = command.trim();

        if let Some((policy, pattern)) = self.policies.first_match(command) {
            tracing::warn!(command, policy = %policy.name, pattern = pattern.as_str(), "command blocked");
            let name = policy.name.clone();
            let result = ValidationResult {
                allowed: false,
                reason: policy.message.clone(),
                policy: Some(name.clone()),
                pattern_matched: Some(pattern.as_str().to_owned()),
            };
            self.record_blocked(command, &name);
            return result;
        }

        if self.enforce_allowlist {
            let base = base_command(command);
            if !base.is_empty() && !self.policies.is_allowlisted(base) {
                tracing::warn!(command, base, "command not in allowlist");
                self.record_blocked(command, ALLOWLIST_POLICY);
                return ValidationResult {
                    allowed: false,
                    reason: NOT_ALLOWLISTED.into(),
                    policy: Some(ALLOWLIST_POLICY.into()),
                    pattern_matched: None,
                };
            }
        }

        tracing::debug!(command, "command allowed");
        self.audit_log.push(AuditEntry {
            command: command.to_owned(),
            status: Status::Allowed,
            policy: None,
            timestamp: Utc::now(),
        });
        ValidationResult {
            allowed: true,
            reason: PASSED.into(),
            policy: None,
            pattern_matched: None,
        }
    }

    fn record_blocked(&mut self, command: &str, policy: &str) {
        self.blocked += 1;
        self.audit_log.push(AuditEntry {
            command: command.to_owned(),
            status: Status::Blocked,
            policy: Some(policy.to_owned()),
            timestamp: Utc::now(),
        });
    }

    /// Counters and the most recent audit entries.
    pub fn stats(&self) -> Stats {
        let total = self.audit_log.len();
        let start = total.saturating_sub(RECENT_LOG_LEN);
        Stats {
            total_commands: total,
            blocked: self.blocked,
            allowed: total - self.blocked,
            recent_log: self.audit_log[start..].to_vec(),
        }
    }

    /// The full audit log in call order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }
}
