//! Security policies for the command validator.
//!
//! A policy is a named, ordered list of regular expressions plus the message
//! reported when one of them matches. Policies are evaluated in declaration
//! order and the first matching pattern wins, so the table order is part of
//! the observable behavior.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Errors from building a [`PolicySet`].
#[derive(Error, Debug)]
pub enum PolicyError {
    /// A pattern failed to compile.
    #[error("invalid pattern {pattern:?} in policy {policy}: {source}")]
    Pattern {
        policy: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// Two policies share a name.
    #[error("duplicate policy name: {0}")]
    Duplicate(String),
    /// The policy file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The policy file is not valid TOML for the expected layout.
    #[error("policy file error: {0}")]
    Parse(#[from] toml::de::Error),
}

struct Builtin {
    name: &'static str,
    message: &'static str,
    patterns: &'static [&'static str],
}

const BUILTIN_POLICIES: &[Builtin] = &[
    Builtin {
        name: "destructive_commands",
        message: "Destructive command blocked by ORG-SEC-001",
        patterns: &[
            r"\brm\s+-rf\s+/",
            r"\brm\s+-rf\s+\*",
            r"\bdd\s+.*of=/dev/",
            r"\bmkfs\.",
            r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
            r"\bchmod\s+-R\s+777",
        ],
    },
    Builtin {
        name: "network_exfiltration",
        message: "Network exfiltration risk blocked by ORG-SEC-002",
        patterns: &[
            r"curl\s+.*\|\s*bash",
            r"wget\s+.*\|\s*sh",
            r"nc\s+-l",
            r"python.*-m\s+http\.server",
        ],
    },
    Builtin {
        name: "system_modification",
        message: "System modification requires approval - ORG-OPS-003",
        patterns: &[
            r"\bsudo\s+rm",
            r"\bapt-get\s+remove",
            r"\byum\s+remove",
            r"\bsystemctl\s+stop",
            r"\bkill\s+-9\s+1",
        ],
    },
    Builtin {
        name: "sensitive_paths",
        message: "Access to sensitive files blocked - ORG-SEC-004",
        patterns: &[
            r"/etc/passwd",
            r"/etc/shadow",
            r"\.ssh/id_rsa",
            r"\.aws/credentials",
            r"\.env",
        ],
    },
];

const BUILTIN_ALLOWED_COMMANDS: &[&str] = &[
    "git", "ls", "cat", "echo", "pwd", "cd", "grep", "find", "npm", "yarn", "python", "node",
    "pip", "docker", "kubectl", "terraform", "make", "cargo",
];

/// A policy as written in a policy file.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDef {
    /// Policy identifier, reported when the policy blocks a command.
    pub name: String,
    /// Human-readable reason for blocking.
    pub message: String,
    /// Regular expressions, tried in order.
    pub patterns: Vec<String>,
}

/// Layout of a TOML policy file.
#[derive(Debug, Deserialize)]
pub struct PolicyFile {
    /// Base command names considered safe. Falls back to the built-in list.
    #[serde(default)]
    pub allowed_commands: Option<Vec<String>>,
    /// Policies in evaluation order.
    #[serde(default)]
    pub policy: Vec<PolicyDef>,
}

/// A compiled pattern that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// The pattern exactly as declared.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Case-insensitive, unanchored search.
    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }
}

/// A named rule category with its compiled patterns.
#[derive(Debug, Clone)]
pub struct Policy {
    pub name: String,
    pub message: String,
    pub patterns: Vec<Pattern>,
}

impl Policy {
    fn compile(def: PolicyDef) -> Result<Self, PolicyError> {
        let patterns = def
            .patterns
            .into_iter()
            .map(|source| {
                let regex = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| PolicyError::Pattern {
                        policy: def.name.clone(),
                        pattern: source.clone(),
                        source: e,
                    })?;
                Ok(Pattern { source, regex })
            })
            .collect::<Result<Vec<_>, PolicyError>>()?;
        Ok(Self {
            name: def.name,
            message: def.message,
            patterns,
        })
    }

    /// First pattern of this policy matching the command, in declared order.
    pub fn first_match(&self, command: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.is_match(command))
    }
}

/// The ordered policy table plus the command allowlist.
#[derive(Debug, Clone)]
pub struct PolicySet {
    policies: Vec<Policy>,
    allowed_commands: BTreeSet<String>,
}

impl PolicySet {
    /// Compile policy definitions, keeping their order.
    pub fn new(
        defs: Vec<PolicyDef>,
        allowed_commands: impl IntoIterator<Item = String>,
    ) -> Result<Self, PolicyError> {
        let mut policies: Vec<Policy> = Vec::with_capacity(defs.len());
        for def in defs {
            if policies.iter().any(|p| p.name == def.name) {
                return Err(PolicyError::Duplicate(def.name));
            }
            policies.push(Policy::compile(def)?);
        }
        Ok(Self {
            policies,
            allowed_commands: allowed_commands.into_iter().collect(),
        })
    }

    /// The four built-in organizational policies.
    pub fn builtin() -> Result<Self, PolicyError> {
        let defs = BUILTIN_POLICIES
            .iter()
            .map(|b| PolicyDef {
                name: b.name.into(),
                message: b.message.into(),
                patterns: b.patterns.iter().map(|p| p.to_string()).collect(),
            })
            .collect();
        Self::new(defs, builtin_allowed_commands())
    }

    /// Parse a TOML policy table.
    pub fn from_toml(source: &str) -> Result<Self, PolicyError> {
        let file: PolicyFile = toml::from_str(source)?;
        let allowed = file
            .allowed_commands
            .unwrap_or_else(builtin_allowed_commands);
        Self::new(file.policy, allowed)
    }

    /// Load a TOML policy file from disk.
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Policies in evaluation order.
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// The first policy and pattern that match, if any.
    pub fn first_match(&self, command: &str) -> Option<(&Policy, &Pattern)> {
        self.policies
            .iter()
            .find_map(|policy| policy.first_match(command).map(|p| (policy, p)))
    }

    /// Whether a base command name is on the allowlist.
    pub fn is_allowlisted(&self, base_command: &str) -> bool {
        self.allowed_commands.contains(base_command)
    }

    /// Per-policy message and pattern count, serialized as an ordered map.
    pub fn summaries(&self) -> PolicySummaries<'_> {
        PolicySummaries(&self.policies)
    }
}

fn builtin_allowed_commands() -> Vec<String> {
    BUILTIN_ALLOWED_COMMANDS
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// Extract the base command: the first word, without any leading directories.
///
/// `/usr/bin/git status` yields `git`. An empty command yields `""`.
pub fn base_command(command: &str) -> &str {
    let first = command.split_whitespace().next().unwrap_or("");
    first.rsplit('/').next().unwrap_or(first)
}

#[derive(Debug, Serialize)]
struct PolicySummary<'a> {
    message: &'a str,
    pattern_count: usize,
}

/// Serializes as `{ name: { message, pattern_count } }` in evaluation order.
pub struct PolicySummaries<'a>(&'a [Policy]);

impl Serialize for PolicySummaries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|p| {
            (
                p.name.as_str(),
                PolicySummary {
                    message: &p.message,
                    pattern_count: p.patterns.len(),
                },
            )
        }))
    }
}
