//! Tool implementations for the command validator MCP server.

use crate::ValidatorServer;
use crate::execute::simulate;
use crate::validator::CommandValidator;
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Parameters for the command tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CommandParams {
    /// The shell command to check.
    #[serde(default)]
    pub command: String,
}

/// Response of `execute_validated_command`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ExecuteOutcome<'a> {
    Blocked {
        command: &'a str,
        reason: String,
        policy: Option<String>,
    },
    Success {
        command: &'a str,
        validation: &'static str,
        output: String,
    },
}

#[tool_router]
impl ValidatorServer {
    /// Create a server around a validator.
    pub fn new(validator: CommandValidator) -> Self {
        Self {
            validator: Arc::new(Mutex::new(validator)),
            tool_router: Self::tool_router(),
        }
    }

    /// Validate a command without running it.
    #[tool(
        description = "Validates a shell command against organizational security policies before execution. Returns validation result with policy details."
    )]
    async fn validate_command(
        &self,
        Parameters(params): Parameters<CommandParams>,
    ) -> Result<String, String> {
        let result = self.validator.lock().await.validate(&params.command);
        serde_json::to_string_pretty(&result).map_err(|e| e.to_string())
    }

    /// Validate a command and simulate its execution when allowed.
    #[tool(
        description = "Validates and executes a shell command if it passes all policy checks. Use this instead of direct shell access."
    )]
    async fn execute_validated_command(
        &self,
        Parameters(params): Parameters<CommandParams>,
    ) -> Result<String, String> {
        let validation = self.validator.lock().await.validate(&params.command);
        let outcome = if validation.allowed {
            ExecuteOutcome::Success {
                command: &params.command,
                validation: "passed",
                output: simulate(&params.command),
            }
        } else {
            ExecuteOutcome::Blocked {
                command: &params.command,
                reason: validation.reason,
                policy: validation.policy,
            }
        };
        serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())
    }

    /// Report validation counters and the recent audit log.
    #[tool(description = "Get statistics about command validations (blocked vs allowed)")]
    async fn get_validation_stats(&self) -> Result<String, String> {
        let stats = self.validator.lock().await.stats();
        serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())
    }

    /// List active policies with their message and pattern count.
    #[tool(description = "List all active security policies and their rules")]
    async fn list_policies(&self) -> Result<String, String> {
        let validator = self.validator.lock().await;
        serde_json::to_string_pretty(&validator.policies().summaries()).map_err(|e| e.to_string())
    }
}
