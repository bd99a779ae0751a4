//! MCP server that checks shell commands against organizational security
//! policies before they are run.
//!
//! Commands are never executed. The `execute_validated_command` tool reports
//! what would have run, see [`execute::simulate`].

use crate::validator::CommandValidator;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::Arc;
use tokio::sync::Mutex;
pub mod execute;
pub mod policy;
pub mod tools;
pub mod validator;

/// MCP command validation server.
///
/// Clones share one validator, so the audit log and counters are
/// process-wide.
#[derive(Debug, Clone)]
pub struct ValidatorServer {
    pub(crate) validator: Arc<Mutex<CommandValidator>>,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for ValidatorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gmcp-validator".into(),
                title: Some("Command Validator Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Validates shell commands against security policies. Use \
                 execute_validated_command instead of direct shell access."
                    .into(),
            ),
        }
    }
}
