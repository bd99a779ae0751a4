//! MCP server providing file management inside one protected directory.
//!
//! Every path is resolved against the protected directory and rejected if it
//! escapes it. New files are renamed to snake_case on creation, see
//! [`naming::normalize_file_name`].

use crate::error::FileError;
use crate::manager::FileManager;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{
        AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParams, RawResource,
        ReadResourceRequestParams, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool_handler,
};
pub mod error;
pub mod manager;
pub mod naming;
pub mod tools;
pub mod validate;

/// MCP file manager server.
#[derive(Debug, Clone)]
pub struct FileManagerServer {
    pub(crate) manager: FileManager,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FileManagerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "gmcp-filesystem".into(),
                title: Some("File Manager Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "File manager for a single protected directory. New file names are \
                 converted to snake_case."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut resource = RawResource::new(self.manager.root_uri(), self.manager.root_name());
        resource.description = Some("Main protected directory managed by the file manager".into());
        Ok(ListResourcesResult::with_all_items(vec![
            resource.no_annotation(),
        ]))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self
            .manager
            .read_resource(&request.uri)
            .await
            .map_err(|e| match e {
                FileError::UnknownResource(_) | FileError::Path(_) => {
                    McpError::resource_not_found(e.to_string(), None)
                }
                _ => McpError::internal_error(e.to_string(), None),
            })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
