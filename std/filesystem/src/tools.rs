//! Tool implementations for the file manager MCP server.

use crate::FileManagerServer;
use crate::manager::FileManager;
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::Deserialize;

/// Parameters for creating a file.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateFileParams {
    /// Desired file path (will be normalized to snake_case).
    pub path: String,
    /// File content.
    #[serde(default)]
    pub content: String,
}

/// Parameters for reading or deleting a file.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PathParams {
    /// File path.
    pub path: String,
}

/// Parameters for writing a file.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// File path.
    pub path: String,
    /// File content.
    pub content: String,
}

/// Parameters for listing files.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    /// Directory path, relative to the protected directory.
    #[serde(default)]
    pub path: String,
}

#[tool_router]
impl FileManagerServer {
    /// Create a new server for the given file manager.
    pub fn new(manager: FileManager) -> Self {
        Self {
            manager,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Create a new file (automatically applies snake_case naming convention)"
    )]
    async fn create_file(
        &self,
        Parameters(params): Parameters<CreateFileParams>,
    ) -> Result<String, String> {
        self.manager
            .create_file(&params.path, &params.content)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(description = "Read contents of a file")]
    async fn read_file(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<String, String> {
        self.manager
            .read_file(&params.path)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Write to an existing file (naming convention enforced on creation only)"
    )]
    async fn write_file(
        &self,
        Parameters(params): Parameters<WriteFileParams>,
    ) -> Result<String, String> {
        self.manager
            .write_file(&params.path, &params.content)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(description = "Delete a file")]
    async fn delete_file(
        &self,
        Parameters(params): Parameters<PathParams>,
    ) -> Result<String, String> {
        self.manager
            .delete_file(&params.path)
            .await
            .map_err(|e| e.to_string())
    }

    #[tool(description = "List all files in directory")]
    async fn list_files(
        &self,
        Parameters(params): Parameters<ListFilesParams>,
    ) -> Result<String, String> {
        self.manager
            .list_files(&params.path)
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::FileManagerServer;
    use crate::manager::FileManager;
    use crate::tools::{CreateFileParams, ListFilesParams, PathParams, WriteFileParams};
    use rmcp::handler::server::wrapper::Parameters;

    #[tokio::test]
    async fn create_write_read_delete_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let server = FileManagerServer::new(FileManager::new(tmp.path()).unwrap());

        let created = server
            .create_file(Parameters(CreateFileParams {
                path: "ProjectPlan.md".into(),
                content: "draft".into(),
            }))
            .await
            .expect("should succeed");
        assert!(created.contains("'ProjectPlan.md' → 'project_plan.md'"));

        server
            .write_file(Parameters(WriteFileParams {
                path: "project_plan.md".into(),
                content: "final".into(),
            }))
            .await
            .expect("should succeed");

        let text = server
            .read_file(Parameters(PathParams {
                path: "project_plan.md".into(),
            }))
            .await
            .expect("should succeed");
        assert_eq!(text, "final");

        let listing = server
            .list_files(Parameters(ListFilesParams {
                path: String::new(),
            }))
            .await
            .expect("should succeed");
        assert_eq!(listing, "project_plan.md");

        server
            .delete_file(Parameters(PathParams {
                path: "project_plan.md".into(),
            }))
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn errors_are_reported_as_text() {
        let tmp = tempfile::tempdir().unwrap();
        let server = FileManagerServer::new(FileManager::new(tmp.path()).unwrap());
        let err = server
            .read_file(Parameters(PathParams {
                path: "absent.txt".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err, "File 'absent.txt' not found");
    }

    #[test]
    fn content_and_list_path_are_optional() {
        let params: CreateFileParams = serde_json::from_str(r#"{"path":"a.txt"}"#).unwrap();
        assert_eq!(params.content, "");
        let params: ListFilesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.path, "");
    }
}
