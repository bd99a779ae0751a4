//! Binary entry point for the gmcp-filesystem MCP server.

use clap::Parser;
use gmcp_filesystem::{FileManagerServer, manager::FileManager};
use rmcp::ServiceExt;

/// File Manager Server: file operations inside one protected directory.
#[derive(Parser)]
#[command(name = "gmcp-filesystem", version, about)]
struct Cli {
    /// The protected directory all file operations are confined to.
    protected_dir: std::path::PathBuf,
}

#[tokio::main]
async fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let cli = Cli::parse();
    let manager = match FileManager::new(&cli.protected_dir) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}: {e}", cli.protected_dir.display());
            std::process::exit(1);
        }
    };
    tracing::info!(root = %manager.root().display(), "starting file manager");
    let server = FileManagerServer::new(manager);
    let transport = rmcp::transport::stdio();
    server
        .serve(transport)
        .await
        .expect("failed to start server")
        .waiting()
        .await
        .expect("server error");
}
