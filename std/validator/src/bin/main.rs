//! Binary entry point for the gmcp-validator MCP server.

use clap::Parser;
use gmcp_validator::{ValidatorServer, policy::PolicySet, validator::CommandValidator};
use rmcp::ServiceExt;
use std::path::PathBuf;

/// Command Validator Server: checks shell commands against security policies.
#[derive(Parser)]
#[command(name = "gmcp-validator", version, about)]
struct Cli {
    /// TOML file replacing the built-in policy table.
    #[arg(long, value_name = "FILE")]
    policies: Option<PathBuf>,

    /// Block commands whose base command is not on the allowlist.
    #[arg(long)]
    enforce_allowlist: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }
    let policies = match &cli.policies {
        Some(path) => PolicySet::load(path),
        None => PolicySet::builtin(),
    };
    let policies = match policies {
        Ok(policies) => policies,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        policies = policies.policies().len(),
        enforce_allowlist = cli.enforce_allowlist,
        "starting command validator"
    );
    let server = ValidatorServer::new(CommandValidator::new(policies, cli.enforce_allowlist));
    let transport = rmcp::transport::stdio();
    server
        .serve(transport)
        .await
        .expect("failed to start server")
        .waiting()
        .await
        .expect("server error");
}
