//! Codegen CLI binary

use anyhow::Result;

use codegen_orchestrator::cli::CliApp;
use codegen_orchestrator::CodegenError;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codegen=info".into()),
        )
        .init();

    // Parse command line arguments
    let matches = CliApp::app().get_matches();

    // Structured errors get their full rendering instead of the debug chain
    if let Err(error) = CliApp::run(&matches).await {
        match error.downcast_ref::<CodegenError>() {
            Some(codegen_error) => {
                eprintln!("{}", codegen_error.format());
                std::process::exit(1);
            }
            None => return Err(error),
        }
    }

    Ok(())
}
