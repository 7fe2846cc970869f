//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file")
        .arg(utils::config_arg())
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let context = utils::load_context(matches).await?;
    let plan = &context.plan;

    println!("Configuration file is valid!");
    println!("File: {}", context.config_file_path.display());
    println!("Input type: {}", plan.input_type);
    println!("Input: {}", context.document);
    println!("Output root: {}", context.config_dir().display());
    println!("Generators: {}", plan.len());

    for entry in plan {
        println!("  - {} ({})", entry.id, entry.preset);
    }

    Ok(())
}
