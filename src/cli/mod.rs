//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("codegen")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Realize code generator configurations into dependency-ordered execution plans")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::plan::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("plan", sub_matches)) => commands::plan::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::Result;
    use clap::{Arg, ArgMatches};
    use std::path::PathBuf;

    use crate::{Codegen, RunContext};

    /// `-c/--config` argument shared by commands that read a configuration
    pub fn config_arg() -> Arg {
        Arg::new("config")
            .short('c')
            .long("config")
            .help("Configuration file path (searches codegen.json, codegen.yaml, codegen.yml by default)")
            .value_name("FILE")
    }

    /// Get the explicit configuration file path, if one was given
    pub fn get_config_path(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<String>("config").map(PathBuf::from)
    }

    /// Create a Codegen instance rooted at the working directory
    pub fn create_app() -> Result<Codegen> {
        Ok(Codegen::from_current_dir()?)
    }

    /// Load and realize the configuration named by the arguments
    pub async fn load_context(matches: &ArgMatches) -> Result<RunContext> {
        let app = create_app()?;
        let config_path = get_config_path(matches);
        Ok(app.realize(config_path.as_deref()).await?)
    }
}
