//! Codegen Orchestrator Library
//!
//! Loads code generator configuration files (JSON or YAML) and realizes them
//! into dependency-ordered execution plans for the generator dispatch layer.

pub mod cli;
pub mod config;
pub mod utils;

pub use codegen_engine as engine;
pub use codegen_engine::{
    realize, Configuration, ExecutionPlan, GeneratorEntry, InputType, Language, Preset,
    RealizeError, ResolvedEntry,
};
pub use config::{ConfigFormat, ConfigLoader, DocumentSource, LoadedConfig, RunContext};

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main application context that coordinates loading and realization
pub struct Codegen {
    loader: ConfigLoader,
}

impl Codegen {
    /// Create a new Codegen instance resolving configuration files from `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: ConfigLoader::new(working_dir),
        }
    }

    /// Create a Codegen instance rooted at the process working directory
    pub fn from_current_dir() -> CodegenResult<Self> {
        Ok(Self {
            loader: ConfigLoader::from_current_dir()?,
        })
    }

    /// Load the configuration file and realize it into a run context.
    ///
    /// `explicit` bypasses the configuration file search.
    pub async fn realize(&self, explicit: Option<&Path>) -> CodegenResult<RunContext> {
        let loaded = self.loader.load(explicit).await?;
        info!("Realizing configuration: {:?}", loaded.path);

        let configuration = engine::validate(&loaded.raw)?;
        let plan = engine::realize_configuration(&configuration)?;
        debug!("Execution plan: {:?}", plan.ids());

        RunContext::new(configuration, plan, loaded.path)
    }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum CodegenError {
    #[error("Configuration file not found at: {path:?}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("No configuration file found in {directory:?}")]
    NoConfigFound {
        directory: PathBuf,
        searched: Vec<String>,
    },

    #[error("Failed to parse configuration file {path:?}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unsupported configuration file format: {path:?}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to expand path '{path}': {message}")]
    PathExpansion { path: String, message: String },

    #[error(transparent)]
    Realize(#[from] RealizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodegenError {
    /// Stable error code for presentation
    pub fn code(&self) -> &'static str {
        match self {
            CodegenError::ConfigFileNotFound { .. } | CodegenError::NoConfigFound { .. } => {
                "CONFIG_NOT_FOUND"
            }
            CodegenError::ConfigParse { .. } | CodegenError::UnsupportedFormat { .. } => {
                "CONFIG_PARSE_ERROR"
            }
            CodegenError::Realize(error) => error.kind().as_str(),
            CodegenError::PathExpansion { .. }
            | CodegenError::Io(_)
            | CodegenError::Serialization(_)
            | CodegenError::Json(_) => "UNKNOWN_ERROR",
        }
    }

    pub fn help(&self) -> Option<String> {
        match self {
            CodegenError::ConfigFileNotFound { .. } => Some(
                "Check that the file exists and the path is correct.\nCreate a configuration file with: codegen init".to_string(),
            ),
            CodegenError::NoConfigFound { searched, .. } => Some(format!(
                "Searched for:\n{}\nCreate a configuration file with: codegen init\nOr pass one explicitly: codegen plan --config <FILE>",
                searched
                    .iter()
                    .map(|place| format!("  - {place}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            )),
            CodegenError::ConfigParse { .. } => Some(
                "Check that the configuration file is valid JSON or YAML.".to_string(),
            ),
            CodegenError::UnsupportedFormat { .. } => Some(
                "JavaScript and TypeScript configuration modules cannot be loaded.\nConvert the configuration to codegen.json or codegen.yaml.".to_string(),
            ),
            CodegenError::Realize(error) => error.help(),
            CodegenError::PathExpansion { .. }
            | CodegenError::Io(_)
            | CodegenError::Serialization(_)
            | CodegenError::Json(_) => None,
        }
    }

    /// Render the error for terminal display
    pub fn format(&self) -> String {
        if let CodegenError::Realize(error) = self {
            return error.format();
        }

        let mut output = format!("Error [{}]: {}", self.code(), self);
        if let Some(help) = self.help() {
            output.push_str("\n\nHow to fix:\n");
            output.push_str(&help);
        }
        output
    }
}

/// Result type for the main application
pub type CodegenResult<T> = Result<T, CodegenError>;
