//! Realized configuration handed to the generator dispatch layer

use codegen_engine::{Configuration, ExecutionPlan};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

use super::loader::expand_path;
use crate::CodegenResult;

/// Where the input document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(String),
    File(PathBuf),
}

impl DocumentSource {
    /// Resolve `input_path` against the directory holding the configuration file
    pub fn resolve(input_path: &str, config_file: &Path) -> CodegenResult<Self> {
        if input_path.starts_with("http://") || input_path.starts_with("https://") {
            return Ok(DocumentSource::Url(input_path.to_string()));
        }

        let expanded = expand_path(input_path)?;
        if expanded.is_absolute() {
            return Ok(DocumentSource::File(expanded));
        }

        let base = config_file.parent().unwrap_or_else(|| Path::new("."));
        Ok(DocumentSource::File(base.join(expanded)))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Url(url) => write!(f, "{url}"),
            DocumentSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Everything a generator run needs: the plan plus where it came from
#[derive(Debug, Clone)]
pub struct RunContext {
    pub configuration: Configuration,
    pub plan: ExecutionPlan,
    pub config_file_path: PathBuf,
    pub document: DocumentSource,
}

impl RunContext {
    pub fn new(
        configuration: Configuration,
        plan: ExecutionPlan,
        config_file_path: PathBuf,
    ) -> CodegenResult<Self> {
        let document = DocumentSource::resolve(&configuration.input_path, &config_file_path)?;
        Ok(Self {
            configuration,
            plan,
            config_file_path,
            document,
        })
    }

    /// Directory output paths are relative to
    pub fn config_dir(&self) -> &Path {
        self.config_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
    }

    pub fn telemetry(&self) -> Option<&Map<String, Value>> {
        self.configuration.telemetry.as_ref()
    }
}
