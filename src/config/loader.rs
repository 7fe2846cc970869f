//! Configuration file discovery and parsing

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::{CodegenError, CodegenResult};

/// File names searched, in order, when no configuration path is given
pub const SEARCH_PLACES: &[&str] = &["codegen.json", "codegen.yaml", "codegen.yml"];

/// On-disk configuration syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `.json` reads as YAML
    pub fn from_path(path: &Path) -> CodegenResult<Self> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("js" | "mjs" | "cjs" | "ts" | "mts" | "cts") => {
                Err(CodegenError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
            _ => Ok(ConfigFormat::Yaml),
        }
    }

    /// Parse file content into an untyped document
    pub fn parse(self, content: &str) -> Result<Value, String> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// A configuration document read from disk, not yet validated
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub raw: Value,
}

/// Locates and reads configuration files relative to a working directory
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    working_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn from_current_dir() -> CodegenResult<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Resolve the configuration file path.
    ///
    /// An explicit path is expanded (`~`, `$VAR`) and must exist; otherwise the
    /// first existing entry of [`SEARCH_PLACES`] in the working directory wins.
    pub fn find(&self, explicit: Option<&Path>) -> CodegenResult<PathBuf> {
        if let Some(explicit) = explicit {
            let path = self.absolute(&expand_path(&explicit.to_string_lossy())?);
            if !path.is_file() {
                return Err(CodegenError::ConfigFileNotFound { path });
            }
            return Ok(path);
        }

        for place in SEARCH_PLACES {
            let candidate = self.working_dir.join(place);
            debug!("Checking for configuration file: {:?}", candidate);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        Err(CodegenError::NoConfigFound {
            directory: self.working_dir.clone(),
            searched: SEARCH_PLACES.iter().map(|place| place.to_string()).collect(),
        })
    }

    /// Find, read and parse the configuration file
    pub async fn load(&self, explicit: Option<&Path>) -> CodegenResult<LoadedConfig> {
        let path = self.find(explicit)?;
        let format = ConfigFormat::from_path(&path)?;
        info!("Loading configuration from {:?}", path);

        let content = tokio::fs::read_to_string(&path).await?;
        let raw = format
            .parse(&content)
            .map_err(|message| CodegenError::ConfigParse {
                path: path.clone(),
                message,
            })?;

        Ok(LoadedConfig { path, format, raw })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Expand `~` and environment variables in a path string
pub fn expand_path(path: &str) -> CodegenResult<PathBuf> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| CodegenError::PathExpansion {
            path: path.to_string(),
            message: e.to_string(),
        })
}
