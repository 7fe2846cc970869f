//! Typed configuration produced by the schema validator

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::preset::{InputType, Language, Preset};

/// Root configuration with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Kind of input document
    pub input_type: InputType,

    /// Path or URL of the input document
    pub input_path: String,

    /// Default language for generators that omit one
    pub language: Language,

    /// Requested generators, in declaration order
    pub generators: Vec<GeneratorEntry>,

    /// Telemetry override, carried through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Map<String, Value>>,
}

/// Reference from one generator entry to another it depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DependencyRef {
    /// Identifier as written in the configuration, resolved against final ids
    Named(String),

    /// Position of an entry in the expanded generator list
    Entry(usize),
}

/// One requested generation unit before identifiers are resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub preset: Preset,

    pub language: Language,

    pub output_path: PathBuf,

    pub dependencies: Vec<DependencyRef>,

    /// Preset-specific fields, kept verbatim
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl GeneratorEntry {
    /// Create an entry with no id, dependencies or options
    pub fn new(preset: Preset, language: Language, output_path: impl Into<PathBuf>) -> Self {
        Self {
            id: None,
            preset,
            language,
            output_path: output_path.into(),
            dependencies: Vec::new(),
            options: Map::new(),
        }
    }

    /// Identifier this entry receives when none is declared
    pub fn default_id(&self) -> String {
        format!("{}-{}", self.preset, self.language)
    }

    /// Declared id, or the default one
    pub fn base_id(&self) -> String {
        self.id.clone().unwrap_or_else(|| self.default_id())
    }
}

/// A generator entry with its final, unique identifier and resolved dependencies
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    pub id: String,

    pub preset: Preset,

    pub language: Language,

    pub output_path: PathBuf,

    /// Identifiers of the entries that must run first
    pub dependencies: Vec<String>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl From<ResolvedEntry> for GeneratorEntry {
    fn from(entry: ResolvedEntry) -> Self {
        Self {
            id: Some(entry.id),
            preset: entry.preset,
            language: entry.language,
            output_path: entry.output_path,
            dependencies: entry
                .dependencies
                .into_iter()
                .map(DependencyRef::Named)
                .collect(),
            options: entry.options,
        }
    }
}
