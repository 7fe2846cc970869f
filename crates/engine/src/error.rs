//! Structured errors reported by configuration realization

use std::fmt;

use crate::preset::{quoted_choices, InputType, Keyword, Language, Preset};

/// Stable error codes for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigValidation,
    InvalidPreset,
    MissingDependency,
    CircularDependency,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigValidation => "CONFIG_VALIDATION_ERROR",
            ErrorKind::InvalidPreset => "INVALID_PRESET",
            ErrorKind::MissingDependency => "MISSING_DEPENDENCY",
            ErrorKind::CircularDependency => "CIRCULAR_DEPENDENCY",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is wrong with a single configuration field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Value has the wrong JSON type
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },

    /// Value is not one of the accepted keywords
    InvalidValue { expected: &'static [&'static str] },

    /// Required field is absent
    Missing { expected: &'static str },

    /// String field is present but empty
    EmptyString,
}

/// One structural problem, located by its dot-joined field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            IssueKind::InvalidType { expected, received } => {
                write!(f, "Invalid type at \"{path}\". Expected {expected}, got {received}")
            }
            IssueKind::InvalidValue { expected } => write!(
                f,
                "Invalid value at \"{path}\". Expected: {}",
                quoted_choices(expected)
            ),
            IssueKind::Missing { expected } => {
                write!(f, "Missing required field at \"{path}\". Expected {expected}")
            }
            IssueKind::EmptyString => {
                write!(f, "Invalid value at \"{path}\". Expected a non-empty string")
            }
        }
    }
}

/// Which half of the support matrix an entry falls outside of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    InputType(InputType),
    Language(Language),
}

/// A recognized preset used with an input type or language it cannot serve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedCombination {
    /// Field path of the offending entry, e.g. `generators.1`
    pub path: String,
    pub preset: Preset,
    pub unsupported: Unsupported,
}

impl fmt::Display for UnsupportedCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unsupported {
            Unsupported::InputType(input_type) => write!(
                f,
                "Invalid preset '{}' for input type '{}' at \"{}\"",
                self.preset, input_type, self.path
            ),
            Unsupported::Language(language) => write!(
                f,
                "Invalid preset '{}' for language '{}' at \"{}\"",
                self.preset, language, self.path
            ),
        }
    }
}

/// A dependency naming an identifier no entry in the plan carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub generator: String,
    pub dependency: String,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generator '{}' depends on '{}', which no generator produces",
            self.generator, self.dependency
        )
    }
}

fn join_keywords<K: Keyword>(keywords: impl IntoIterator<Item = K>) -> String {
    keywords
        .into_iter()
        .map(Keyword::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors surfaced by `realize`; each aborts the run with no partial plan
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RealizeError {
    #[error("Configuration validation failed")]
    Validation(Vec<ValidationIssue>),

    #[error("Configuration uses presets that are not supported for its input type or language")]
    UnsupportedCombination(Vec<UnsupportedCombination>),

    #[error("Missing dependency output")]
    MissingDependency(Vec<MissingDependency>),

    #[error("Circular dependency between generators: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },
}

impl RealizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RealizeError::Validation(_) => ErrorKind::ConfigValidation,
            RealizeError::UnsupportedCombination(_) => ErrorKind::InvalidPreset,
            RealizeError::MissingDependency(_) => ErrorKind::MissingDependency,
            RealizeError::CircularDependency { .. } => ErrorKind::CircularDependency,
        }
    }

    /// Validation issues, empty for every other kind
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            RealizeError::Validation(issues) => issues.as_slice(),
            _ => &[],
        }
    }

    /// One line per underlying problem
    pub fn details(&self) -> Option<String> {
        let lines: Vec<String> = match self {
            RealizeError::Validation(issues) => issues.iter().map(ToString::to_string).collect(),
            RealizeError::UnsupportedCombination(combinations) => combinations
                .iter()
                .map(|combination| {
                    let preset = combination.preset;
                    match combination.unsupported {
                        Unsupported::InputType(_) => format!(
                            "{combination} (preset '{preset}' supports input types: {})",
                            join_keywords(preset.supported_inputs().iter().copied())
                        ),
                        Unsupported::Language(_) => format!(
                            "{combination} (preset '{preset}' supports languages: {})",
                            join_keywords(preset.supported_languages())
                        ),
                    }
                })
                .collect(),
            RealizeError::MissingDependency(missing) => {
                missing.iter().map(ToString::to_string).collect()
            }
            RealizeError::CircularDependency { cycle } => {
                vec![format!("Dependency cycle: {}", cycle.join(" -> "))]
            }
        };

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    pub fn help(&self) -> Option<String> {
        let help = match self {
            RealizeError::Validation(_) => {
                "Review and fix the validation errors in your configuration file."
            }
            RealizeError::UnsupportedCombination(_) => {
                "Use a preset that supports the configured input type and language,\nor change the generator's language."
            }
            RealizeError::MissingDependency(_) => {
                "Every identifier in 'dependencies' must be the id of another generator.\nIds without an explicit 'id' default to '<preset>-<language>'."
            }
            RealizeError::CircularDependency { .. } => {
                "Remove one of the dependencies in the cycle so the generators can be ordered."
            }
        };
        Some(help.to_string())
    }

    /// Render message, details and help for terminal display
    pub fn format(&self) -> String {
        let mut output = format!("Error [{}]: {}", self.kind(), self);

        if let Some(details) = self.details() {
            output.push_str("\n\nDetails:\n");
            output.push_str(&details);
        }

        if let Some(help) = self.help() {
            output.push_str("\n\nHow to fix:\n");
            output.push_str(&help);
        }

        output
    }
}
