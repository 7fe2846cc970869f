//! Structural validation of raw configuration values
//!
//! The raw value comes from an external loader (JSON or YAML). Validation
//! never coerces types and never stops at the first problem: every issue in
//! the document is collected so the user can fix them in one pass.

use serde_json::{Map, Value};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::{Configuration, DependencyRef, GeneratorEntry};
use crate::error::{IssueKind, RealizeError, ValidationIssue};
use crate::preset::{InputType, Keyword, Language, OptionDefault, Preset, Protocol};

const ROOT_KEYS: &[&str] = &["inputType", "inputPath", "language", "generators", "telemetry"];

/// Keys with dedicated meaning on a generator entry; everything else is an option
const ENTRY_KEYS: &[&str] = &["id", "preset", "language", "outputPath", "dependencies"];

/// Validate a raw configuration and apply documented defaults
pub fn validate(raw: &Value) -> Result<Configuration, RealizeError> {
    let mut validator = Validator::default();
    let configuration = validator.configuration(raw);

    match configuration {
        Some(configuration) if validator.issues.is_empty() => {
            debug!(
                generators = configuration.generators.len(),
                "Configuration passed structural validation"
            );
            Ok(configuration)
        }
        _ => Err(RealizeError::Validation(validator.issues)),
    }
}

/// JSON type name as it appears in messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn child(parent: &str, segment: impl Display) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

#[derive(Default)]
struct Validator {
    issues: Vec<ValidationIssue>,
}

impl Validator {
    fn push(&mut self, path: impl Into<String>, kind: IssueKind) {
        self.issues.push(ValidationIssue::new(path, kind));
    }

    fn configuration(&mut self, raw: &Value) -> Option<Configuration> {
        let Some(root) = raw.as_object() else {
            self.push(
                "",
                IssueKind::InvalidType {
                    expected: "object",
                    received: type_name(raw),
                },
            );
            return None;
        };

        for key in root.keys().filter(|key| !ROOT_KEYS.contains(&key.as_str())) {
            warn!(key = %key, "Ignoring unknown configuration key");
        }

        let input_type = self.required_keyword::<InputType>(root, "", "inputType");
        let input_path = self.required_string(root, "", "inputPath");
        let language = match root.get("language") {
            Some(value) => self.keyword::<Language>(value, "language"),
            None => Some(Language::default()),
        };
        let telemetry = match root.get("telemetry") {
            Some(Value::Object(telemetry)) => Some(Some(telemetry.clone())),
            Some(other) => {
                self.push(
                    "telemetry",
                    IssueKind::InvalidType {
                        expected: "object",
                        received: type_name(other),
                    },
                );
                None
            }
            None => Some(None),
        };

        // An invalid root language still lets entries be checked against a fallback
        let default_language = language.unwrap_or_default();
        let generators = match root.get("generators") {
            Some(Value::Array(items)) => {
                let entries: Vec<Option<GeneratorEntry>> = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        self.generator(item, &child("generators", index), default_language)
                    })
                    .collect();
                entries.into_iter().collect::<Option<Vec<_>>>()
            }
            Some(other) => {
                self.push(
                    "generators",
                    IssueKind::InvalidType {
                        expected: "array",
                        received: type_name(other),
                    },
                );
                None
            }
            None => {
                self.push("generators", IssueKind::Missing { expected: "array" });
                None
            }
        };

        Some(Configuration {
            input_type: input_type?,
            input_path: input_path?,
            language: language?,
            generators: generators?,
            telemetry: telemetry?,
        })
    }

    fn generator(
        &mut self,
        value: &Value,
        path: &str,
        default_language: Language,
    ) -> Option<GeneratorEntry> {
        let Some(object) = value.as_object() else {
            self.push(
                path,
                IssueKind::InvalidType {
                    expected: "object",
                    received: type_name(value),
                },
            );
            return None;
        };
        let issues_before = self.issues.len();

        let preset = self.required_keyword::<Preset>(object, path, "preset");
        let id = match object.get("id") {
            Some(value) => self.string(value, &child(path, "id")).map(Some),
            None => Some(None),
        };
        let language = match object.get("language") {
            Some(value) => self.keyword::<Language>(value, &child(path, "language")),
            None => Some(default_language),
        };
        let output_path =
            self.output_path(object, path, preset, language.unwrap_or(default_language));
        let dependencies = self.dependencies(object, path);

        if let (Some(preset), Some(language)) = (preset, language) {
            self.preset_options(object, path, preset, language);
        }

        if self.issues.len() != issues_before {
            return None;
        }

        let options: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| !ENTRY_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(GeneratorEntry {
            id: id?,
            preset: preset?,
            language: language?,
            output_path: output_path?,
            dependencies: dependencies?,
            options,
        })
    }

    fn output_path(
        &mut self,
        object: &Map<String, Value>,
        path: &str,
        preset: Option<Preset>,
        language: Language,
    ) -> Option<PathBuf> {
        let field = child(path, "outputPath");
        match object.get("outputPath") {
            Some(value) => self.string(value, &field).map(PathBuf::from),
            None => {
                // Without a valid preset there is no default to report against
                let preset = preset?;
                match preset.default_output_path(language) {
                    Some(default) => Some(PathBuf::from(default)),
                    None => {
                        self.push(field, IssueKind::Missing { expected: "string" });
                        None
                    }
                }
            }
        }
    }

    fn dependencies(
        &mut self,
        object: &Map<String, Value>,
        path: &str,
    ) -> Option<Vec<DependencyRef>> {
        let field = child(path, "dependencies");
        match object.get("dependencies") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    self.string(item, &child(&field, index))
                        .map(DependencyRef::Named)
                })
                .collect::<Vec<_>>()
                .into_iter()
                .collect(),
            Some(other) => {
                self.push(
                    field,
                    IssueKind::InvalidType {
                        expected: "array",
                        received: type_name(other),
                    },
                );
                None
            }
            None => Some(Vec::new()),
        }
    }

    /// Type-check the options a preset supplies defaults for
    fn preset_options(
        &mut self,
        object: &Map<String, Value>,
        path: &str,
        preset: Preset,
        language: Language,
    ) {
        for option in preset.default_options(language) {
            let Some(value) = object.get(option.key) else {
                continue;
            };
            let field = child(path, option.key);
            match option.default {
                OptionDefault::Flag(_) => self.typed(value, &field, "boolean", Value::is_boolean),
                OptionDefault::Text(_) => {
                    self.string(value, &field);
                }
                OptionDefault::Choice { choices, .. } => {
                    if !value.as_str().is_some_and(|text| choices.contains(&text)) {
                        self.push(field, IssueKind::InvalidValue { expected: choices });
                    }
                }
                OptionDefault::EmptyObject => {
                    self.typed(value, &field, "object", Value::is_object)
                }
                OptionDefault::Protocols(_) => self.protocols(value, &field),
            }
        }
    }

    fn typed(&mut self, value: &Value, path: &str, expected: &'static str, check: fn(&Value) -> bool) {
        if !check(value) {
            self.push(
                path,
                IssueKind::InvalidType {
                    expected,
                    received: type_name(value),
                },
            );
        }
    }

    fn protocols(&mut self, value: &Value, path: &str) {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.keyword::<Protocol>(item, &child(path, index));
                }
            }
            other => self.push(
                path,
                IssueKind::InvalidType {
                    expected: "array",
                    received: type_name(other),
                },
            ),
        }
    }

    fn required_keyword<K: Keyword>(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<K> {
        let path = child(parent, key);
        match object.get(key) {
            Some(value) => self.keyword(value, &path),
            None => {
                self.push(path, IssueKind::Missing { expected: "string" });
                None
            }
        }
    }

    fn required_string(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<String> {
        let path = child(parent, key);
        match object.get(key) {
            Some(value) => self.string(value, &path),
            None => {
                self.push(path, IssueKind::Missing { expected: "string" });
                None
            }
        }
    }

    fn keyword<K: Keyword>(&mut self, value: &Value, path: &str) -> Option<K> {
        let parsed = value.as_str().and_then(K::parse);
        if parsed.is_none() {
            self.push(path, IssueKind::InvalidValue { expected: K::NAMES });
        }
        parsed
    }

    fn string(&mut self, value: &Value, path: &str) -> Option<String> {
        match value {
            Value::String(text) if text.is_empty() => {
                self.push(path, IssueKind::EmptyString);
                None
            }
            Value::String(text) => Some(text.clone()),
            other => {
                self.push(
                    path,
                    IssueKind::InvalidType {
                        expected: "string",
                        received: type_name(other),
                    },
                );
                None
            }
        }
    }
}
