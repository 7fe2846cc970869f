//! Execution plan assembly

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{Configuration, ResolvedEntry};
use crate::error::RealizeError;
use crate::expand::expand;
use crate::graph::order;
use crate::identifier::resolve_ids;
use crate::preset::{InputType, Language};
use crate::validation::validate;

/// Ordered, fully resolved generator entries ready for dispatch.
///
/// Every dependency of an entry appears at an earlier position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    pub input_type: InputType,
    pub input_path: String,
    pub language: Language,
    pub generators: Vec<ResolvedEntry>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedEntry> {
        self.generators.iter()
    }

    /// Entry identifiers in execution order
    pub fn ids(&self) -> Vec<&str> {
        self.generators.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedEntry> {
        self.generators.iter().find(|entry| entry.id == id)
    }

    /// Execution position of an entry
    pub fn position(&self, id: &str) -> Option<usize> {
        self.generators.iter().position(|entry| entry.id == id)
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a ResolvedEntry;
    type IntoIter = std::slice::Iter<'a, ResolvedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Turn a raw configuration value into an execution plan.
///
/// Stages run in a fixed order (validate, expand, resolve ids, order) and the
/// first failing stage ends the pipeline with its complete error set.
pub fn realize(raw: &Value) -> Result<ExecutionPlan, RealizeError> {
    let configuration = validate(raw)?;
    realize_configuration(&configuration)
}

/// Realize an already validated configuration
pub fn realize_configuration(configuration: &Configuration) -> Result<ExecutionPlan, RealizeError> {
    let expanded = expand(configuration.input_type, &configuration.generators)?;
    let resolved = resolve_ids(expanded);
    let generators = order(resolved)?;

    debug!(
        input_type = %configuration.input_type,
        generators = generators.len(),
        "Realized execution plan"
    );

    Ok(ExecutionPlan {
        input_type: configuration.input_type,
        input_path: configuration.input_path.clone(),
        language: configuration.language,
        generators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Preset;
    use serde_json::json;

    #[test]
    fn test_channels_scenario() {
        let raw = json!({
            "inputType": "asyncapi",
            "inputPath": "x.json",
            "language": "typescript",
            "generators": [
                { "preset": "channels", "outputPath": "./out", "protocols": ["nats"] }
            ]
        });

        let plan = realize(&raw).unwrap();
        assert_eq!(
            plan.ids(),
            vec![
                "payloads-typescript",
                "parameters-typescript",
                "headers-typescript",
                "channels-typescript"
            ]
        );
        assert!(plan.generators[0].dependencies.is_empty());
        for window in plan.generators.windows(2) {
            assert_eq!(window[1].dependencies, vec![window[0].id.clone()]);
        }
        assert_eq!(plan.get("channels-typescript").unwrap().options["protocols"], json!(["nats"]));
    }

    #[test]
    fn test_validation_failure_stops_before_ordering() {
        // The cycle is never reported because validation fails first
        let raw = json!({
            "inputType": "asyncapi",
            "inputPath": 5,
            "generators": [
                { "id": "a", "preset": "payloads", "dependencies": ["b"] },
                { "id": "b", "preset": "payloads", "dependencies": ["a"] }
            ]
        });

        let error = realize(&raw).unwrap_err();
        assert!(matches!(error, RealizeError::Validation(_)));
    }

    #[test]
    fn test_user_dependency_on_implied_entry() {
        let raw = json!({
            "inputType": "asyncapi",
            "inputPath": "x.json",
            "generators": [
                { "preset": "custom", "outputPath": "./docs", "dependencies": ["channels-typescript"] },
                { "preset": "channels" }
            ]
        });

        let plan = realize(&raw).unwrap();
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.generators.last().unwrap().preset, Preset::Custom);
        assert!(plan.position("channels-typescript") < plan.position("custom-typescript"));
    }

    #[test]
    fn test_empty_generator_list() {
        let raw = json!({ "inputType": "openapi", "inputPath": "api.yaml", "generators": [] });
        let plan = realize(&raw).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.input_path, "api.yaml");
    }
}
