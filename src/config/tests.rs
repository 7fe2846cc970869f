//! Configuration loading tests

use super::*;
use crate::{Codegen, CodegenError};
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const YAML_CONFIG: &str = r#"
inputType: asyncapi
inputPath: ./asyncapi.json
generators:
  - preset: channels
    outputPath: ./src/__gen__/channels
    protocols: [nats]
"#;

const JSON_CONFIG: &str = r#"{
  "inputType": "openapi",
  "inputPath": "openapi.yaml",
  "generators": [{ "preset": "payloads", "language": "java" }]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[rstest]
#[case("codegen.json", ConfigFormat::Json)]
#[case("codegen.yaml", ConfigFormat::Yaml)]
#[case("codegen.yml", ConfigFormat::Yaml)]
#[case("codegen", ConfigFormat::Yaml)]
fn test_format_from_extension(#[case] file: &str, #[case] expected: ConfigFormat) {
    assert_eq!(ConfigFormat::from_path(Path::new(file)).unwrap(), expected);
}

#[rstest]
#[case("codegen.config.ts")]
#[case("codegen.config.mjs")]
#[case("codegen.js")]
fn test_script_configs_are_unsupported(#[case] file: &str) {
    assert!(matches!(
        ConfigFormat::from_path(Path::new(file)),
        Err(CodegenError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_search_order_prefers_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "codegen.yaml", YAML_CONFIG);
    let json = write(dir.path(), "codegen.json", JSON_CONFIG);

    let loader = ConfigLoader::new(dir.path());
    assert_eq!(loader.find(None).unwrap(), json);
}

#[test]
fn test_search_reports_every_place() {
    let dir = TempDir::new().unwrap();
    let loader = ConfigLoader::new(dir.path());

    let error = loader.find(None).unwrap_err();
    let CodegenError::NoConfigFound { searched, .. } = &error else {
        panic!("expected NoConfigFound, got {error:?}");
    };
    assert_eq!(searched.len(), SEARCH_PLACES.len());
    assert!(error.format().contains("codegen init"));
}

#[test]
fn test_explicit_path_bypasses_search() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "codegen.json", JSON_CONFIG);
    let custom = write(dir.path(), "custom.yaml", YAML_CONFIG);

    let loader = ConfigLoader::new(dir.path());
    assert_eq!(loader.find(Some(Path::new("custom.yaml"))).unwrap(), custom);
    assert!(matches!(
        loader.find(Some(Path::new("missing.yaml"))),
        Err(CodegenError::ConfigFileNotFound { .. })
    ));
}

#[tokio::test]
async fn test_load_yaml_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "codegen.yaml", YAML_CONFIG);

    let loaded = ConfigLoader::new(dir.path()).load(None).await.unwrap();
    assert_eq!(loaded.format, ConfigFormat::Yaml);
    assert_eq!(loaded.raw["inputType"], "asyncapi");
    assert_eq!(loaded.raw["generators"][0]["protocols"][0], "nats");
}

#[tokio::test]
async fn test_load_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "codegen.json", "{ not json");

    let error = ConfigLoader::new(dir.path()).load(None).await.unwrap_err();
    assert!(matches!(error, CodegenError::ConfigParse { .. }));
}

#[tokio::test]
async fn test_realize_resolves_document_relative_to_config() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "codegen.yaml", YAML_CONFIG);

    let context = Codegen::new(dir.path()).realize(None).await.unwrap();
    assert_eq!(context.plan.len(), 4);
    assert_eq!(context.config_dir(), dir.path());
    assert_eq!(
        context.document,
        DocumentSource::File(dir.path().join("./asyncapi.json"))
    );
}

#[tokio::test]
async fn test_realize_surfaces_engine_errors() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "codegen.json",
        r#"{ "inputType": "openapi", "inputPath": "a.yaml", "generators": [{ "preset": "client" }] }"#,
    );

    let error = Codegen::new(dir.path()).realize(None).await.unwrap_err();
    assert_eq!(error.code(), "INVALID_PRESET");
    assert!(error.format().starts_with("Error [INVALID_PRESET]"));
}

#[test]
fn test_document_source_resolution() {
    let config_file = Path::new("/work/project/codegen.yaml");

    assert_eq!(
        DocumentSource::resolve("https://example.com/asyncapi.json", config_file).unwrap(),
        DocumentSource::Url("https://example.com/asyncapi.json".to_string())
    );
    assert_eq!(
        DocumentSource::resolve("/specs/api.yaml", config_file).unwrap(),
        DocumentSource::File(PathBuf::from("/specs/api.yaml"))
    );
    assert_eq!(
        DocumentSource::resolve("specs/api.yaml", config_file).unwrap(),
        DocumentSource::File(PathBuf::from("/work/project/specs/api.yaml"))
    );
}
