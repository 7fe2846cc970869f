//! Init command implementation

use crate::engine::{realize, InputType, Keyword, Language, Preset, Protocol};
use crate::utils::ensure_directory;
use crate::CodegenError;
use anyhow::{anyhow, bail, Result};
use clap::builder::PossibleValuesParser;
use clap::{ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output directory for custom generators, which have no preset default
const CUSTOM_OUTPUT_PATH: &str = "src/__gen__/custom";

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path (.json writes JSON, anything else YAML)")
                .value_name("FILE")
                .default_value("codegen.yaml"),
        )
        .arg(
            clap::Arg::new("input-type")
                .long("input-type")
                .help("Type of the input document")
                .value_parser(PossibleValuesParser::new(InputType::NAMES.iter().copied()))
                .default_value("asyncapi"),
        )
        .arg(
            clap::Arg::new("input-path")
                .long("input-path")
                .help("Path or URL of the input document")
                .value_name("PATH")
                .default_value("./asyncapi.json"),
        )
        .arg(
            clap::Arg::new("language")
                .short('l')
                .long("language")
                .help("Target language")
                .value_parser(PossibleValuesParser::new(Language::NAMES.iter().copied()))
                .default_value("typescript"),
        )
        .arg(
            clap::Arg::new("preset")
                .short('p')
                .long("preset")
                .help("Generator preset to include (repeatable)")
                .value_parser(PossibleValuesParser::new(Preset::NAMES.iter().copied()))
                .action(ArgAction::Append)
                .default_value("payloads"),
        )
        .arg(
            clap::Arg::new("protocol")
                .long("protocol")
                .help("Protocol for channels and client presets (repeatable)")
                .value_parser(PossibleValuesParser::new(Protocol::NAMES.iter().copied()))
                .action(ArgAction::Append)
                .default_value("nats"),
        )
        .arg(
            clap::Arg::new("force")
                .long("force")
                .help("Overwrite an existing file")
                .action(ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing output path"))?;

    if output_path.exists() && !matches.get_flag("force") {
        bail!(
            "Configuration file already exists: {:?}. Use --force to overwrite it",
            output_path
        );
    }

    let starter = StarterConfig {
        input_type: keyword(matches, "input-type")?,
        input_path: matches
            .get_one::<String>("input-path")
            .cloned()
            .unwrap_or_default(),
        language: keyword(matches, "language")?,
        generators: Vec::new(),
    }
    .with_presets(&keywords(matches, "preset")?, &keywords(matches, "protocol")?);

    info!("Initializing configuration file: {:?}", output_path);

    // Refuse to write a starter that would not realize
    let plan = realize(&serde_json::to_value(&starter)?).map_err(CodegenError::from)?;

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    tokio::fs::write(&output_path, starter.render(&output_path)?).await?;

    info!("Configuration file created: {:?}", output_path);
    println!(
        "Configuration file created: {} ({} generators after expansion)",
        output_path.display(),
        plan.len()
    );
    println!("Edit the file to point inputPath at your document and adjust the generators.");

    Ok(())
}

fn keyword<K: Keyword>(matches: &ArgMatches, name: &str) -> Result<K> {
    let value = matches
        .get_one::<String>(name)
        .ok_or_else(|| anyhow!("Missing value for --{name}"))?;
    K::parse(value).ok_or_else(|| anyhow!("Invalid value for --{name}: {value}"))
}

fn keywords<K: Keyword>(matches: &ArgMatches, name: &str) -> Result<Vec<K>> {
    matches
        .get_many::<String>(name)
        .into_iter()
        .flatten()
        .map(|value| K::parse(value).ok_or_else(|| anyhow!("Invalid value for --{name}: {value}")))
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StarterConfig {
    input_type: InputType,
    input_path: String,
    language: Language,
    generators: Vec<StarterGenerator>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StarterGenerator {
    preset: Preset,
    output_path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    protocols: Vec<Protocol>,
}

impl StarterConfig {
    fn with_presets(mut self, presets: &[Preset], protocols: &[Protocol]) -> Self {
        for &preset in presets {
            if self.generators.iter().any(|generator| generator.preset == preset) {
                continue;
            }
            self.generators.push(StarterGenerator {
                preset,
                output_path: preset
                    .default_output_path(self.language)
                    .unwrap_or(CUSTOM_OUTPUT_PATH)
                    .to_string(),
                protocols: if preset.accepts_protocols() {
                    protocols.to_vec()
                } else {
                    Vec::new()
                },
            });
        }
        self
    }

    fn render(&self, path: &Path) -> Result<String> {
        if path.extension().is_some_and(|extension| extension == "json") {
            Ok(serde_json::to_string_pretty(self)? + "\n")
        } else {
            Ok(serde_yaml::to_string(self)?)
        }
    }
}
