//! Presets, languages, input types and the support matrix between them

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

/// A closed set of string keywords accepted in the configuration.
///
/// Spellings come from the strum derives, which mirror the serde renames.
pub trait Keyword:
    Copy + FromStr + VariantNames + Into<&'static str> + 'static
{
    /// Every accepted spelling, in declaration order
    const NAMES: &'static [&'static str] = Self::VARIANTS;

    /// Parse a keyword, returning `None` for unknown spellings
    fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }

    /// The configuration spelling of this keyword
    fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Kind of input document the generators read from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, IntoStaticStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InputType {
    Asyncapi,
    Openapi,
    Jsonschema,
}

/// Target language of a generator
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
    Display, EnumString, IntoStaticStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    Typescript,
    Java,
    Csharp,
}

/// Messaging protocol a channel-oriented generator emits adapters for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, IntoStaticStr, VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Protocol {
    Nats,
    Kafka,
    Mqtt,
    Amqp,
    Websocket,
    HttpClient,
    EventSource,
}

/// Category of generator behavior
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
    Display, EnumString, IntoStaticStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    Payloads,
    Parameters,
    Headers,
    Types,
    Channels,
    Client,
    Models,
    Custom,
}

impl Keyword for InputType {}
impl Keyword for Language {}
impl Keyword for Protocol {}
impl Keyword for Preset {}

/// Default value of a preset option, which also fixes the type the option must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    Flag(bool),
    Text(&'static str),
    Choice {
        value: &'static str,
        choices: &'static [&'static str],
    },
    EmptyObject,
    Protocols(&'static [Protocol]),
}

impl OptionDefault {
    pub fn to_value(self) -> Value {
        match self {
            OptionDefault::Flag(flag) => Value::Bool(flag),
            OptionDefault::Text(text) | OptionDefault::Choice { value: text, .. } => {
                Value::String(text.to_string())
            }
            OptionDefault::EmptyObject => Value::Object(Map::new()),
            OptionDefault::Protocols(protocols) => Value::Array(
                protocols
                    .iter()
                    .map(|protocol| Value::String(protocol.as_str().to_string()))
                    .collect(),
            ),
        }
    }
}

/// An option key a preset fills in when the entry leaves it out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetOption {
    pub key: &'static str,
    pub default: OptionDefault,
}

const fn option(key: &'static str, default: OptionDefault) -> PresetOption {
    PresetOption { key, default }
}

const SERIALIZATION_TYPE: PresetOption = option(
    "serializationType",
    OptionDefault::Choice {
        value: "json",
        choices: &["json"],
    },
);

const NATS: PresetOption = option("protocols", OptionDefault::Protocols(&[Protocol::Nats]));

const TYPESCRIPT_PAYLOADS: &[PresetOption] = &[
    SERIALIZATION_TYPE,
    option(
        "enum",
        OptionDefault::Choice {
            value: "enum",
            choices: &["enum", "union"],
        },
    ),
    option(
        "map",
        OptionDefault::Choice {
            value: "record",
            choices: &["indexedObject", "map", "record"],
        },
    ),
    option("useForJavaScript", OptionDefault::Flag(true)),
    option("includeValidation", OptionDefault::Flag(true)),
    option("rawPropertyNames", OptionDefault::Flag(false)),
];

const JAVA_PAYLOADS: &[PresetOption] = &[
    SERIALIZATION_TYPE,
    option("packageName", OptionDefault::Text("the.codegen.project")),
];

const CSHARP_PAYLOADS: &[PresetOption] = &[
    SERIALIZATION_TYPE,
    option(
        "serializationLibrary",
        OptionDefault::Choice {
            value: "newtonsoft",
            choices: &["newtonsoft", "json"],
        },
    ),
    option("namespace", OptionDefault::Text("__gen__.payloads")),
];

const SERIALIZED: &[PresetOption] = &[SERIALIZATION_TYPE];

const CHANNELS: &[PresetOption] = &[
    NATS,
    option("asyncapiReverseOperations", OptionDefault::Flag(false)),
    option("asyncapiGenerateForOperations", OptionDefault::Flag(true)),
    option("functionTypeMapping", OptionDefault::EmptyObject),
];

const CLIENT: &[PresetOption] = &[NATS];

const MESSAGE_INPUTS: &[InputType] = &[InputType::Asyncapi, InputType::Openapi];
const ASYNCAPI_ONLY: &[InputType] = &[InputType::Asyncapi];
const ALL_INPUTS: &[InputType] = &[InputType::Asyncapi, InputType::Openapi, InputType::Jsonschema];

impl Preset {
    /// Presets that must run before this one, in execution order.
    ///
    /// Composite presets are sugar for these sub-pipelines; the composite
    /// entry itself always comes last and depends on the final element.
    pub fn implied_chain(self) -> &'static [Preset] {
        match self {
            Preset::Channels => &[Preset::Payloads, Preset::Parameters, Preset::Headers],
            Preset::Client => &[
                Preset::Payloads,
                Preset::Parameters,
                Preset::Headers,
                Preset::Channels,
            ],
            Preset::Payloads
            | Preset::Parameters
            | Preset::Headers
            | Preset::Types
            | Preset::Models
            | Preset::Custom => &[],
        }
    }

    /// Input document kinds this preset can generate from
    pub fn supported_inputs(self) -> &'static [InputType] {
        match self {
            Preset::Payloads | Preset::Parameters | Preset::Headers | Preset::Types => {
                MESSAGE_INPUTS
            }
            Preset::Channels | Preset::Client => ASYNCAPI_ONLY,
            Preset::Models | Preset::Custom => ALL_INPUTS,
        }
    }

    pub fn supports_input(self, input_type: InputType) -> bool {
        self.supported_inputs().contains(&input_type)
    }

    /// Languages this preset can generate, in declaration order
    pub fn supported_languages(self) -> Vec<Language> {
        Language::NAMES
            .iter()
            .filter_map(|name| Language::parse(name))
            .filter(|&language| self.supports_language(language))
            .collect()
    }

    pub fn supports_language(self, language: Language) -> bool {
        match self {
            Preset::Custom => true,
            Preset::Payloads => matches!(
                language,
                Language::Typescript | Language::Java | Language::Csharp
            ),
            Preset::Parameters
            | Preset::Headers
            | Preset::Types
            | Preset::Channels
            | Preset::Client
            | Preset::Models => language == Language::Typescript,
        }
    }

    /// Output path used when an entry omits `outputPath`.
    /// Custom generators have no default and must declare one.
    pub fn default_output_path(self, language: Language) -> Option<&'static str> {
        match (self, language) {
            (Preset::Payloads, Language::Java) => {
                Some("./target/generated-sources/the/codegen/project")
            }
            (Preset::Payloads, Language::Csharp) => Some("__gen__/payloads"),
            (Preset::Payloads, Language::Typescript) => Some("src/__gen__/payloads"),
            (Preset::Parameters, _) => Some("src/__gen__/parameters"),
            (Preset::Headers, _) => Some("src/__gen__/headers"),
            (Preset::Types, _) => Some("src/__gen__"),
            (Preset::Channels, _) => Some("src/__gen__/channels"),
            (Preset::Client, _) => Some("src/__gen__/clients"),
            (Preset::Models, _) => Some("src/__gen__/models"),
            (Preset::Custom, _) => None,
        }
    }

    /// Option defaults filled in for entries of this preset and language
    pub fn default_options(self, language: Language) -> &'static [PresetOption] {
        match (self, language) {
            (Preset::Payloads, Language::Typescript) => TYPESCRIPT_PAYLOADS,
            (Preset::Payloads, Language::Java) => JAVA_PAYLOADS,
            (Preset::Payloads, Language::Csharp) => CSHARP_PAYLOADS,
            (Preset::Parameters | Preset::Headers, _) => SERIALIZED,
            (Preset::Channels, _) => CHANNELS,
            (Preset::Client, _) => CLIENT,
            (Preset::Types | Preset::Models | Preset::Custom, _) => &[],
        }
    }

    /// Merge the preset defaults under `options`; keys already present win
    pub fn apply_defaults(self, language: Language, options: &mut Map<String, Value>) {
        for option in self.default_options(language) {
            options
                .entry(option.key)
                .or_insert_with(|| option.default.to_value());
        }
    }

    /// Directory name a synthesized entry of this preset gets below its composite
    pub fn subdirectory(self) -> &'static str {
        match self {
            Preset::Payloads => "payload",
            Preset::Parameters => "parameter",
            Preset::Headers => "header",
            Preset::Types => "types",
            Preset::Channels => "channels",
            Preset::Client => "client",
            Preset::Models => "models",
            Preset::Custom => "custom",
        }
    }

    /// Whether entries of this preset may carry a `protocols` list
    pub fn accepts_protocols(self) -> bool {
        matches!(self, Preset::Channels | Preset::Client)
    }
}

/// Render keyword choices the way validation messages quote them: `'a' | 'b'`
pub fn quoted_choices(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}
