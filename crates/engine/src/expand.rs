//! Expansion of composite presets into their implied sub-generators

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::config::{DependencyRef, GeneratorEntry};
use crate::error::{RealizeError, Unsupported, UnsupportedCombination};
use crate::preset::{InputType, Language, Preset};

/// Where an entry of the expanded list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Declared(usize),
    Synthesized(usize),
}

/// An implied entry created for a composite
struct Synthesized {
    /// Declared entry this one is placed in front of
    owner: usize,
    entry: GeneratorEntry,
    predecessor: Option<Slot>,
}

/// Check every entry against the support matrix for `input_type`
pub fn check_support(
    input_type: InputType,
    entries: &[GeneratorEntry],
) -> Result<(), RealizeError> {
    let mut unsupported = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let path = format!("generators.{index}");
        if !entry.preset.supports_input(input_type) {
            unsupported.push(UnsupportedCombination {
                path: path.clone(),
                preset: entry.preset,
                unsupported: Unsupported::InputType(input_type),
            });
        }
        if !entry.preset.supports_language(entry.language) {
            unsupported.push(UnsupportedCombination {
                path,
                preset: entry.preset,
                unsupported: Unsupported::Language(entry.language),
            });
        }
    }

    if unsupported.is_empty() {
        Ok(())
    } else {
        Err(RealizeError::UnsupportedCombination(unsupported))
    }
}

/// Expand composite presets into the full list of generator entries.
///
/// Declared entries keep their relative order; synthesized entries are
/// inserted immediately before the declared entry that required them.
/// An implied sub-generator is reused instead of synthesized when an entry
/// with the same preset and language is already declared, or was already
/// synthesized for an earlier composite. Every entry gets its preset's option
/// defaults for keys it leaves out; beyond that, reused entries are left untouched.
/// Dependencies added here are positional; identifiers are assigned later.
pub fn expand(
    input_type: InputType,
    entries: &[GeneratorEntry],
) -> Result<Vec<GeneratorEntry>, RealizeError> {
    check_support(input_type, entries)?;

    let mut pool: HashMap<(Preset, Language), Slot> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        pool.entry((entry.preset, entry.language))
            .or_insert(Slot::Declared(index));
    }

    let mut synthesized: Vec<Synthesized> = Vec::new();
    let mut implied: Vec<Option<Slot>> = vec![None; entries.len()];

    for (index, entry) in entries.iter().enumerate() {
        let mut previous = None;
        for &sub_preset in entry.preset.implied_chain() {
            let slot = match pool.get(&(sub_preset, entry.language)) {
                Some(&slot) => slot,
                None => {
                    let slot = Slot::Synthesized(synthesized.len());
                    let sub_entry = implied_entry(entry, sub_preset);
                    debug!(
                        preset = %sub_preset,
                        language = %entry.language,
                        output_path = ?sub_entry.output_path,
                        "Synthesizing implied generator for generators.{index}"
                    );
                    synthesized.push(Synthesized {
                        owner: index,
                        entry: sub_entry,
                        predecessor: previous,
                    });
                    pool.insert((sub_preset, entry.language), slot);
                    slot
                }
            };
            previous = Some(slot);
        }
        implied[index] = previous;
    }

    // Lay out the final order, then translate slots into positions
    let mut declared_at = vec![0; entries.len()];
    let mut synthesized_at = vec![0; synthesized.len()];
    let mut next = 0;
    for (index, position) in declared_at.iter_mut().enumerate() {
        for (synthesized_index, item) in synthesized.iter().enumerate() {
            if item.owner == index {
                synthesized_at[synthesized_index] = next;
                next += 1;
            }
        }
        *position = next;
        next += 1;
    }
    let position = |slot: Slot| match slot {
        Slot::Declared(index) => declared_at[index],
        Slot::Synthesized(index) => synthesized_at[index],
    };

    let mut expanded = Vec::with_capacity(next);
    let mut pending = synthesized.into_iter().peekable();
    for (index, entry) in entries.iter().enumerate() {
        while let Some(item) = pending.next_if(|item| item.owner == index) {
            let mut sub_entry = item.entry;
            sub_entry
                .dependencies
                .extend(item.predecessor.map(|slot| DependencyRef::Entry(position(slot))));
            expanded.push(sub_entry);
        }

        let mut declared = entry.clone();
        declared
            .preset
            .apply_defaults(declared.language, &mut declared.options);
        if let Some(slot) = implied[index] {
            let dependency = DependencyRef::Entry(position(slot));
            if !declared.dependencies.contains(&dependency) {
                declared.dependencies.push(dependency);
            }
        }
        expanded.push(declared);
    }

    debug!(
        declared = entries.len(),
        expanded = expanded.len(),
        "Expanded composite presets"
    );
    Ok(expanded)
}

/// Build the implied `sub_preset` entry for a composite `owner`
fn implied_entry(owner: &GeneratorEntry, sub_preset: Preset) -> GeneratorEntry {
    let mut entry = GeneratorEntry::new(
        sub_preset,
        owner.language,
        derived_output_path(owner, sub_preset),
    );

    // Channels generated on behalf of a client speak the client's protocols
    if owner.preset == Preset::Client && sub_preset == Preset::Channels {
        if let Some(protocols) = owner.options.get("protocols") {
            entry
                .options
                .insert("protocols".to_string(), protocols.clone());
        }
    }
    sub_preset.apply_defaults(owner.language, &mut entry.options);

    entry
}

fn derived_output_path(owner: &GeneratorEntry, sub_preset: Preset) -> PathBuf {
    match (owner.preset, sub_preset) {
        (Preset::Client, Preset::Channels) => owner.output_path.join(Preset::Channels.subdirectory()),
        (Preset::Client, _) => owner
            .output_path
            .join(Preset::Channels.subdirectory())
            .join(sub_preset.subdirectory()),
        _ => owner.output_path.join(sub_preset.subdirectory()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(preset: Preset, output_path: &str) -> GeneratorEntry {
        GeneratorEntry::new(preset, Language::Typescript, output_path)
    }

    fn presets(entries: &[GeneratorEntry]) -> Vec<Preset> {
        entries.iter().map(|entry| entry.preset).collect()
    }

    #[test]
    fn test_leaf_presets_expand_to_themselves() {
        let entries = vec![entry(Preset::Payloads, "a"), entry(Preset::Models, "b")];
        let expanded = expand(InputType::Asyncapi, &entries).unwrap();
        assert_eq!(presets(&expanded), presets(&entries));
        assert_eq!(expanded[0].output_path, PathBuf::from("a"));
        assert!(expanded[0].dependencies.is_empty());
        assert_eq!(expanded[1], entries[1]);
    }

    #[test]
    fn test_option_defaults_apply_to_declared_and_implied_entries() {
        let mut payloads = entry(Preset::Payloads, "./payloads");
        payloads
            .options
            .insert("rawPropertyNames".to_string(), json!(true));
        let entries = vec![payloads, entry(Preset::Channels, "./channels")];

        let expanded = expand(InputType::Asyncapi, &entries).unwrap();
        assert_eq!(expanded[0].options["rawPropertyNames"], json!(true));
        assert_eq!(expanded[0].options["map"], json!("record"));
        assert_eq!(expanded[1].options["serializationType"], json!("json"));
        assert_eq!(expanded[3].options["protocols"], json!(["nats"]));
        assert_eq!(expanded[3].options["asyncapiGenerateForOperations"], json!(true));
    }

    #[test]
    fn test_inherited_protocols_override_channel_defaults() {
        let mut client = entry(Preset::Client, "./client");
        client
            .options
            .insert("protocols".to_string(), json!(["kafka"]));

        let expanded = expand(InputType::Asyncapi, &[client]).unwrap();
        assert_eq!(expanded[3].options["protocols"], json!(["kafka"]));
        assert_eq!(expanded[3].options["functionTypeMapping"], json!({}));
        assert_eq!(expanded[4].options["protocols"], json!(["kafka"]));
    }

    #[test]
    fn test_channels_expands_to_chain() {
        let entries = vec![entry(Preset::Channels, "./out")];
        let expanded = expand(InputType::Asyncapi, &entries).unwrap();

        assert_eq!(
            presets(&expanded),
            vec![
                Preset::Payloads,
                Preset::Parameters,
                Preset::Headers,
                Preset::Channels
            ]
        );
        assert!(expanded[0].dependencies.is_empty());
        assert_eq!(expanded[1].dependencies, vec![DependencyRef::Entry(0)]);
        assert_eq!(expanded[2].dependencies, vec![DependencyRef::Entry(1)]);
        assert_eq!(expanded[3].dependencies, vec![DependencyRef::Entry(2)]);
        assert_eq!(expanded[0].output_path, PathBuf::from("./out/payload"));
        assert_eq!(expanded[1].output_path, PathBuf::from("./out/parameter"));
        assert_eq!(expanded[2].output_path, PathBuf::from("./out/header"));
    }

    #[test]
    fn test_client_expands_to_five_entries() {
        let mut client = entry(Preset::Client, "./client");
        client
            .options
            .insert("protocols".to_string(), json!(["nats"]));

        let expanded = expand(InputType::Asyncapi, &[client]).unwrap();
        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded[3].preset, Preset::Channels);
        assert_eq!(expanded[3].output_path, PathBuf::from("./client/channels"));
        assert_eq!(expanded[3].options["protocols"], json!(["nats"]));
        assert_eq!(
            expanded[0].output_path,
            PathBuf::from("./client/channels/payload")
        );
        assert_eq!(expanded[4].dependencies, vec![DependencyRef::Entry(3)]);
    }

    #[test]
    fn test_declared_payloads_are_reused() {
        let entries = vec![
            entry(Preset::Payloads, "./payloads"),
            entry(Preset::Channels, "./channels"),
        ];
        let expanded = expand(InputType::Asyncapi, &entries).unwrap();

        assert_eq!(
            presets(&expanded),
            vec![
                Preset::Payloads,
                Preset::Parameters,
                Preset::Headers,
                Preset::Channels
            ]
        );
        // The user's entry keeps its path and gains no dependencies
        assert_eq!(expanded[0].output_path, entries[0].output_path);
        assert!(expanded[0].dependencies.is_empty());
        assert_eq!(expanded[1].dependencies, vec![DependencyRef::Entry(0)]);
    }

    #[test]
    fn test_declared_entry_later_in_list_is_reused() {
        let entries = vec![
            entry(Preset::Client, "./client"),
            entry(Preset::Channels, "./channels"),
        ];
        let expanded = expand(InputType::Asyncapi, &entries).unwrap();

        assert_eq!(
            presets(&expanded),
            vec![
                Preset::Payloads,
                Preset::Parameters,
                Preset::Headers,
                Preset::Client,
                Preset::Channels
            ]
        );
        assert_eq!(expanded[3].dependencies, vec![DependencyRef::Entry(4)]);
        assert_eq!(expanded[4].dependencies, vec![DependencyRef::Entry(2)]);
    }

    #[test]
    fn test_two_composites_share_implied_entries() {
        let entries = vec![
            entry(Preset::Channels, "./one"),
            entry(Preset::Channels, "./two"),
        ];
        let expanded = expand(InputType::Asyncapi, &entries).unwrap();

        assert_eq!(expanded.len(), 5);
        assert_eq!(expanded[4].dependencies, vec![DependencyRef::Entry(2)]);
    }

    #[test]
    fn test_declared_dependencies_are_kept() {
        let mut channels = entry(Preset::Channels, "./out");
        channels.dependencies = vec![DependencyRef::Named("custom-typescript".to_string())];
        let entries = vec![entry(Preset::Custom, "./custom"), channels];

        let expanded = expand(InputType::Asyncapi, &entries).unwrap();
        assert_eq!(
            expanded[4].dependencies,
            vec![
                DependencyRef::Named("custom-typescript".to_string()),
                DependencyRef::Entry(3)
            ]
        );
    }

    #[test]
    fn test_unsupported_combinations_are_all_reported() {
        let entries = vec![
            entry(Preset::Channels, "./channels"),
            GeneratorEntry::new(Preset::Headers, Language::Java, "./headers"),
        ];

        let error = expand(InputType::Openapi, &entries).unwrap_err();
        let RealizeError::UnsupportedCombination(combinations) = error else {
            panic!("expected unsupported combination error");
        };
        assert_eq!(combinations.len(), 2);
        assert_eq!(
            combinations[0].unsupported,
            Unsupported::InputType(InputType::Openapi)
        );
        assert_eq!(
            combinations[1].unsupported,
            Unsupported::Language(Language::Java)
        );
        assert_eq!(
            combinations[0].to_string(),
            "Invalid preset 'channels' for input type 'openapi' at \"generators.0\""
        );
    }
}
