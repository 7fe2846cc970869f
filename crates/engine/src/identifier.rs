//! Unique identifier assignment for generator entries

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{DependencyRef, GeneratorEntry, ResolvedEntry};

/// Assign every entry a unique identifier and resolve positional dependencies.
///
/// Entries are scanned in order. The first entry claiming an identifier,
/// declared or defaulted to `{preset}-{language}`, keeps it; later claimants
/// get `-1`, `-2`, ... appended, skipping suffixes that are already taken.
/// Dependency lists are de-duplicated, keeping the first occurrence.
pub fn resolve_ids(entries: Vec<GeneratorEntry>) -> Vec<ResolvedEntry> {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut suffixes: HashMap<String, usize> = HashMap::new();

    let ids: Vec<String> = entries
        .iter()
        .map(|entry| {
            let base = entry.base_id();
            let id = if claimed.contains(&base) {
                let counter = suffixes.entry(base.clone()).or_insert(0);
                loop {
                    *counter += 1;
                    let candidate = format!("{base}-{counter}");
                    if !claimed.contains(&candidate) {
                        debug!(base = %base, id = %candidate, "Disambiguated duplicate generator id");
                        break candidate;
                    }
                }
            } else {
                base
            };
            claimed.insert(id.clone());
            id
        })
        .collect();

    entries
        .into_iter()
        .zip(ids.iter())
        .map(|(entry, id)| {
            let mut dependencies: Vec<String> = Vec::with_capacity(entry.dependencies.len());
            for dependency in entry.dependencies {
                let resolved = match dependency {
                    DependencyRef::Named(name) => name,
                    DependencyRef::Entry(position) => ids[position].clone(),
                };
                if !dependencies.contains(&resolved) {
                    dependencies.push(resolved);
                }
            }

            ResolvedEntry {
                id: id.clone(),
                preset: entry.preset,
                language: entry.language,
                output_path: entry.output_path,
                dependencies,
                options: entry.options,
            }
        })
        .collect()
}
