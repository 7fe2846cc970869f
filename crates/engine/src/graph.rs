//! Dependency graph construction, cycle detection and topological ordering

use std::collections::HashMap;
use tracing::debug;

use crate::config::ResolvedEntry;
use crate::error::{MissingDependency, RealizeError};

/// DFS coloring of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Directed graph over resolved entries; an edge points from an entry to a dependency
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    entries: &'a [ResolvedEntry],
    edges: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph, failing with every dependency that names an unknown id
    pub fn build(entries: &'a [ResolvedEntry]) -> Result<Self, RealizeError> {
        let index: HashMap<&str, usize> = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.id.as_str(), position))
            .collect();

        let mut missing = Vec::new();
        let mut edges = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut targets: Vec<usize> = Vec::with_capacity(entry.dependencies.len());
            for dependency in &entry.dependencies {
                match index.get(dependency.as_str()) {
                    Some(&target) if !targets.contains(&target) => targets.push(target),
                    Some(_) => {}
                    None => missing.push(MissingDependency {
                        generator: entry.id.clone(),
                        dependency: dependency.clone(),
                    }),
                }
            }
            edges.push(targets);
        }

        if !missing.is_empty() {
            return Err(RealizeError::MissingDependency(missing));
        }

        Ok(Self { entries, edges })
    }

    /// Positions of the entries in execution order.
    ///
    /// Nodes are visited in declaration order and emitted after their
    /// dependencies, so independent entries keep their relative order.
    /// The walk keeps its own stack, so chain length is bounded by memory only.
    pub fn topological_order(&self) -> Result<Vec<usize>, RealizeError> {
        let mut marks = vec![Mark::Unvisited; self.entries.len()];
        let mut order = Vec::with_capacity(self.entries.len());
        // Current DFS path: node plus the index of its next edge to follow
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.entries.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::InProgress;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next_edge) = *frame;
                let Some(&dependency) = self.edges[node].get(next_edge) else {
                    stack.pop();
                    marks[node] = Mark::Done;
                    order.push(node);
                    continue;
                };
                frame.1 += 1;

                match marks[dependency] {
                    Mark::Done => {}
                    Mark::InProgress => return Err(self.cycle_error(&stack, dependency)),
                    Mark::Unvisited => {
                        marks[dependency] = Mark::InProgress;
                        stack.push((dependency, 0));
                    }
                }
            }
        }

        Ok(order)
    }

    /// The loop is the part of the path starting at the revisited node
    fn cycle_error(&self, stack: &[(usize, usize)], revisited: usize) -> RealizeError {
        let start = stack
            .iter()
            .position(|&(on_path, _)| on_path == revisited)
            .unwrap_or(0);
        let mut cycle: Vec<String> = stack[start..]
            .iter()
            .map(|&(member, _)| self.entries[member].id.clone())
            .collect();
        cycle.push(self.entries[revisited].id.clone());
        RealizeError::CircularDependency { cycle }
    }
}

/// Order resolved entries so every dependency precedes its dependents
pub fn order(entries: Vec<ResolvedEntry>) -> Result<Vec<ResolvedEntry>, RealizeError> {
    let positions = DependencyGraph::build(&entries)?.topological_order()?;
    debug!(generators = positions.len(), "Computed generator execution order");

    let mut slots: Vec<Option<ResolvedEntry>> = entries.into_iter().map(Some).collect();
    Ok(positions
        .into_iter()
        .filter_map(|position| slots[position].take())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{Language, Preset};
    use serde_json::Map;
    use std::path::PathBuf;

    fn entry(id: &str, dependencies: &[&str]) -> ResolvedEntry {
        ResolvedEntry {
            id: id.to_string(),
            preset: Preset::Custom,
            language: Language::Typescript,
            output_path: PathBuf::from("out"),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            options: Map::new(),
        }
    }

    fn ids(entries: &[ResolvedEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn test_generation_order() {
        // b depends on a, declared first
        let ordered = order(vec![entry("b", &["a"]), entry("a", &[])]).unwrap();
        assert_eq!(ids(&ordered), vec!["a", "b"]);
    }

    #[test]
    fn test_independent_entries_keep_declaration_order() {
        let ordered = order(vec![
            entry("c", &[]),
            entry("a", &[]),
            entry("d", &["b"]),
            entry("b", &[]),
        ])
        .unwrap();
        assert_eq!(ids(&ordered), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_diamond() {
        let ordered = order(vec![
            entry("top", &["left", "right"]),
            entry("left", &["base"]),
            entry("right", &["base"]),
            entry("base", &[]),
        ])
        .unwrap();
        assert_eq!(ids(&ordered), vec!["base", "left", "right", "top"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let error = order(vec![entry("a", &["b"]), entry("b", &["a"])]).unwrap_err();
        assert_eq!(
            error,
            RealizeError::CircularDependency {
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn test_cycle_report_excludes_nodes_outside_the_loop() {
        let error = order(vec![
            entry("entry", &["x"]),
            entry("x", &["y"]),
            entry("y", &["z"]),
            entry("z", &["x"]),
        ])
        .unwrap_err();
        assert_eq!(
            error,
            RealizeError::CircularDependency {
                cycle: vec![
                    "x".to_string(),
                    "y".to_string(),
                    "z".to_string(),
                    "x".to_string()
                ]
            }
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let error = order(vec![entry("solo", &["solo"])]).unwrap_err();
        assert_eq!(
            error,
            RealizeError::CircularDependency {
                cycle: vec!["solo".to_string(), "solo".to_string()]
            }
        );
    }

    #[test]
    fn test_missing_dependencies_are_all_reported() {
        let error = order(vec![
            entry("a", &["ghost"]),
            entry("b", &["a", "phantom"]),
            entry("c", &["c"]),
        ])
        .unwrap_err();

        let RealizeError::MissingDependency(missing) = error else {
            panic!("expected missing dependency error");
        };
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].generator, "a");
        assert_eq!(missing[0].dependency, "ghost");
        assert_eq!(missing[1].dependency, "phantom");
    }

    #[test]
    fn test_duplicate_dependencies_produce_one_edge() {
        let ordered = order(vec![entry("b", &["a", "a"]), entry("a", &[])]).unwrap();
        assert_eq!(ids(&ordered), vec!["a", "b"]);
    }

    #[test]
    fn test_long_dependency_chain() {
        // g{i} depends on g{i-1}, declared from the end of the chain
        let names: Vec<String> = (0..20_000).map(|i| format!("g{i}")).collect();
        let entries: Vec<ResolvedEntry> = (0..names.len())
            .rev()
            .map(|i| {
                let dependencies: Vec<&str> = if i == 0 {
                    Vec::new()
                } else {
                    vec![names[i - 1].as_str()]
                };
                entry(&names[i], &dependencies)
            })
            .collect();

        let ordered = order(entries).unwrap();
        assert_eq!(ordered.len(), 20_000);
        assert_eq!(ordered[0].id, "g0");
        assert_eq!(ordered[19_999].id, "g19999");
    }

    #[test]
    fn test_long_cycle_is_reported() {
        let names: Vec<String> = (0..15_000).map(|i| format!("n{i}")).collect();
        let entries: Vec<ResolvedEntry> = (0..names.len())
            .map(|i| entry(&names[i], &[names[(i + 1) % names.len()].as_str()]))
            .collect();

        let RealizeError::CircularDependency { cycle } = order(entries).unwrap_err() else {
            panic!("expected a cycle");
        };
        assert_eq!(cycle.len(), 15_001);
        assert_eq!(cycle.first(), cycle.last());
    }
}
