//! Generator configuration realization
//!
//! Turns a raw, possibly invalid generator configuration into an ordered,
//! uniquely identified [`ExecutionPlan`]. The pipeline is pure: validation,
//! preset expansion, identifier resolution and dependency ordering each take
//! the previous stage's output and return a fresh value or a structured
//! [`RealizeError`].

pub mod config;
pub mod error;
pub mod expand;
pub mod graph;
pub mod identifier;
pub mod plan;
pub mod preset;
pub mod validation;

pub use config::{Configuration, DependencyRef, GeneratorEntry, ResolvedEntry};
pub use error::{
    ErrorKind, IssueKind, MissingDependency, RealizeError, Unsupported, UnsupportedCombination,
    ValidationIssue,
};
pub use expand::expand;
pub use graph::{order, DependencyGraph};
pub use identifier::resolve_ids;
pub use plan::{realize, realize_configuration, ExecutionPlan};
pub use preset::{InputType, Keyword, Language, Preset, Protocol};
pub use validation::validate;
