//! Configuration loading for the codegen CLI

pub mod context;
pub mod loader;

#[cfg(test)]
mod tests;

pub use context::{DocumentSource, RunContext};
pub use loader::{expand_path, ConfigFormat, ConfigLoader, LoadedConfig, SEARCH_PLACES};
