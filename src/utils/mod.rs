//! Utility functions for the codegen CLI

use std::fs;
use std::path::Path;

use codegen_engine::ExecutionPlan;

use crate::{CodegenError, CodegenResult};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> CodegenResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(CodegenError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {path:?}"),
        )));
    }
    Ok(())
}

/// Calculate SHA256 hash of a string
pub fn calculate_string_hash(content: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stable digest of a plan; equal configurations always produce equal fingerprints
pub fn plan_fingerprint(plan: &ExecutionPlan) -> CodegenResult<String> {
    // Option maps are BTreeMap backed, so key order is canonical
    let canonical = serde_json::to_string(plan)?;
    Ok(calculate_string_hash(&canonical))
}

/// Shorten a fingerprint for terminal display
pub fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_calculate_string_hash() {
        let hash = calculate_string_hash("hello");
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_ensure_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(ensure_directory(&file).is_err());
    }

    #[test]
    fn test_plan_fingerprint_is_stable() {
        let raw = json!({
            "inputType": "asyncapi",
            "inputPath": "asyncapi.json",
            "generators": [
                { "preset": "client", "protocols": ["nats"], "zeta": 1, "alpha": 2 }
            ]
        });

        let first = plan_fingerprint(&codegen_engine::realize(&raw).unwrap()).unwrap();
        let second = plan_fingerprint(&codegen_engine::realize(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(short_hash(&first).len(), 12);
    }

    #[test]
    fn test_plan_fingerprint_changes_with_plan() {
        let a = json!({ "inputType": "openapi", "inputPath": "a.yaml", "generators": [{ "preset": "payloads" }] });
        let b = json!({ "inputType": "openapi", "inputPath": "b.yaml", "generators": [{ "preset": "payloads" }] });

        assert_ne!(
            plan_fingerprint(&codegen_engine::realize(&a).unwrap()).unwrap(),
            plan_fingerprint(&codegen_engine::realize(&b).unwrap()).unwrap()
        );
    }
}
