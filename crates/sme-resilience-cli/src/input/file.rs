use serde::de::DeserializeOwned;
use sme_resilience_core::SimulatorError;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical).map_err(|e| {
        SimulatorError::Io(format!("failed to read '{}': {}", canonical.display(), e))
    })?;
    let value: T = serde_json::from_str(&contents).map_err(|e| {
        SimulatorError::SerializationError(format!(
            "failed to parse '{}': {}",
            canonical.display(),
            e
        ))
    })?;
    Ok(value)
}

/// Resolve the path against the working directory and require a regular file.
fn resolve_path(path: &str) -> Result<PathBuf, SimulatorError> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(SimulatorError::Io(format!(
            "file not found: {}",
            canonical.display()
        )));
    }
    if !canonical.is_file() {
        return Err(SimulatorError::Io(format!(
            "not a file: {}",
            canonical.display()
        )));
    }

    Ok(canonical)
}
