use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file into a typed struct. `what` names the file in errors
/// ("input", "tax config").
pub fn read_json<T: DeserializeOwned>(
    what: &str,
    path: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let resolved = resolve_path(what, path)?;
    let contents = fs::read_to_string(&resolved)
        .map_err(|e| format!("Failed to read {what} '{}': {e}", resolved.display()))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {what} '{}': {e}", resolved.display()))?;
    Ok(value)
}

fn resolve_path(what: &str, path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let resolved = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !resolved.is_file() {
        return Err(format!("{what} file not found: {}", resolved.display()).into());
    }
    Ok(resolved)
}
