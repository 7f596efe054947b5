use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Typed ledger export from a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let (located, contents) = read_text(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("'{}' is not a valid ledger export: {}", located.display(), e).into())
}

/// Whole file as text, with the resolved location for error messages.
pub fn read_text(path: &str) -> Result<(PathBuf, String), Box<dyn std::error::Error>> {
    let located = resolve_path(path)?;
    let contents = fs::read_to_string(&located)
        .map_err(|e| format!("Cannot read '{}': {}", located.display(), e))?;
    tracing::debug!(path = %located.display(), bytes = contents.len(), "read input file");
    Ok((located, contents))
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let given = Path::new(path);
    let located = if given.is_absolute() {
        given.to_path_buf()
    } else {
        std::env::current_dir()?.join(given)
    };

    match fs::metadata(&located) {
        Ok(meta) if meta.is_file() => Ok(located),
        Ok(_) => Err(format!("Not a file: {}", located.display()).into()),
        Err(_) => Err(format!("File not found: {}", located.display()).into()),
    }
}
