use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Typed ledger export piped on stdin. `None` when stdin is a terminal or
/// nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    let payload = raw.trim();
    if payload.is_empty() {
        tracing::debug!("stdin was empty");
        return Ok(None);
    }

    tracing::debug!(bytes = payload.len(), "reading ledger export from stdin");
    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| format!("stdin is not a valid ledger export: {}", e).into())
}
