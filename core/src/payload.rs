//! Payload argument parsing.

use serde_json::Value;

use crate::error::PostError;

/// Parse a payload argument as JSON.
///
/// Shells on some platforms hand the argument over still wrapped in single
/// quotes, so every leading and trailing `'` is stripped first.
pub fn parse_payload(raw: &str) -> Result<Value, PostError> {
    serde_json::from_str(raw.trim_matches('\'')).map_err(|e| PostError::InvalidPayload(e.to_string()))
}
