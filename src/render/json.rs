//! JSON rendering for bundles.

use crate::error::{Error, Result};
use crate::model::Bundle;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a bundle to JSON.
pub fn to_json(bundle: &Bundle, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(bundle),
        JsonFormat::Compact => serde_json::to_string(bundle),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Reload a bundle from JSON.
pub fn from_json(json: &str) -> Result<Bundle> {
    serde_json::from_str(json).map_err(|e| Error::Render(format!("JSON parse error: {}", e)))
}
