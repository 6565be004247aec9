use log::debug;
use serde_json::{Value, json};
use tokio::fs;

use crate::error::{RelayError, Result};

/// Turn a `--raw-query` argument into a search body.
///
/// The argument is either inline JSON or `@/path/to/file.json`. A value that
/// is not an object is treated as the query clause itself.
pub async fn load_raw_query(raw: &str) -> Result<Value> {
    let query_json: Value = if let Some(file_path) = raw.strip_prefix('@') {
        debug!("Loading raw query from file: {}", file_path);
        let content = fs::read_to_string(file_path).await.map_err(|e| {
            RelayError::InvalidQuery(format!("failed to read '{}': {}", file_path, e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            RelayError::InvalidQuery(format!("'{}' is not valid JSON: {}", file_path, e))
        })?
    } else {
        debug!("Parsing raw query from command line parameter");
        serde_json::from_str(raw)
            .map_err(|e| RelayError::InvalidQuery(format!("not valid JSON: {}", e)))?
    };

    let search_body = if query_json.is_object() {
        query_json
    } else {
        debug!("Raw query is not an object, wrapping in a query object");
        json!({ "query": query_json })
    };

    debug!(
        "Final search body: {}",
        serde_json::to_string(&search_body).unwrap_or_default()
    );
    Ok(search_body)
}
