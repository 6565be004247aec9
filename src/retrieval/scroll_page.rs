use serde_json::{Value, json};

use crate::error::{RelayError, Result};
use crate::kibana::ProxyRequest;

/// Backend path for continuing or clearing a scroll
pub const SCROLL_PATH: &str = "/_search/scroll";

/// One batch of hits together with the token for the next batch
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollPage {
    pub scroll_id: String,
    pub hits: Vec<Value>,
}

impl ScrollPage {
    /// Pull `hits.hits` and `_scroll_id` out of a search response.
    /// Both are required on every page.
    pub fn from_response(mut response: Value, path: &str) -> Result<Self> {
        let hits = response
            .get_mut("hits")
            .and_then(|hits| hits.get_mut("hits"))
            .and_then(Value::as_array_mut)
            .map(std::mem::take)
            .ok_or_else(|| RelayError::malformed(path, "missing 'hits.hits' array"))?;

        let scroll_id = response
            .get("_scroll_id")
            .and_then(Value::as_str)
            .ok_or_else(|| RelayError::malformed(path, "missing '_scroll_id'"))?
            .to_string();

        Ok(Self { scroll_id, hits })
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Opening request: scrolled match_all against the index
pub fn first_page_request(index: &str, page_size: usize, keep_alive: &str) -> ProxyRequest {
    ProxyRequest::post(format!("/{}/_search?scroll={}", index, keep_alive)).with_body(json!({
        "size": page_size,
        "query": { "match_all": {} }
    }))
}

/// Follow-up request, the token alone identifies the paging context
pub fn next_page_request(scroll_id: &str, keep_alive: &str) -> ProxyRequest {
    ProxyRequest::post(SCROLL_PATH).with_body(json!({
        "scroll": keep_alive,
        "scroll_id": scroll_id
    }))
}

pub fn clear_scroll_request(scroll_id: &str) -> ProxyRequest {
    ProxyRequest::new(http::Method::DELETE, SCROLL_PATH).with_body(json!({
        "scroll_id": scroll_id
    }))
}
