use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names a certificate hit may carry its fingerprint under, newest API first
pub const FINGERPRINT_FIELDS: &[&str] = &["fingerprint_sha256", "fingerprint"];

/// Field name a host hit carries its address under
pub const IP_FIELDS: &[&str] = &["ip"];

/// Search request body shared by the certificate and host endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub q: String,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Response envelope from a search endpoint.
///
/// Every level is optional: a body missing `result`, `hits`, `links` or
/// `next` reads as an empty page with no cursor.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub result: Option<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub hits: Option<Vec<Value>>,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<Value>,
}

impl SearchResponse {
    /// Hits on this page, empty when the server omitted them
    pub fn hits(&self) -> &[Value] {
        self.result
            .as_ref()
            .and_then(|r| r.hits.as_deref())
            .unwrap_or(&[])
    }

    /// Cursor for the next page, if the server returned a non-empty one
    pub fn next_cursor(&self) -> Option<String> {
        self.result
            .as_ref()?
            .links
            .as_ref()?
            .next
            .as_ref()?
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Return the first of `fields` holding a non-empty string in `record`.
///
/// Records that are not JSON objects, and fields holding anything other
/// than a string, count as absent.
pub fn first_present<'a>(record: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|field| {
        record
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    })
}
