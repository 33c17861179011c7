//! Common types and constants for `riddlen-search`

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of hits shown in the dropdown
pub const MAX_RESULTS: usize = 8;

/// Minimum query length in characters before results are shown
pub const MIN_QUERY_CHARS: usize = 2;

/// Characters of context kept on each side of the first match in an excerpt
pub const EXCERPT_RADIUS: usize = 60;

/// Characters of content used as excerpt when the query is not in the content
pub const EXCERPT_FALLBACK_CHARS: usize = 120;

/// Marker placed where an excerpt was cut
pub const ELLIPSIS: &str = "...";

/// Default location of the document list
pub const DEFAULT_INDEX_FILE: &str = "search.json";

/// Maximum directory depth walked when building an index
pub const MAX_DEPTH: usize = 64;

/// Maximum number of pages collected when building an index
pub const MAX_FILES: usize = 1_000;

/// Maximum page size in bytes (2MB)
pub const MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

/// Maximum path length in characters
pub const MAX_PATH_LENGTH: usize = 255;

/// One searchable page of the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Page title
    pub title:       String,
    /// Permalink of the page
    pub url:         String,
    /// Full page text
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content:     String,
    /// Optional summary
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Read an optional string field, treating `null` like a missing key
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Document {
    /// Create a document from its parts
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title:       title.into(),
            url:         url.into(),
            content:     content.into(),
            description: description.into(),
        }
    }
}

const _: () = {
    assert!(MAX_RESULTS > 0);
    assert!(MIN_QUERY_CHARS > 0);
    assert!(EXCERPT_FALLBACK_CHARS > 0);
    assert!(MAX_DEPTH > 0);
    assert!(MAX_FILES > 0);
    assert!(MAX_FILE_SIZE > 0);
    assert!(MAX_PATH_LENGTH > 0);
};
