//! Error types for `riddlen-search`

use arrayvec::ArrayString;
use thiserror::Error;

/// Maximum length of error messages
pub const MAX_ERROR_LENGTH: usize = 256;

/// Custom result type for `riddlen-search` operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for `riddlen-search`
#[derive(Debug, Error)]
pub enum Error {
    /// IO operation failed
    #[error("Error: {0}")]
    Io(#[from] std::io::Error),

    /// Document list could not be parsed
    #[error("Error: Malformed document list: {0}")]
    Json(#[from] serde_json::Error),

    /// A url scope pattern could not be compiled
    #[error("Error: Invalid scope pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    /// Directory depth exceeded the maximum limit
    #[error("Error: Maximum directory depth of 64 exceeded")]
    DepthExceeded,

    /// Page count exceeded the maximum limit
    #[error("Error: Maximum page count of 1,000 exceeded")]
    FileCountExceeded,

    /// Page size exceeded the maximum limit
    #[error("Error: Maximum page size of 2MB exceeded")]
    FileSizeExceeded,

    /// Path length exceeded the maximum limit
    #[error("Error: Path length exceeded 255 characters")]
    PathTooLong,

    /// Index error with fixed-size message buffer
    #[error("Error: {0}")]
    Index(Box<ArrayString<MAX_ERROR_LENGTH>>),
}

impl Error {
    /// Create a new index error, truncating the message to `MAX_ERROR_LENGTH`
    pub fn index(msg: &str) -> Self {
        let mut buf = ArrayString::new();
        for c in msg.chars() {
            if buf.try_push(c).is_err() {
                break;
            }
        }
        Self::Index(Box::new(buf))
    }

    /// Get a user-friendly error message with action items
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => format!("Error: {e}\nTip: Check that the path exists and is readable"),
            Self::Json(e) => format!(
                "Error: Malformed document list: {e}\nTip: Rebuild it with 'riddlen-search build'"
            ),
            Self::InvalidPattern(e) => format!(
                "Error: Invalid scope pattern: {e}\nTip: Use a glob such as '/docs/**'"
            ),
            Self::DepthExceeded => "Error: Directory structure too deep (max 64 levels)\nTip: \
                                    Point the build at the site source root"
                .to_owned(),
            Self::FileCountExceeded => {
                "Error: Too many pages (max 1,000)\nTip: Exclude generated directories from the \
                 site source"
                    .to_owned()
            },
            Self::FileSizeExceeded => {
                "Error: Page too large (max 2MB)\nTip: Split the page or move assets out of the \
                 source tree"
                    .to_owned()
            },
            Self::PathTooLong => "Error: Path too long (max 255 characters)\nTip: Try moving \
                                  pages to a shorter path"
                .to_owned(),
            Self::Index(msg) => format!("Error: {msg}"),
        }
    }
}
