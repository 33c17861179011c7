//! In-memory search index over the site's document list

use std::fs;
use std::path::Path;

use arrayvec::ArrayVec;
use globset::{GlobBuilder, GlobMatcher};

use crate::error::Result;
use crate::text::Needle;
use crate::types::{Document, MAX_RESULTS, MIN_QUERY_CHARS};

/// Documents matching a query, in load order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet<'a> {
    /// Query the set was computed for
    query:  String,
    /// Matching documents, at most `MAX_RESULTS`
    hits:   ArrayVec<&'a Document, MAX_RESULTS>,
    /// Prepared query, reused for highlighting
    needle: Needle,
}

impl<'a> ResultSet<'a> {
    /// Query the set was computed for
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Prepared query for highlighting titles and excerpts
    pub const fn needle(&self) -> &Needle {
        &self.needle
    }

    /// Matching documents in load order
    pub fn hits(&self) -> &[&'a Document] {
        &self.hits
    }

    /// Number of matching documents shown
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Result of running a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    /// Query too short, no dropdown at all
    Hidden,
    /// Dropdown shown, possibly with a "no results" message
    Shown(ResultSet<'a>),
}

impl<'a> Outcome<'a> {
    /// Result set when shown
    pub const fn results(&self) -> Option<&ResultSet<'a>> {
        match self {
            Self::Hidden => None,
            Self::Shown(results) => Some(results),
        }
    }

    /// Whether the dropdown is shown
    pub const fn is_shown(&self) -> bool {
        matches!(self, Self::Shown(_))
    }
}

/// Case-insensitive url filter for section-restricted search
#[derive(Debug, Clone)]
pub struct Scope {
    matcher: GlobMatcher,
}

impl Scope {
    /// Compile a url glob such as `/docs/**`
    ///
    /// # Errors
    /// Returns error if the pattern is not a valid glob
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = GlobBuilder::new(pattern).case_insensitive(true).literal_separator(true).build()?;
        Ok(Self { matcher: glob.compile_matcher() })
    }

    /// Whether a url falls within the scope
    pub fn contains(&self, url: &str) -> bool {
        self.matcher.is_match(url)
    }
}

/// Search index holding every document of the site in load order
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    documents: Vec<Document>,
}

impl SearchIndex {
    /// Create an index over the given documents
    #[must_use = "SearchIndex must be used to answer queries"]
    pub const fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Parse an index from a JSON array of documents
    ///
    /// # Errors
    /// Returns error if the text is not a JSON array of documents
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_documents(serde_json::from_str(json)?))
    }

    /// Load an index from a document list file
    ///
    /// # Errors
    /// Returns error if:
    /// - File cannot be read
    /// - File is not a JSON array of documents
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let index = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), documents = index.len(), "loaded search index");
        Ok(index)
    }

    /// Load an index, falling back to an empty one on failure.
    ///
    /// The failure is logged; an empty index answers every query with no
    /// matches.
    pub fn load_or_inert(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "search index unavailable");
            Self::default()
        })
    }

    /// Loaded documents in load order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are loaded
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Check whether a document matches a prepared query on any field
    pub fn matches(needle: &Needle, doc: &Document) -> bool {
        needle.is_in(&doc.title) || needle.is_in(&doc.content) || needle.is_in(&doc.description)
    }

    /// Run a query against every document
    pub fn query(&self, query: &str) -> Outcome<'_> {
        self.collect(query, |_| true)
    }

    /// Run a query against documents whose url is within `scope`
    pub fn query_within(&self, query: &str, scope: &Scope) -> Outcome<'_> {
        self.collect(query, |doc| scope.contains(&doc.url))
    }

    fn collect(&self, query: &str, mut eligible: impl FnMut(&Document) -> bool) -> Outcome<'_> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Outcome::Hidden;
        }

        let needle = Needle::new(query);
        let mut hits = ArrayVec::new();

        for doc in &self.documents {
            if eligible(doc) && Self::matches(&needle, doc) && hits.try_push(doc).is_err() {
                break;
            }
        }

        assert!(hits.len() <= MAX_RESULTS, "Result buffer overflow");
        tracing::debug!(query, hits = hits.len(), "search query");

        Outcome::Shown(ResultSet { query: query.to_owned(), hits, needle })
    }
}
