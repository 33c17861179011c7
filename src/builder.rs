//! Builds the document list from a Jekyll site source

use std::fs;
use std::path::{Component, Path};

use crate::crawler::Crawler;
use crate::error::{Error, Result};
use crate::text::{collapse_whitespace, strip_html};
use crate::types::Document;

/// Front matter delimiter line
const DELIMITER: &str = "---";

/// Flat `key: value` pairs from a page's front matter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: Vec<(String, String)>,
}

impl FrontMatter {
    /// Value of a top-level key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Whether the page opted out of search
    pub fn is_excluded(&self) -> bool {
        ["search", "sitemap"].iter().any(|key| self.get(key) == Some("false"))
    }

    fn parse_line(line: &str) -> Option<(String, String)> {
        if line.starts_with([' ', '\t', '#', '-']) {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        let value = value.trim();
        let value = ['"', '\'']
            .iter()
            .find_map(|&q| value.strip_prefix(q).and_then(|v| v.strip_suffix(q)))
            .unwrap_or(value);
        Some((key.trim().to_owned(), value.to_owned()))
    }
}

/// Split a page into front matter and body.
///
/// Returns `None` when the source has no front matter, which Jekyll treats
/// as a static file rather than a page.
pub fn split_front_matter(source: &str) -> Option<(FrontMatter, &str)> {
    let rest = source.strip_prefix('\u{feff}').unwrap_or(source);
    let (first, mut rest) = rest.split_once('\n')?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let mut front = FrontMatter::default();
    while !rest.is_empty() {
        let (line, tail) = rest.split_once('\n').unwrap_or((rest, ""));
        let line = line.trim_end();
        if line == DELIMITER || line == "..." {
            return Some((front, tail));
        }
        front.fields.extend(FrontMatter::parse_line(line));
        rest = tail;
    }
    None
}

/// Permalink of a post named `YYYY-MM-DD-slug`
fn post_url(stem: &str) -> Option<String> {
    let mut parts = stem.splitn(4, '-');
    let (year, month, day, slug) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    let is_date = [(year, 4), (month, 2), (day, 2)]
        .iter()
        .all(|(part, len)| part.len() == *len && part.bytes().all(|b| b.is_ascii_digit()));
    (is_date && !slug.is_empty()).then(|| format!("/{year}/{month}/{day}/{slug}.html"))
}

/// Url of a page at `relative` path within the site source.
///
/// Returns `None` for files under `_posts` whose names lack a date.
pub fn page_url(relative: &Path, front: &FrontMatter) -> Option<String> {
    if let Some(permalink) = front.get("permalink").filter(|p| !p.is_empty()) {
        return Some(if permalink.starts_with('/') {
            permalink.to_owned()
        } else {
            format!("/{permalink}")
        });
    }

    let dirs: Vec<&str> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();
    let stem = relative.file_stem()?.to_str()?;

    if dirs.first() == Some(&"_posts") {
        return post_url(stem);
    }

    let mut url = String::from("/");
    for dir in &dirs {
        url.push_str(dir);
        url.push('/');
    }
    if stem != "index" {
        url.push_str(stem);
        url.push_str(".html");
    }
    Some(url)
}

/// Turn one page source into a searchable document
pub fn document_from_source(relative: &Path, source: &str) -> Option<Document> {
    let (front, body) = split_front_matter(source)?;
    if front.is_excluded() {
        return None;
    }
    let url = page_url(relative, &front)?;
    let title = match front.get("title") {
        Some(title) => title.to_owned(),
        None => relative.file_stem()?.to_string_lossy().into_owned(),
    };

    Some(Document {
        title,
        url,
        content: collapse_whitespace(&strip_html(body)),
        description: front.get("description").unwrap_or_default().to_owned(),
    })
}

/// Crawl a site source and collect its searchable documents, sorted by url
///
/// # Errors
/// Returns error if the crawl exceeds its bounds or a directory cannot be read
pub fn build_documents(root: &Path) -> Result<Vec<Document>> {
    let mut crawler = Crawler::new(root)?;
    let mut documents = Vec::new();

    while let Some(files) = crawler.process_next()? {
        for file in files {
            let relative = file.strip_prefix(root).unwrap_or(&file);
            let source = match fs::read(&file).map(String::from_utf8) {
                Ok(Ok(source)) => source,
                Ok(Err(_)) => {
                    tracing::warn!(path = %file.display(), "skipping page that is not UTF-8");
                    continue;
                },
                Err(e) => {
                    tracing::warn!(path = %file.display(), error = %e, "failed to read page");
                    continue;
                },
            };

            match document_from_source(relative, &source) {
                Some(doc) => {
                    tracing::debug!(path = %relative.display(), url = %doc.url, "indexed page");
                    documents.push(doc);
                },
                None => tracing::debug!(path = %relative.display(), "not a searchable page"),
            }
        }
    }

    documents.sort_by(|a, b| a.url.cmp(&b.url));
    let (pages, _, dirs) = crawler.progress();
    tracing::info!(pages, dirs, documents = documents.len(), "built document list");
    Ok(documents)
}

/// Write documents as a pretty-printed JSON array
///
/// # Errors
/// Returns error if serialization or the write fails
pub fn write_index(documents: &[Document], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(documents)?;
    fs::write(path, json).map_err(|e| Error::index(&format!("Failed to write index: {e}")))
}
