//! Presentation adapters for search outcomes

use crate::index::{Outcome, ResultSet};
use crate::text::{Fragment, Highlighted};

/// Turns a search outcome into displayable text
pub trait Render {
    /// Render an outcome; `Hidden` renders as an empty string
    fn render(&self, outcome: &Outcome<'_>) -> String {
        match outcome {
            Outcome::Hidden => String::new(),
            Outcome::Shown(results) if results.is_empty() => self.no_results(results.query()),
            Outcome::Shown(results) => self.results(results),
        }
    }

    /// Message shown when a query matched nothing
    fn no_results(&self, query: &str) -> String;

    /// Hit list for a non-empty result set
    fn results(&self, results: &ResultSet<'_>) -> String;
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Markup used by the site's search dropdown
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn highlighted(text: &Highlighted) -> String {
        let mut out = String::new();
        for fragment in text.fragments() {
            match fragment {
                Fragment::Text(t) => out.push_str(&escape_html(t)),
                Fragment::Match(t) => {
                    out.push_str(&format!(
                        r#"<mark class="search-highlight">{}</mark>"#,
                        escape_html(t)
                    ));
                },
            }
        }
        out
    }
}

impl Render for HtmlRenderer {
    fn no_results(&self, query: &str) -> String {
        format!(r#"<div class="search-no-results">No results for '{}'</div>"#, escape_html(query))
    }

    fn results(&self, results: &ResultSet<'_>) -> String {
        let needle = results.needle();
        let mut out = String::new();
        for doc in results.hits() {
            out.push_str(&format!(
                r#"<a class="search-result" href="{}"><div class="search-result-title">{}</div><div class="search-result-excerpt">{}</div></a>"#,
                escape_html(&doc.url),
                Self::highlighted(&needle.highlight(&doc.title)),
                Self::highlighted(&needle.highlight(&needle.excerpt(&doc.content))),
            ));
        }
        out
    }
}

/// Plain or ANSI-colored text for terminals
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer {
    /// Use ANSI bold yellow for matches instead of brackets
    pub color: bool,
}

impl TerminalRenderer {
    fn highlighted(&self, text: &Highlighted) -> String {
        if self.color {
            text.render_with(|m| format!("\x1b[1;33m{m}\x1b[0m"))
        } else {
            text.render_with(|m| format!("[{m}]"))
        }
    }
}

impl Render for TerminalRenderer {
    fn no_results(&self, query: &str) -> String {
        format!("No results for '{query}'\n")
    }

    fn results(&self, results: &ResultSet<'_>) -> String {
        let needle = results.needle();
        let mut out = String::new();
        for doc in results.hits() {
            let title = self.highlighted(&needle.highlight(&doc.title));
            let excerpt = self.highlighted(&needle.highlight(&needle.excerpt(&doc.content)));
            out.push_str(&format!("{title}\n  {}\n  {excerpt}\n", doc.url));
        }
        out
    }
}
