//! Case-insensitive literal matching, highlighting and excerpts

use crate::types::{ELLIPSIS, EXCERPT_FALLBACK_CHARS, EXCERPT_RADIUS};

/// Fold a character for case-insensitive comparison.
///
/// Characters whose lowercase form is more than one character keep their
/// original form, so folded text stays aligned char-for-char with the input.
pub fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn fold_chars(chars: &[char]) -> Vec<char> {
    chars.iter().map(|&c| fold(c)).collect()
}

/// Position of the first occurrence of `needle` in `hay` at or after `from`
fn find_from(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

/// Piece of highlighted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Text outside any match
    Text(String),
    /// Text of one occurrence of the query, in its original case
    Match(String),
}

/// Text split into plain and matched fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlighted {
    fragments: Vec<Fragment>,
}

impl Highlighted {
    /// Fragments in text order
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of highlighted occurrences
    pub fn match_count(&self) -> usize {
        self.fragments.iter().filter(|f| matches!(f, Fragment::Match(_))).count()
    }

    /// Rebuild the text, wrapping each match with `mark`
    pub fn render_with(&self, mut mark: impl FnMut(&str) -> String) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(text) => out.push_str(text),
                Fragment::Match(text) => out.push_str(&mark(text)),
            }
        }
        out
    }
}

/// A query prepared for case-insensitive literal matching.
///
/// Every character is taken literally; there is no pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Needle {
    folded: Vec<char>,
}

impl Needle {
    /// Prepare a query for matching
    pub fn new(query: &str) -> Self {
        Self { folded: query.chars().map(fold).collect() }
    }

    /// Length of the query in characters
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Whether the query is empty
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Char index of the first occurrence in `text`
    pub fn first_in(&self, text: &str) -> Option<usize> {
        let hay: Vec<char> = text.chars().map(fold).collect();
        find_from(&hay, &self.folded, 0)
    }

    /// Whether `text` contains the query
    pub fn is_in(&self, text: &str) -> bool {
        self.first_in(text).is_some()
    }

    /// Mark every non-overlapping occurrence, scanning left to right
    pub fn highlight(&self, text: &str) -> Highlighted {
        let chars: Vec<char> = text.chars().collect();
        let folded = fold_chars(&chars);
        let mut fragments = Vec::new();
        let mut plain_start = 0;

        while let Some(at) = find_from(&folded, &self.folded, plain_start) {
            if at > plain_start {
                fragments.push(Fragment::Text(chars[plain_start..at].iter().collect()));
            }
            let end = at + self.folded.len();
            fragments.push(Fragment::Match(chars[at..end].iter().collect()));
            plain_start = end;
        }
        if plain_start < chars.len() {
            fragments.push(Fragment::Text(chars[plain_start..].iter().collect()));
        }

        Highlighted { fragments }
    }

    /// Window of `content` around the first occurrence of the query.
    ///
    /// Keeps `EXCERPT_RADIUS` characters on each side and marks cut edges
    /// with an ellipsis. Without an occurrence the first
    /// `EXCERPT_FALLBACK_CHARS` characters are used, followed by an ellipsis.
    pub fn excerpt(&self, content: &str) -> String {
        let chars: Vec<char> = content.chars().collect();
        let folded = fold_chars(&chars);

        let Some(at) = find_from(&folded, &self.folded, 0) else {
            let mut excerpt: String = chars.iter().take(EXCERPT_FALLBACK_CHARS).collect();
            excerpt.push_str(ELLIPSIS);
            return excerpt;
        };

        let start = at.saturating_sub(EXCERPT_RADIUS);
        let end = (at + self.folded.len() + EXCERPT_RADIUS).min(chars.len());
        assert!(start <= at && at < end, "Excerpt window must contain the match");

        let mut excerpt = String::new();
        if start > 0 {
            excerpt.push_str(ELLIPSIS);
        }
        excerpt.extend(&chars[start..end]);
        if end < chars.len() {
            excerpt.push_str(ELLIPSIS);
        }
        excerpt
    }
}

/// Elements whose text is not page content
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Remove HTML tags, comments, and script/style bodies
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let skip = if tail.starts_with("<!--") {
            tail.find("-->").map(|i| i + 3)
        } else if let Some(name) = raw_text_element(tail) {
            let closing = format!("</{name}");
            tail.to_ascii_lowercase()
                .find(&closing)
                .and_then(|i| tail[i..].find('>').map(|j| i + j + 1))
        } else {
            tail.find('>').map(|i| i + 1)
        };

        match skip {
            Some(len) => rest = &tail[len..],
            None => {
                // Unterminated tag: keep it as text
                out.push_str(tail);
                rest = "";
            },
        }
    }
    out.push_str(rest);
    out
}

fn raw_text_element(tag: &str) -> Option<&'static str> {
    RAW_TEXT_ELEMENTS.into_iter().find(|name| {
        tag.get(1..=name.len()).is_some_and(|p| p.eq_ignore_ascii_case(name))
            && tag[name.len() + 1..].starts_with(|c: char| c == '>' || c.is_whitespace())
    })
}

/// Collapse runs of whitespace, newlines included, into single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets(highlighted: &Highlighted) -> String {
        highlighted.render_with(|m| format!("[{m}]"))
    }

    #[test]
    fn test_case_insensitive_containment() {
        let needle = Needle::new("RIDDLEN");
        assert!(needle.is_in("Getting started with Riddlen"));
        assert!(!needle.is_in("Getting started"));
        assert_eq!(needle.first_in("a riddlen"), Some(2));
    }

    #[test]
    fn test_empty_needle_matches_nothing() {
        let needle = Needle::new("");
        assert!(needle.is_empty());
        assert!(!needle.is_in("anything"));
        assert_eq!(needle.highlight("abc").match_count(), 0);
    }

    #[test]
    fn test_highlight_all_occurrences_keeps_case() {
        let highlighted = Needle::new("ab").highlight("Ab cab AB");
        assert_eq!(highlighted.match_count(), 3);
        assert_eq!(brackets(&highlighted), "[Ab] c[ab] [AB]");
    }

    #[test]
    fn test_highlight_non_overlapping() {
        let highlighted = Needle::new("aa").highlight("aaaa a");
        assert_eq!(brackets(&highlighted), "[aa][aa] a");
    }

    #[test]
    fn test_highlight_treats_metacharacters_literally() {
        let highlighted = Needle::new("(*").highlight("f(*) and f(x)");
        assert_eq!(brackets(&highlighted), "f[(*]) and f(x)");

        let highlighted = Needle::new("a.c").highlight("abc a.c");
        assert_eq!(brackets(&highlighted), "abc [a.c]");
    }

    #[test]
    fn test_multi_char_lowercase_compares_as_itself() {
        // 'İ' lowercases to "i\u{307}", which is two chars; it folds to itself
        assert_eq!(fold('İ'), 'İ');
        assert!(Needle::new("İz").is_in("İZMİR"));
        assert!(!Needle::new("i\u{307}z").is_in("İzmir"));
        assert!(!Needle::new("iz").is_in("İzmir"));

        let highlighted = Needle::new("zm").highlight("İzmİr");
        assert_eq!(brackets(&highlighted), "İ[zm]İr");
    }

    #[test]
    fn test_highlight_multibyte_text() {
        let highlighted = Needle::new("über").highlight("Das ÜBER-Rätsel");
        assert_eq!(brackets(&highlighted), "Das [ÜBER]-Rätsel");
    }

    #[test]
    fn test_excerpt_short_content_is_whole() {
        let excerpt = Needle::new("brown").excerpt("The quick brown fox jumps");
        assert_eq!(excerpt, "The quick brown fox jumps");
    }

    #[test]
    fn test_excerpt_window_with_ellipses() {
        let content = format!("{}needle{}", "a".repeat(100), "b".repeat(100));
        let excerpt = Needle::new("NEEDLE").excerpt(&content);
        let expected = format!("...{}needle{}...", "a".repeat(60), "b".repeat(60));
        assert_eq!(excerpt, expected);
    }

    #[test]
    fn test_excerpt_cut_on_one_side_only() {
        let content = format!("needle{}", "b".repeat(100));
        let excerpt = Needle::new("needle").excerpt(&content);
        assert_eq!(excerpt, format!("needle{}...", "b".repeat(60)));
    }

    #[test]
    fn test_excerpt_fallback_when_absent() {
        let content = "c".repeat(200);
        let excerpt = Needle::new("zz").excerpt(&content);
        assert_eq!(excerpt, format!("{}...", "c".repeat(120)));

        assert_eq!(Needle::new("zz").excerpt("short"), "short...");
    }

    #[test]
    fn test_strip_html() {
        let html = "<p>Hello <b>riddler</b></p><!-- note --><script>var x = 1 < 2;</script>done";
        assert_eq!(strip_html(html), "Hello riddlerdone");
        assert_eq!(strip_html("<STYLE type=\"x\">p{}</STYLE>ok"), "ok");
        assert_eq!(strip_html("<scripts>kept</scripts>"), "kept");
        assert_eq!(strip_html("a <b"), "a <b");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  one\n\ntwo\tthree  "), "one two three");
    }
}
