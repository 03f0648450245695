//! Query-term highlighting for result text.
//!
//! Matching is case-insensitive and literal: the query term is regex-escaped
//! before compilation, so `c++` highlights `c++` and nothing else. Both entry
//! points return the input unchanged when the term is empty or the pattern
//! fails to build - highlighting must never be able to break rendering.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use regex::RegexBuilder;

fn term_pattern(term: &str) -> Option<regex::Regex> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Wrap every occurrence of `term` in `**` markers, for plain-text output.
pub fn highlight_marked(text: &str, term: &str) -> String {
    match term_pattern(term) {
        Some(re) => re.replace_all(text, "**$0**").into_owned(),
        None => text.to_string(),
    }
}

/// Split `text` into styled spans with occurrences of `term` emphasized on
/// top of `base`.
pub fn highlight_line(text: &str, term: &str, base: Style, emphasis: Style) -> Line<'static> {
    let Some(re) = term_pattern(term) else {
        return Line::from(Span::styled(text.to_string(), base));
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(text) {
        if m.start() > cursor {
            spans.push(Span::styled(text[cursor..m.start()].to_string(), base));
        }
        spans.push(Span::styled(
            m.as_str().to_string(),
            base.patch(emphasis.add_modifier(Modifier::BOLD)),
        ));
        cursor = m.end();
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), base));
    }
    if spans.is_empty() {
        spans.push(Span::styled(String::new(), base));
    }
    spans.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_every_case_insensitive_occurrence() {
        assert_eq!(
            highlight_marked("Rust is rust", "rust"),
            "**Rust** is **rust**"
        );
    }

    #[test]
    fn empty_term_returns_text_unchanged() {
        assert_eq!(highlight_marked("hello", ""), "hello");
        assert_eq!(highlight_marked("hello", "   "), "hello");
    }

    #[test]
    fn regex_metacharacters_match_literally() {
        assert_eq!(highlight_marked("a+b and c", "a+b"), "**a+b** and c");
        // A term that would be an invalid pattern unescaped must not panic.
        assert_eq!(highlight_marked("f(x) = y", "(x)"), "f**(x)** = y");
    }

    #[test]
    fn line_splits_around_matches() {
        let base = Style::default();
        let line = highlight_line("about rust today", "rust", base, Style::default());
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["about ", "rust", " today"]);
    }

    #[test]
    fn line_with_no_match_is_one_span() {
        let line = highlight_line("plain", "zzz", Style::default(), Style::default());
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content.as_ref(), "plain");
    }
}
