//! Line-shape classification
//!
//! The source format has no delimiters or escaping. Each trimmed line is
//! classified purely by its shape, in priority order: book title, chapter
//! marker, verse, anything else.

use crate::config::ParserConfig;
use crate::models::DiagnosticKind;

/// What a single source line is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Short digit-free line naming a book
    BookTitle(&'a str),

    /// Chapter boundary; `digits` are all digits found on the line
    ChapterMarker { digits: String },

    /// Verse entry; `digits` come from the first token only
    Verse { digits: String, text: String },

    /// Anything else (headings, notes, long prose without a number)
    Unrecognized,
}

impl LineKind<'_> {
    /// Get the variant name
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::BookTitle(_) => "book_title",
            LineKind::ChapterMarker { .. } => "chapter_marker",
            LineKind::Verse { .. } => "verse",
            LineKind::Unrecognized => "unrecognized",
        }
    }
}

/// Classify an already trimmed, non-empty line
pub fn classify<'a>(line: &'a str, config: &ParserConfig) -> LineKind<'a> {
    let has_digit = line.chars().any(|c| c.is_ascii_digit());

    if !has_digit && line.chars().count() < config.book_title_max_chars {
        return LineKind::BookTitle(line);
    }

    if line.starts_with(config.chapter_marker) && line.contains(config.chapter_keyword.as_str()) {
        return LineKind::ChapterMarker {
            digits: extract_digits(line),
        };
    }

    if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        let mut tokens = line.split_whitespace();
        let digits = tokens.next().map(extract_digits).unwrap_or_default();
        let text = tokens.collect::<Vec<_>>().join(" ");
        return LineKind::Verse { digits, text };
    }

    LineKind::Unrecognized
}

/// Concatenate every ASCII digit in `text`
pub fn extract_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Turn extracted digits into a chapter or verse number
pub fn parse_number(digits: &str) -> Result<u32, DiagnosticKind> {
    if digits.is_empty() {
        return Err(DiagnosticKind::MissingNumber);
    }
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(DiagnosticKind::InvalidNumber),
        Ok(n) => Ok(n),
    }
}
