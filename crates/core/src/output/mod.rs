//! Output formatting module
//!
//! This module provides formatters for JSON, YAML, ANSI and plain-text
//! output of document outlines, plus the verse display used by front ends.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::{format_outline_ansi, format_verse_ansi};
pub use json::format_json;
pub use yaml::format_yaml;

use crate::models::{Cursor, DocumentOutline};
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Available output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Plain text summary
    Summary,
}

/// Format a document outline in the specified format
pub fn format_outline(data: &DocumentOutline, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(data),
        OutputFormat::Yaml => format_yaml(data),
        OutputFormat::Ansi => Ok(format_outline_ansi(data)),
        OutputFormat::Summary => Ok(format_summary(data)),
    }
}

/// Format a verse for display: a heading line, then the text
pub fn format_verse(cursor: &Cursor, text: &str) -> String {
    format!("{}:\n{}", cursor, text)
}

/// Format as plain text summary
fn format_summary(data: &DocumentOutline) -> String {
    let mut output = String::new();

    output.push_str("Document Summary\n");
    output.push_str("================\n\n");
    output.push_str(&format!("Source: {}\n", data.source.display()));
    output.push_str(&format!("Books: {}\n", data.stats.books));
    output.push_str(&format!("Chapters: {}\n", data.stats.chapters));
    output.push_str(&format!("Verses: {}\n", data.stats.verses));

    if !data.books.is_empty() {
        output.push_str("\nBooks:\n");
        for book in &data.books {
            output.push_str(&format!(
                "  {} - {} chapters, {} verses{}\n",
                book.name,
                book.chapter_count,
                book.verse_count,
                if book.dense { "" } else { " (numbering gaps)" }
            ));
        }
    }

    if !data.diagnostics.is_empty() {
        output.push_str(&format!(
            "\nSkipped lines: {} ({} structural, {} numbering)\n",
            data.diagnostics.len(),
            data.stats.structural_errors,
            data.stats.numbering_warnings
        ));
        for diagnostic in &data.diagnostics {
            output.push_str(&format!("  {}\n", diagnostic));
        }
    }

    output.push_str(&format!(
        "\nParsed {} lines in {}ms\n",
        data.metadata.total_lines, data.metadata.parse_duration_ms
    ));

    output
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{
        BookOutline, DiagnosticKind, DocumentStats, LoadMetadata, ParseDiagnostic,
    };
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    pub(crate) fn create_test_data() -> DocumentOutline {
        DocumentOutline {
            source: PathBuf::from("/test/bible.txt"),
            books: vec![BookOutline {
                name: "창세기".to_string(),
                chapter_count: 2,
                verses_per_chapter: BTreeMap::from([(1, 31), (2, 25)]),
                verse_count: 56,
                dense: true,
            }],
            stats: DocumentStats {
                books: 1,
                chapters: 2,
                verses: 56,
                structural_errors: 1,
                numbering_warnings: 0,
                sparse_books: 0,
            },
            diagnostics: vec![ParseDiagnostic {
                line: 3,
                kind: DiagnosticKind::MissingBook,
                content: "1 떠돌이 구절".to_string(),
            }],
            metadata: LoadMetadata {
                parse_duration_ms: 12,
                total_lines: 60,
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                tool_version: "0.1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_format_summary() {
        let output = format_outline(&create_test_data(), OutputFormat::Summary).unwrap();
        assert!(output.contains("Books: 1"));
        assert!(output.contains("창세기 - 2 chapters, 56 verses"));
        assert!(output.contains("line 3: no book context: 1 떠돌이 구절"));
        assert!(output.contains("Parsed 60 lines in 12ms"));
    }

    #[test]
    fn test_format_verse() {
        let cursor = Cursor::new("창세기", 1, 1);
        assert_eq!(
            format_verse(&cursor, "태초에 하나님이 천지를 창조하시니라"),
            "창세기 1장 1절:\n태초에 하나님이 천지를 창조하시니라"
        );
    }

    #[test]
    fn test_default_format() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
