//! ANSI colored output formatter
//!
//! This module provides colorful terminal output for verses and outlines.

use crate::models::{BookOutline, Cursor, DiagnosticKind, DocumentOutline};

// ANSI escape codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const BRIGHT_RED: &str = "\x1b[91m";
const BRIGHT_YELLOW: &str = "\x1b[93m";
const BRIGHT_CYAN: &str = "\x1b[96m";

const BG_BLUE: &str = "\x1b[44m";

/// Color for a diagnostic kind
fn diagnostic_color(kind: &DiagnosticKind) -> &'static str {
    if kind.is_structural() {
        BRIGHT_RED
    } else {
        YELLOW
    }
}

/// Format a verse heading and text
pub fn format_verse_ansi(cursor: &Cursor, text: &str) -> String {
    format!(
        "{}{}{}{} {}{}장 {}절{}\n{}",
        BOLD,
        BRIGHT_CYAN,
        cursor.book,
        RESET,
        CYAN,
        cursor.chapter,
        cursor.verse,
        RESET,
        text
    )
}

/// Format outline data as ANSI colored text
pub fn format_outline_ansi(data: &DocumentOutline) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&format!(
        "\n{}{}  Scripture Outline  {}{}\n\n",
        BOLD, BG_BLUE, RESET, RESET
    ));

    output.push_str(&format!(
        "{}Source:{} {}\n",
        BOLD,
        RESET,
        data.source.display()
    ));
    output.push_str(&format!(
        "{}Books:{} {}  {}Chapters:{} {}  {}Verses:{} {}\n\n",
        BOLD,
        RESET,
        data.stats.books,
        BOLD,
        RESET,
        data.stats.chapters,
        BOLD,
        RESET,
        data.stats.verses
    ));

    for book in &data.books {
        output.push_str(&format_book_ansi(book));
    }

    if !data.diagnostics.is_empty() {
        output.push_str(&format!(
            "\n{}{} skipped line(s){}\n",
            BOLD,
            data.diagnostics.len(),
            RESET
        ));
        for diagnostic in &data.diagnostics {
            output.push_str(&format!(
                "   {}line {}{} {}{}{} {}\n",
                DIM,
                diagnostic.line,
                RESET,
                diagnostic_color(&diagnostic.kind),
                diagnostic.kind.label(),
                RESET,
                diagnostic.content
            ));
        }
    }

    // Footer
    output.push_str(&format!(
        "\n{}Parsed {} lines in {}ms{}\n",
        DIM, data.metadata.total_lines, data.metadata.parse_duration_ms, RESET
    ));

    output
}

/// Format one book with its per-chapter verse counts
fn format_book_ansi(book: &BookOutline) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}{}{}{} {}({} chapters, {} verses){}",
        BOLD,
        BRIGHT_YELLOW,
        book.name,
        RESET,
        DIM,
        book.chapter_count,
        book.verse_count,
        RESET
    ));
    if !book.dense {
        output.push_str(&format!(" {}gaps{}", BRIGHT_RED, RESET));
    }
    output.push('\n');

    let chapters = book
        .verses_per_chapter
        .iter()
        .map(|(chapter, verses)| format!("{}{}{}:{}", CYAN, chapter, RESET, verses))
        .collect::<Vec<_>>();
    for row in chapters.chunks(10) {
        output.push_str(&format!("   {}\n", row.join("  ")));
    }

    output
}
