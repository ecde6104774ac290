//! Data models for the scripture reader
//!
//! This module defines the parsed document hierarchy (book, chapter, verse),
//! the reading cursor, parse diagnostics, and the serializable outline used
//! for reporting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// A single chapter: verse number to verse text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Verse texts keyed by verse number
    pub verses: BTreeMap<u32, String>,
}

impl Chapter {
    /// Get the text of a verse
    pub fn verse(&self, number: u32) -> Option<&str> {
        self.verses.get(&number).map(String::as_str)
    }

    /// Number of verses recorded in this chapter
    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// First verse number strictly after `number`
    pub fn next_verse_after(&self, number: u32) -> Option<u32> {
        self.verses
            .range(number.saturating_add(1)..)
            .next()
            .map(|(n, _)| *n)
    }

    /// Lowest verse number in this chapter
    pub fn first_verse(&self) -> Option<u32> {
        self.verses.keys().next().copied()
    }
}

/// A book: chapter number to chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book title as it appears in the source
    pub name: String,

    /// Chapters keyed by chapter number
    pub chapters: BTreeMap<u32, Chapter>,
}

impl Book {
    /// Create an empty book
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chapters: BTreeMap::new(),
        }
    }

    /// Get a chapter by number
    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    /// Number of chapters recorded in this book
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Total verses across all chapters
    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(Chapter::verse_count).sum()
    }

    /// Whether chapters run 1..=N without gaps and every chapter's verses do too
    pub fn is_dense(&self) -> bool {
        let chapters_dense = self.chapters.keys().copied().eq(1..=self.chapter_count() as u32);
        chapters_dense
            && self
                .chapters
                .values()
                .all(|c| c.verses.keys().copied().eq(1..=c.verse_count() as u32))
    }

    /// First chapter number strictly after `number`
    pub fn next_chapter_after(&self, number: u32) -> Option<u32> {
        self.chapters
            .range(number.saturating_add(1)..)
            .next()
            .map(|(n, _)| *n)
    }
}

/// The full parsed hierarchy of books, chapters and verses.
///
/// Books keep the order in which their titles were first seen; lookups are
/// by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Books in first-seen order
    pub books: Vec<Book>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no book was recognized
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Number of books
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Book names in first-seen order
    pub fn book_names(&self) -> Vec<&str> {
        self.books.iter().map(|b| b.name.as_str()).collect()
    }

    /// Get a book by name
    pub fn book(&self, name: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.name == name)
    }

    /// Index of the book with the given name, creating it if absent
    pub(crate) fn ensure_book(&mut self, name: &str) -> usize {
        match self.books.iter().position(|b| b.name == name) {
            Some(idx) => idx,
            None => {
                self.books.push(Book::new(name));
                self.books.len() - 1
            }
        }
    }

    /// Number of chapters in a book, if the book exists
    pub fn chapter_count(&self, book: &str) -> Option<usize> {
        self.book(book).map(Book::chapter_count)
    }

    /// Number of verses in a chapter, if the chapter exists
    pub fn verse_count(&self, book: &str, chapter: u32) -> Option<usize> {
        self.book(book)
            .and_then(|b| b.chapter(chapter))
            .map(Chapter::verse_count)
    }

    /// Look up a verse text
    pub fn verse(&self, book: &str, chapter: u32, verse: u32) -> Option<&str> {
        self.book(book)
            .and_then(|b| b.chapter(chapter))
            .and_then(|c| c.verse(verse))
    }

    /// Total verses across all books
    pub fn total_verses(&self) -> usize {
        self.books.iter().map(Book::verse_count).sum()
    }

    /// Total chapters across all books
    pub fn total_chapters(&self) -> usize {
        self.books.iter().map(Book::chapter_count).sum()
    }
}

/// The current reading position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    /// Book name (empty when no position has been set)
    pub book: String,

    /// Chapter number
    pub chapter: u32,

    /// Verse number
    pub verse: u32,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            book: String::new(),
            chapter: 1,
            verse: 1,
        }
    }
}

impl Cursor {
    /// Create a cursor at the given position
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Whether this cursor has never been positioned
    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }

    /// The position as a plain triple
    pub fn as_tuple(&self) -> (&str, u32, u32) {
        (&self.book, self.chapter, self.verse)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}장 {}절", self.book, self.chapter, self.verse)
    }
}

/// Kinds of recoverable problems found while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Chapter or verse line before any book title
    MissingBook,

    /// Verse line before any chapter marker in the current book
    MissingChapter,

    /// Chapter or verse line with no digits to number it
    MissingNumber,

    /// Digits present but not a usable positive number
    InvalidNumber,
}

impl DiagnosticKind {
    /// Get human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingBook => "no book context",
            DiagnosticKind::MissingChapter => "no chapter context",
            DiagnosticKind::MissingNumber => "missing number",
            DiagnosticKind::InvalidNumber => "invalid number",
        }
    }

    /// Whether this is a structural error (line out of book/chapter context)
    /// rather than a numbering warning
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DiagnosticKind::MissingBook | DiagnosticKind::MissingChapter
        )
    }
}

/// A skipped line and why it was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostic {
    /// Line number in the source (1-indexed)
    pub line: usize,

    /// What went wrong
    pub kind: DiagnosticKind,

    /// The trimmed line content
    pub content: String,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind.label(), self.content)
    }
}

/// Outline entry for a single book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookOutline {
    /// Book name
    pub name: String,

    /// Number of chapters
    pub chapter_count: usize,

    /// Verse count per chapter number
    pub verses_per_chapter: BTreeMap<u32, usize>,

    /// Total verses in the book
    pub verse_count: usize,

    /// Whether chapter and verse numbering is gap-free
    pub dense: bool,
}

impl BookOutline {
    /// Build the outline entry for a book
    pub fn from_book(book: &Book) -> Self {
        Self {
            name: book.name.clone(),
            chapter_count: book.chapter_count(),
            verses_per_chapter: book
                .chapters
                .iter()
                .map(|(n, c)| (*n, c.verse_count()))
                .collect(),
            verse_count: book.verse_count(),
            dense: book.is_dense(),
        }
    }
}

/// Summary statistics for a parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of books
    pub books: usize,

    /// Number of chapters across all books
    pub chapters: usize,

    /// Number of verses across all books
    pub verses: usize,

    /// Lines skipped for lack of book/chapter context
    pub structural_errors: usize,

    /// Lines skipped for numbering problems
    pub numbering_warnings: usize,

    /// Books whose chapter or verse numbering has gaps
    pub sparse_books: usize,
}

/// Metadata about a load operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMetadata {
    /// Duration of the parse in milliseconds
    pub parse_duration_ms: u64,

    /// Number of source lines read
    pub total_lines: usize,

    /// ISO timestamp of load
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}

/// Serializable overview of a loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutline {
    /// Source file
    pub source: PathBuf,

    /// Per-book outline in first-seen order
    pub books: Vec<BookOutline>,

    /// Summary statistics
    pub stats: DocumentStats,

    /// Lines skipped during parsing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ParseDiagnostic>,

    /// Load metadata
    pub metadata: LoadMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        let idx = doc.ensure_book("창세기");
        let mut chapter = Chapter::default();
        chapter.verses.insert(1, "태초에".to_string());
        chapter.verses.insert(2, "땅이".to_string());
        doc.books[idx].chapters.insert(1, chapter);
        doc
    }

    #[test]
    fn test_lookup_levels() {
        let doc = sample();
        assert_eq!(doc.book_count(), 1);
        assert_eq!(doc.chapter_count("창세기"), Some(1));
        assert_eq!(doc.verse_count("창세기", 1), Some(2));
        assert_eq!(doc.verse("창세기", 1, 2), Some("땅이"));
        assert_eq!(doc.verse("창세기", 1, 3), None);
        assert_eq!(doc.verse("출애굽기", 1, 1), None);
        assert_eq!(doc.chapter_count("출애굽기"), None);
    }

    #[test]
    fn test_ensure_book_keeps_existing() {
        let mut doc = sample();
        assert_eq!(doc.ensure_book("창세기"), 0);
        assert_eq!(doc.ensure_book("출애굽기"), 1);
        assert_eq!(doc.book_names(), vec!["창세기", "출애굽기"]);
        assert_eq!(doc.verse_count("창세기", 1), Some(2));
    }

    #[test]
    fn test_next_keys_skip_gaps() {
        let mut chapter = Chapter::default();
        chapter.verses.insert(1, String::new());
        chapter.verses.insert(4, String::new());
        assert_eq!(chapter.next_verse_after(1), Some(4));
        assert_eq!(chapter.next_verse_after(4), None);
        assert_eq!(chapter.first_verse(), Some(1));
    }

    #[test]
    fn test_cursor_display() {
        let cursor = Cursor::new("창세기", 1, 3);
        assert_eq!(cursor.to_string(), "창세기 1장 3절");
        assert!(Cursor::default().is_empty());
    }

    #[test]
    fn test_book_outline_density() {
        let doc = sample();
        let book = doc.book("창세기").unwrap();
        let outline = BookOutline::from_book(book);
        assert_eq!(outline.verse_count, 2);
        assert!(outline.dense);

        let mut sparse = book.clone();
        sparse.chapters.insert(3, Chapter::default());
        assert!(!BookOutline::from_book(&sparse).dense);
    }
}
