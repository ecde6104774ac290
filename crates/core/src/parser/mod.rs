//! Document parser
//!
//! Turns the flat text of a scripture compilation into the book → chapter →
//! verse hierarchy. Parsing never fails on content: lines that cannot be
//! placed are skipped and reported as [`ParseDiagnostic`]s. Only failing to
//! read the source at all is an error.

mod classify;

pub use classify::{classify, extract_digits, parse_number, LineKind};

use crate::config::ParserConfig;
use crate::models::{Chapter, DiagnosticKind, Document, ParseDiagnostic};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// The source document could not be read
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Document not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Document is not valid UTF-8: {}", .path.display())]
    Decode { path: PathBuf },

    #[error("Failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl SourceError {
    /// Path of the document that failed to load
    pub fn path(&self) -> &Path {
        match self {
            SourceError::NotFound { path }
            | SourceError::Decode { path }
            | SourceError::Io { path, .. } => path,
        }
    }
}

/// Result of parsing: the document plus every skipped line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The parsed hierarchy
    pub document: Document,

    /// Lines that were skipped, in source order
    pub diagnostics: Vec<ParseDiagnostic>,

    /// Number of source lines read (including blank ones)
    pub total_lines: usize,
}

impl ParseOutcome {
    /// Lines skipped for lack of book/chapter context
    pub fn structural_errors(&self) -> impl Iterator<Item = &ParseDiagnostic> {
        self.diagnostics.iter().filter(|d| d.kind.is_structural())
    }

    /// Whether every line was placed or deliberately ignored
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse state threaded through the line loop
#[derive(Debug, Default)]
struct ParseContext {
    /// Index into `Document::books`
    current_book: Option<usize>,
    current_chapter: Option<u32>,
    diagnostics: Vec<ParseDiagnostic>,
}

impl ParseContext {
    fn skip(&mut self, line: usize, kind: DiagnosticKind, content: &str) {
        warn!(line, kind = kind.label(), "skipping line: {}", content);
        self.diagnostics.push(ParseDiagnostic {
            line,
            kind,
            content: content.to_string(),
        });
    }
}

/// Line-classifying parser for scripture text
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    config: ParserConfig,
}

impl DocumentParser {
    /// Create a parser with the given heuristics
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Heuristics in use
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a sequence of lines
    pub fn parse_lines<I, S>(&self, lines: I) -> ParseOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Document::new();
        let mut ctx = ParseContext::default();
        let mut total_lines = 0;

        for (idx, raw) in lines.into_iter().enumerate() {
            total_lines += 1;
            let line_no = idx + 1;
            let line = raw.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match classify(line, &self.config) {
                LineKind::BookTitle(title) => {
                    ctx.current_book = Some(document.ensure_book(title));
                    ctx.current_chapter = None;
                }
                LineKind::ChapterMarker { digits } => {
                    let Some(book) = ctx.current_book else {
                        ctx.skip(line_no, DiagnosticKind::MissingBook, line);
                        continue;
                    };
                    match parse_number(&digits) {
                        Ok(number) => {
                            document.books[book]
                                .chapters
                                .insert(number, Chapter::default());
                            ctx.current_chapter = Some(number);
                        }
                        Err(kind) => {
                            // verses that follow belong to no known chapter
                            ctx.current_chapter = None;
                            ctx.skip(line_no, kind, line);
                        }
                    }
                }
                LineKind::Verse { digits, text } => {
                    let Some(book) = ctx.current_book else {
                        ctx.skip(line_no, DiagnosticKind::MissingBook, line);
                        continue;
                    };
                    let Some(chapter) = ctx.current_chapter else {
                        ctx.skip(line_no, DiagnosticKind::MissingChapter, line);
                        continue;
                    };
                    match parse_number(&digits) {
                        Ok(number) => {
                            document.books[book]
                                .chapters
                                .entry(chapter)
                                .or_default()
                                .verses
                                .insert(number, text);
                        }
                        Err(kind) => ctx.skip(line_no, kind, line),
                    }
                }
                LineKind::Unrecognized => {}
            }
        }

        debug!(
            "Found {} book{}, {} verses, {} skipped line{}",
            document.book_count(),
            if document.book_count() == 1 { "" } else { "s" },
            document.total_verses(),
            ctx.diagnostics.len(),
            if ctx.diagnostics.len() == 1 { "" } else { "s" }
        );

        ParseOutcome {
            document,
            diagnostics: ctx.diagnostics,
            total_lines,
        }
    }

    /// Parse text already in memory
    pub fn parse_str(&self, content: &str) -> ParseOutcome {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        self.parse_lines(content.lines())
    }

    /// Read a UTF-8 file and parse it
    pub fn load(&self, path: &Path) -> Result<ParseOutcome, SourceError> {
        let content = read_source(path)?;
        Ok(self.parse_str(&content))
    }
}

/// Parse lines with the default heuristics
pub fn parse<I, S>(lines: I) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    DocumentParser::default().parse_lines(lines)
}

/// Read and parse a file with the default heuristics
pub fn load(path: &Path) -> Result<ParseOutcome, SourceError> {
    DocumentParser::default().load(path)
}

/// Read the whole source as UTF-8
fn read_source(path: &Path) -> Result<String, SourceError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            debug!(?error);
            return Err(match error.kind() {
                std::io::ErrorKind::NotFound => SourceError::NotFound {
                    path: path.to_path_buf(),
                },
                _ => SourceError::Io {
                    path: path.to_path_buf(),
                    source: error,
                },
            });
        }
    };

    String::from_utf8(bytes).map_err(|error| {
        debug!(?error);
        SourceError::Decode {
            path: path.to_path_buf(),
        }
    })
}
