//! bible_reader_core - Core library for reading a plain-text scripture
//!
//! This crate turns a scripture compilation whose structure is signaled only
//! by line shape into a book → chapter → verse lookup, navigates it, and
//! keeps the reading position between runs.
//!
//! # Features
//!
//! - **Heuristic Parsing**: short digit-free lines are book titles, lines
//!   like `제1장` are chapter markers, lines starting with a digit are verses.
//!   Lines that cannot be placed are skipped and reported, never fatal.
//! - **Navigation**: jump to a verse, advance with chapter rollover.
//! - **Progress**: save and restore the reading position.
//! - **Multiple Output Formats**: JSON, YAML, ANSI and plain-text outlines.
//! - **Filename Cleanup**: strip leading numbers from text file names.
//!
//! # Example
//!
//! ```rust,no_run
//! use bible_reader_core::{load_document, Navigator, ReaderConfig};
//! use std::path::PathBuf;
//!
//! let config = ReaderConfig::new(PathBuf::from("bible.txt"));
//! let loaded = load_document(&config).unwrap();
//!
//! let mut navigator = Navigator::new(&loaded.document);
//! println!("{}", navigator.jump_to("창세기", 1, 1).unwrap());
//! println!("{}", navigator.advance().unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod navigator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod rename;
pub mod session;

// Re-exports for convenience
pub use config::{ConfigError, ParserConfig, ReaderConfig, RolloverPolicy};
pub use engine::{load_document, load_with, EngineError, LoadedDocument};
pub use models::{
    Book, BookOutline, Chapter, Cursor, DiagnosticKind, Document, DocumentOutline, DocumentStats,
    LoadMetadata, ParseDiagnostic,
};
pub use navigator::{NavigationError, Navigator};
pub use output::{format_outline, format_verse, FormatError, OutputFormat};
pub use parser::{classify, parse, DocumentParser, LineKind, ParseOutcome, SourceError};
pub use progress::{ProgressError, ProgressStore, SavedProgress};
pub use rename::{NumberRemover, RenameError, RenameOutcome};
pub use session::ReadingSession;
