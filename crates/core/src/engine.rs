//! Document loading engine
//!
//! This module loads the configured scripture text, times the parse, and
//! builds the reporting outline.

use crate::config::ReaderConfig;
use crate::models::{
    BookOutline, Document, DocumentOutline, DocumentStats, LoadMetadata, ParseDiagnostic,
};
use crate::parser::{DocumentParser, SourceError};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),
}

/// A parsed document together with what was skipped and how long it took
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Source file
    pub source: PathBuf,

    /// The parsed hierarchy
    pub document: Document,

    /// Lines skipped during parsing
    pub diagnostics: Vec<ParseDiagnostic>,

    /// Load metadata
    pub metadata: LoadMetadata,
}

impl LoadedDocument {
    /// Calculate document statistics
    pub fn stats(&self) -> DocumentStats {
        let structural_errors = self
            .diagnostics
            .iter()
            .filter(|d| d.kind.is_structural())
            .count();

        DocumentStats {
            books: self.document.book_count(),
            chapters: self.document.total_chapters(),
            verses: self.document.total_verses(),
            structural_errors,
            numbering_warnings: self.diagnostics.len() - structural_errors,
            sparse_books: self.document.books.iter().filter(|b| !b.is_dense()).count(),
        }
    }

    /// Build the serializable outline
    pub fn outline(&self) -> DocumentOutline {
        DocumentOutline {
            source: self.source.clone(),
            books: self.document.books.iter().map(BookOutline::from_book).collect(),
            stats: self.stats(),
            diagnostics: self.diagnostics.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Load and parse the document named by the configuration
pub fn load_document(config: &ReaderConfig) -> Result<LoadedDocument, EngineError> {
    config.parser.validate()?;
    let parser = DocumentParser::new(config.parser.clone());
    load_with(&parser, &config.document)
}

/// Load and parse a document with an existing parser
pub fn load_with(parser: &DocumentParser, path: &Path) -> Result<LoadedDocument, EngineError> {
    let start = Instant::now();
    let outcome = parser.load(path)?;
    let duration = start.elapsed();

    let metadata = LoadMetadata {
        parse_duration_ms: duration.as_millis() as u64,
        total_lines: outcome.total_lines,
        timestamp: chrono::Utc::now().to_rfc3339(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if outcome.document.is_empty() {
        warn!(path = %path.display(), "no books recognized");
    }
    if !outcome.diagnostics.is_empty() {
        warn!(
            "{} line{} skipped while parsing {}",
            outcome.diagnostics.len(),
            if outcome.diagnostics.len() == 1 { "" } else { "s" },
            path.display()
        );
    }
    info!(
        books = outcome.document.book_count(),
        verses = outcome.document.total_verses(),
        ms = metadata.parse_duration_ms,
        "loaded {}",
        path.display()
    );

    Ok(LoadedDocument {
        source: path.to_path_buf(),
        document: outcome.document,
        diagnostics: outcome.diagnostics,
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_document() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bible.txt");
        fs::write(
            &path,
            "창세기\n제1장\n1 태초에\n2 땅이\n제2장\n1 천지와\n\n\
             출애굽기\n제1장\n1 야곱과\n3 건너뛴 절\n\n\
             7 일곱째 절\n",
        )
        .unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_document() {
        let (_dir, path) = create_test_document();
        let loaded = load_document(&ReaderConfig::new(path.clone())).unwrap();

        assert_eq!(loaded.source, path);
        assert_eq!(loaded.document.book_count(), 2);
        assert_eq!(loaded.metadata.total_lines, 13);
        assert!(loaded.diagnostics.is_empty());
    }

    #[test]
    fn test_stats_and_outline() {
        let (_dir, path) = create_test_document();
        let loaded = load_document(&ReaderConfig::new(path)).unwrap();
        let outline = loaded.outline();

        assert_eq!(outline.stats.books, 2);
        assert_eq!(outline.stats.chapters, 3);
        assert_eq!(outline.stats.verses, 6);
        assert_eq!(outline.stats.sparse_books, 1);
        assert_eq!(outline.books[0].name, "창세기");
        assert_eq!(outline.books[0].verses_per_chapter.get(&1), Some(&2));
        assert!(!outline.books[1].dense);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = ReaderConfig::new(dir.path().join("none.txt"));

        assert!(matches!(
            load_document(&config),
            Err(EngineError::SourceUnavailable(SourceError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_parser_config_is_rejected() {
        let (_dir, path) = create_test_document();
        let config = ReaderConfig::new(path).with_parser(ParserConfig {
            book_title_max_chars: 0,
            ..Default::default()
        });

        assert!(matches!(
            load_document(&config),
            Err(EngineError::ConfigError(_))
        ));
    }
}
