//! Configuration module for the scripture reader
//!
//! This module provides the reader configuration (source document, progress
//! file, line-classification heuristics and advance policy), built either in
//! code with the builder methods or from a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How `advance` decides where the next verse is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolloverPolicy {
    /// Compare the cursor against the number of recorded verses/chapters and
    /// step by one. Assumes numbering is dense from 1; gaps surface as
    /// verse-not-found after the step.
    #[default]
    Count,

    /// Step to the next recorded verse key, then the first verse of the next
    /// recorded chapter key. Tolerates gaps.
    NextKey,
}

impl RolloverPolicy {
    /// Get display name for the policy
    pub fn label(&self) -> &'static str {
        match self {
            RolloverPolicy::Count => "count",
            RolloverPolicy::NextKey => "next-key",
        }
    }
}

/// Line-classification heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// A digit-free line strictly shorter than this (in characters) is a book title
    pub book_title_max_chars: usize,

    /// Leading character of a chapter marker line
    pub chapter_marker: char,

    /// Keyword a chapter marker line must contain
    pub chapter_keyword: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            book_title_max_chars: 10,
            chapter_marker: '제',
            chapter_keyword: "장".to_string(),
        }
    }
}

impl ParserConfig {
    /// Check the heuristics are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.book_title_max_chars == 0 {
            return Err(ConfigError::InvalidConfig(
                "book_title_max_chars must be at least 1".to_string(),
            ));
        }
        if self.chapter_keyword.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "chapter_keyword must not be empty".to_string(),
            ));
        }
        if self.chapter_marker.is_ascii_digit() {
            return Err(ConfigError::InvalidConfig(
                "chapter_marker must not be a digit".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the reader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Scripture text file to load
    pub document: PathBuf,

    /// File holding the saved reading position
    pub progress_file: PathBuf,

    /// Line-classification heuristics
    pub parser: ParserConfig,

    /// Advance policy
    pub rollover: RolloverPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            document: PathBuf::from("bible.txt"),
            progress_file: PathBuf::from("bible_progress.txt"),
            parser: ParserConfig::default(),
            rollover: RolloverPolicy::default(),
        }
    }
}

impl ReaderConfig {
    /// Create new config for a document
    pub fn new(document: PathBuf) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    /// Load config from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReaderConfig = toml::from_str(content)?;
        config.parser.validate()?;
        Ok(config)
    }

    /// Set document path (builder pattern)
    pub fn with_document(mut self, path: PathBuf) -> Self {
        self.document = path;
        self
    }

    /// Set progress file path (builder pattern)
    pub fn with_progress_file(mut self, path: PathBuf) -> Self {
        self.progress_file = path;
        self
    }

    /// Set parser heuristics (builder pattern)
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Set advance policy (builder pattern)
    pub fn with_rollover(mut self, rollover: RolloverPolicy) -> Self {
        self.rollover = rollover;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ReaderConfig::new(PathBuf::from("/test/bible.txt"))
            .with_progress_file(PathBuf::from("/tmp/progress.txt"))
            .with_rollover(RolloverPolicy::NextKey);

        assert_eq!(config.document, PathBuf::from("/test/bible.txt"));
        assert_eq!(config.progress_file, PathBuf::from("/tmp/progress.txt"));
        assert_eq!(config.rollover, RolloverPolicy::NextKey);
        assert_eq!(config.parser.book_title_max_chars, 10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ReaderConfig::from_toml_str(
            r#"
document = "개역개정.txt"
rollover = "next-key"

[parser]
book_title_max_chars = 12
"#,
        )
        .unwrap();

        assert_eq!(config.document, PathBuf::from("개역개정.txt"));
        assert_eq!(config.progress_file, PathBuf::from("bible_progress.txt"));
        assert_eq!(config.rollover, RolloverPolicy::NextKey);
        assert_eq!(config.parser.book_title_max_chars, 12);
        assert_eq!(config.parser.chapter_marker, '제');
        assert_eq!(config.parser.chapter_keyword, "장");
    }

    #[test]
    fn test_invalid_parser_config() {
        let result = ReaderConfig::from_toml_str(
            r#"
[parser]
chapter_keyword = ""
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

        let result = ReaderConfig::from_toml_str("rollover = \"sideways\"");
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reader.toml");
        fs::write(&path, "progress_file = \"saved.txt\"\n").unwrap();

        let config = ReaderConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.progress_file, PathBuf::from("saved.txt"));
        assert_eq!(config.document, PathBuf::from("bible.txt"));

        let missing = ReaderConfig::from_toml_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
