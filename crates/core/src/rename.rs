//! Filename number remover
//!
//! Strips leading numbering from file names in a directory, e.g.
//! `01_창세기.txt` becomes `창세기.txt`. Independent of the reader.

use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Separator characters removed after the leading number
const SEPARATORS: &[char] = &['.', ' ', '_', '-'];

/// Rename errors
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Invalid file pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("Invalid number pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("IO error on {name}: {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },

    #[error("Refusing to rename {name}: nothing would be left of the name")]
    EmptyName { name: String },

    #[error("Refusing to rename {from} to {to}: target already exists")]
    TargetExists { from: String, to: String },
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The name had no leading number
    Unchanged { name: String },

    /// The file was renamed (or would be, in a dry run)
    Renamed { from: String, to: String },
}

impl std::fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameOutcome::Unchanged { name } => write!(f, "{}: no leading number", name),
            RenameOutcome::Renamed { from, to } => write!(f, "{} → {}", from, to),
        }
    }
}

/// Strips leading numbers from file names in one directory
#[derive(Debug, Clone)]
pub struct NumberRemover {
    dir: PathBuf,
    matcher: GlobMatcher,
    leading_number: Regex,
    dry_run: bool,
}

impl NumberRemover {
    /// Create a remover for `dir`, matching `*.txt`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RenameError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(RenameError::NotADirectory(dir));
        }
        Ok(Self {
            dir,
            matcher: Glob::new("*.txt")?.compile_matcher(),
            leading_number: Regex::new(r"^\d+")?,
            dry_run: false,
        })
    }

    /// Set the file name pattern (builder pattern)
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, RenameError> {
        self.matcher = Glob::new(pattern)?.compile_matcher();
        Ok(self)
    }

    /// Report renames without touching files (builder pattern)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory being processed
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove the leading digit run and any separators that follow it
    pub fn strip_leading_number(&self, name: &str) -> String {
        match self.leading_number.find(name) {
            Some(number) => name[number.end()..].trim_start_matches(SEPARATORS).to_string(),
            None => name.to_string(),
        }
    }

    /// Matching file names in the directory, sorted
    pub fn list_files(&self) -> Vec<String> {
        let mut names: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(%error, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| self.matcher.is_match(name))
            .collect();
        names.sort();
        names
    }

    /// Strip the leading number from one file's name
    pub fn process_file(&self, name: &str) -> Result<RenameOutcome, RenameError> {
        let new_name = self.strip_leading_number(name);
        if new_name == name {
            debug!(name, "no leading number");
            return Ok(RenameOutcome::Unchanged {
                name: name.to_string(),
            });
        }
        if new_name.is_empty() {
            return Err(RenameError::EmptyName {
                name: name.to_string(),
            });
        }

        let from = self.dir.join(name);
        let to = self.dir.join(&new_name);
        if to.exists() {
            return Err(RenameError::TargetExists {
                from: name.to_string(),
                to: new_name,
            });
        }

        if !self.dry_run {
            fs::rename(&from, &to).map_err(|source| RenameError::Io {
                name: name.to_string(),
                source,
            })?;
            info!(from = name, to = %new_name, "renamed");
        }

        Ok(RenameOutcome::Renamed {
            from: name.to_string(),
            to: new_name,
        })
    }

    /// Strip leading numbers from every matching file
    pub fn process_all(&self) -> Vec<Result<RenameOutcome, RenameError>> {
        self.list_files()
            .iter()
            .map(|name| self.process_file(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "").unwrap();
        }
        dir
    }

    #[test]
    fn test_strip_leading_number() {
        let dir = create_test_dir(&[]);
        let remover = NumberRemover::new(dir.path()).unwrap();

        assert_eq!(remover.strip_leading_number("01_창세기.txt"), "창세기.txt");
        assert_eq!(remover.strip_leading_number("1. 출애굽기.txt"), "출애굽기.txt");
        assert_eq!(remover.strip_leading_number("40-마태복음.txt"), "마태복음.txt");
        assert_eq!(remover.strip_leading_number("시편.txt"), "시편.txt");
        assert_eq!(remover.strip_leading_number("_1창세기.txt"), "_1창세기.txt");
    }

    #[test]
    fn test_separators_kept_without_number() {
        let dir = create_test_dir(&["-시편.txt", "_01_잠언.txt"]);
        let remover = NumberRemover::new(dir.path()).unwrap();

        assert_eq!(remover.strip_leading_number(". 서문.txt"), ". 서문.txt");
        assert!(matches!(
            remover.process_file("-시편.txt").unwrap(),
            RenameOutcome::Unchanged { .. }
        ));
        assert!(matches!(
            remover.process_file("_01_잠언.txt").unwrap(),
            RenameOutcome::Unchanged { .. }
        ));
        assert!(dir.path().join("-시편.txt").exists());
    }

    #[test]
    fn test_not_a_directory() {
        let dir = create_test_dir(&["a.txt"]);
        assert!(matches!(
            NumberRemover::new(dir.path().join("a.txt")),
            Err(RenameError::NotADirectory(_))
        ));
        assert!(matches!(
            NumberRemover::new(dir.path().join("missing")),
            Err(RenameError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_list_files_filters_by_pattern() {
        let dir = create_test_dir(&["02_출애굽기.txt", "01_창세기.txt", "notes.md"]);
        fs::create_dir(dir.path().join("03_레위기.txt.d")).unwrap();
        let remover = NumberRemover::new(dir.path()).unwrap();

        assert_eq!(remover.list_files(), vec!["01_창세기.txt", "02_출애굽기.txt"]);

        let remover = remover.with_pattern("*.md").unwrap();
        assert_eq!(remover.list_files(), vec!["notes.md"]);
    }

    #[test]
    fn test_process_all() {
        let dir = create_test_dir(&["01_창세기.txt", "시편.txt"]);
        let remover = NumberRemover::new(dir.path()).unwrap();

        let results: Vec<_> = remover.process_all().into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(
            results,
            vec![
                RenameOutcome::Renamed {
                    from: "01_창세기.txt".to_string(),
                    to: "창세기.txt".to_string()
                },
                RenameOutcome::Unchanged {
                    name: "시편.txt".to_string()
                },
            ]
        );
        assert!(dir.path().join("창세기.txt").exists());
        assert!(!dir.path().join("01_창세기.txt").exists());
    }

    #[test]
    fn test_dry_run_leaves_files() {
        let dir = create_test_dir(&["01_창세기.txt"]);
        let remover = NumberRemover::new(dir.path()).unwrap().with_dry_run(true);

        let outcome = remover.process_file("01_창세기.txt").unwrap();
        assert!(matches!(outcome, RenameOutcome::Renamed { .. }));
        assert!(dir.path().join("01_창세기.txt").exists());
        assert!(!dir.path().join("창세기.txt").exists());
    }

    #[test]
    fn test_refuses_to_clobber() {
        let dir = create_test_dir(&["01_창세기.txt", "창세기.txt"]);
        let remover = NumberRemover::new(dir.path()).unwrap();

        assert!(matches!(
            remover.process_file("01_창세기.txt"),
            Err(RenameError::TargetExists { .. })
        ));
        assert!(dir.path().join("01_창세기.txt").exists());
    }

    #[test]
    fn test_refuses_empty_name() {
        let dir = create_test_dir(&["2024"]);
        let remover = NumberRemover::new(dir.path()).unwrap();
        assert!(matches!(
            remover.process_file("2024"),
            Err(RenameError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = create_test_dir(&[]);
        let remover = NumberRemover::new(dir.path()).unwrap();
        assert!(matches!(
            remover.process_file("07_없는파일.txt"),
            Err(RenameError::Io { .. })
        ));
    }
}
