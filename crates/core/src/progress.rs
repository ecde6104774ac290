//! Reading progress persistence
//!
//! The saved position is a two-line text record:
//!
//! ```text
//! 창세기,1,3
//! 2024-05-01 07:30:00
//! ```
//!
//! Line 1 is `book,chapter,verse`; line 2 is the save time, advisory only.

use crate::models::Cursor;
use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Timestamp layout of line 2
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Progress store errors
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed progress record in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("No reading position to save")]
    EmptyCursor,
}

/// A restored reading position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProgress {
    /// The saved cursor
    pub cursor: Cursor,

    /// When it was saved, if line 2 was readable
    pub saved_at: Option<NaiveDateTime>,
}

/// File-backed store for a single cursor
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved position. A missing file means no position was ever
    /// saved and yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<SavedProgress>, ProgressError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved progress");
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        let progress = self.parse_record(&content)?;
        debug!(position = %progress.cursor, "restored progress");
        Ok(Some(progress))
    }

    /// Write the position with the current local time
    pub fn save(&self, cursor: &Cursor) -> Result<SavedProgress, ProgressError> {
        let now = Local::now().naive_local();
        self.save_at(cursor, now)
    }

    /// Write the position with an explicit timestamp
    pub fn save_at(
        &self,
        cursor: &Cursor,
        at: NaiveDateTime,
    ) -> Result<SavedProgress, ProgressError> {
        if cursor.is_empty() {
            return Err(ProgressError::EmptyCursor);
        }

        let record = format!(
            "{},{},{}\n{}",
            cursor.book,
            cursor.chapter,
            cursor.verse,
            at.format(TIMESTAMP_FORMAT)
        );
        fs::write(&self.path, record)?;
        info!(position = %cursor, path = %self.path.display(), "saved progress");

        Ok(SavedProgress {
            cursor: cursor.clone(),
            saved_at: Some(at),
        })
    }

    fn parse_record(&self, content: &str) -> Result<SavedProgress, ProgressError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.lines();
        let first = lines.next().map(str::trim).unwrap_or_default();

        // split from the right so a comma inside a book name survives
        let mut fields = first.rsplitn(3, ',');
        let verse = fields.next();
        let chapter = fields.next();
        let book = fields.next();

        let (Some(book), Some(chapter), Some(verse)) = (book, chapter, verse) else {
            return Err(self.malformed(format!(
                "expected `book,chapter,verse`, found {:?}",
                first
            )));
        };

        let book = book.trim();
        if book.is_empty() {
            return Err(self.malformed("empty book name".to_string()));
        }
        let chapter = self.parse_number("chapter", chapter)?;
        let verse = self.parse_number("verse", verse)?;

        let saved_at = lines
            .next()
            .and_then(|line| NaiveDateTime::parse_from_str(line.trim(), TIMESTAMP_FORMAT).ok());

        Ok(SavedProgress {
            cursor: Cursor::new(book, chapter, verse),
            saved_at,
        })
    }

    fn parse_number(&self, field: &str, value: &str) -> Result<u32, ProgressError> {
        value
            .trim()
            .parse::<u32>()
            .map_err(|e| self.malformed(format!("{} {:?}: {}", field, value, e)))
    }

    fn malformed(&self, reason: String) -> ProgressError {
        ProgressError::Malformed {
            path: self.path.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path().join("bible_progress.txt"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_no_progress() {
        let (_dir, store) = store();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let cursor = Cursor::new("창세기", 1, 1);
        store.save(&cursor).unwrap();

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.cursor, cursor);
        assert!(restored.saved_at.is_some());
    }

    #[test]
    fn test_record_layout() {
        let (_dir, store) = store();
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        store.save_at(&Cursor::new("시편", 119, 105), at).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "시편,119,105\n2024-05-01 07:30:00");

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.saved_at, Some(at));
    }

    #[test]
    fn test_timestamp_line_is_advisory() {
        let (_dir, store) = store();
        fs::write(store.path(), "창세기,1,1\n어제쯤").unwrap();

        let restored = store.load().unwrap().unwrap();
        assert_eq!(restored.cursor, Cursor::new("창세기", 1, 1));
        assert_eq!(restored.saved_at, None);

        fs::write(store.path(), "창세기,1,1").unwrap();
        assert_eq!(
            store.load().unwrap().unwrap().cursor,
            Cursor::new("창세기", 1, 1)
        );
    }

    #[test]
    fn test_comma_in_book_name() {
        let (_dir, store) = store();
        store.save(&Cursor::new("가,나", 2, 3)).unwrap();
        assert_eq!(
            store.load().unwrap().unwrap().cursor,
            Cursor::new("가,나", 2, 3)
        );
    }

    #[test]
    fn test_malformed_record() {
        let (_dir, store) = store();
        for record in ["", "창세기", "창세기,1", "창세기,일,1", ",1,1", "창세기,1,-3"] {
            fs::write(store.path(), record).unwrap();
            assert!(
                matches!(store.load(), Err(ProgressError::Malformed { .. })),
                "record {:?} should be rejected",
                record
            );
        }
    }

    #[test]
    fn test_empty_cursor_is_not_saved() {
        let (_dir, store) = store();
        assert!(matches!(
            store.save(&Cursor::default()),
            Err(ProgressError::EmptyCursor)
        ));
        assert!(!store.path().exists());
    }
}
