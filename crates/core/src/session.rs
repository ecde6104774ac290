//! Reading session
//!
//! Couples a [`Navigator`] with a [`ProgressStore`]. This is the whole
//! surface a front end needs: jump, advance, current position, restore and
//! save.

use crate::config::RolloverPolicy;
use crate::models::{Cursor, Document};
use crate::navigator::{NavigationError, Navigator};
use crate::progress::{ProgressError, ProgressStore, SavedProgress};
use tracing::debug;

/// A navigator plus its persisted cursor
#[derive(Debug)]
pub struct ReadingSession<'d> {
    navigator: Navigator<'d>,
    store: ProgressStore,
    restored: bool,
}

impl<'d> ReadingSession<'d> {
    /// Create a session over `document`, persisting to `store`
    pub fn new(document: &'d Document, store: ProgressStore, policy: RolloverPolicy) -> Self {
        Self {
            navigator: Navigator::new(document).with_policy(policy),
            store,
            restored: false,
        }
    }

    /// Restore the saved cursor. Only the first call reads the store; later
    /// calls return `Ok(None)` and leave the cursor alone.
    pub fn restore(&mut self) -> Result<Option<SavedProgress>, ProgressError> {
        if self.restored {
            debug!("progress already restored");
            return Ok(None);
        }
        self.restored = true;

        let saved = self.store.load()?;
        if let Some(progress) = &saved {
            self.navigator.set_cursor(progress.cursor.clone());
        }
        Ok(saved)
    }

    /// Jump to an explicit location
    pub fn jump_to(
        &mut self,
        book: &str,
        chapter: u32,
        verse: u32,
    ) -> Result<&'d str, NavigationError> {
        self.navigator.jump_to(book, chapter, verse)
    }

    /// Advance to the next verse
    pub fn advance(&mut self) -> Result<&'d str, NavigationError> {
        self.navigator.advance()
    }

    /// Text at the current cursor, if any
    pub fn current_text(&self) -> Option<&'d str> {
        self.navigator.current_text()
    }

    /// The current cursor
    pub fn position(&self) -> &Cursor {
        self.navigator.cursor()
    }

    /// Persist the current cursor
    pub fn save(&self) -> Result<SavedProgress, ProgressError> {
        self.store.save(self.navigator.cursor())
    }

    /// The underlying navigator
    pub fn navigator(&self) -> &Navigator<'d> {
        &self.navigator
    }

    /// The progress store
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use tempfile::TempDir;

    fn document() -> Document {
        parse(["창세기", "제1장", "1 태초에", "2 땅이", "3 빛이 있으라"]).document
    }

    #[test]
    fn test_resume_across_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.txt");
        let doc = document();

        let mut first = ReadingSession::new(&doc, ProgressStore::new(&path), RolloverPolicy::Count);
        assert_eq!(first.restore().unwrap(), None);
        first.jump_to("창세기", 1, 1).unwrap();
        first.advance().unwrap();
        first.save().unwrap();

        let mut second =
            ReadingSession::new(&doc, ProgressStore::new(&path), RolloverPolicy::Count);
        let restored = second.restore().unwrap().unwrap();
        assert_eq!(restored.cursor, Cursor::new("창세기", 1, 2));
        assert_eq!(second.current_text(), Some("땅이"));
        assert_eq!(second.advance().unwrap(), "빛이 있으라");
    }

    #[test]
    fn test_restore_happens_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.txt");
        let doc = document();
        ProgressStore::new(&path)
            .save(&Cursor::new("창세기", 1, 3))
            .unwrap();

        let mut session = ReadingSession::new(&doc, ProgressStore::new(&path), RolloverPolicy::Count);
        assert!(session.restore().unwrap().is_some());
        session.jump_to("창세기", 1, 1).unwrap();

        assert_eq!(session.restore().unwrap(), None);
        assert_eq!(session.position(), &Cursor::new("창세기", 1, 1));
    }

    #[test]
    fn test_save_without_position() {
        let dir = TempDir::new().unwrap();
        let doc = document();
        let session = ReadingSession::new(
            &doc,
            ProgressStore::new(dir.path().join("progress.txt")),
            RolloverPolicy::Count,
        );
        assert!(matches!(session.save(), Err(ProgressError::EmptyCursor)));
    }

    #[test]
    fn test_failed_jump_keeps_saved_position() {
        let dir = TempDir::new().unwrap();
        let doc = document();
        let mut session = ReadingSession::new(
            &doc,
            ProgressStore::new(dir.path().join("progress.txt")),
            RolloverPolicy::Count,
        );
        session.jump_to("창세기", 1, 2).unwrap();
        assert!(session.jump_to("창세기", 2, 1).is_err());

        let saved = session.save().unwrap();
        assert_eq!(saved.cursor, Cursor::new("창세기", 1, 2));
    }
}
