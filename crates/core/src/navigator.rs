//! Verse navigation
//!
//! A [`Navigator`] holds the reading cursor over a borrowed, read-only
//! [`Document`]. Any number of navigators may share one document.

use crate::config::RolloverPolicy;
use crate::models::{Cursor, Document};
use thiserror::Error;
use tracing::debug;

/// Navigation failures. Neither is fatal; the cursor is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Verse not found: {book} {chapter}장 {verse}절")]
    VerseNotFound {
        book: String,
        chapter: u32,
        verse: u32,
    },

    #[error("End of book: {book} has no verse after {chapter}장 {verse}절")]
    EndOfBook {
        book: String,
        chapter: u32,
        verse: u32,
    },
}

impl NavigationError {
    fn not_found(cursor: &Cursor) -> Self {
        NavigationError::VerseNotFound {
            book: cursor.book.clone(),
            chapter: cursor.chapter,
            verse: cursor.verse,
        }
    }

    fn end_of_book(cursor: &Cursor) -> Self {
        NavigationError::EndOfBook {
            book: cursor.book.clone(),
            chapter: cursor.chapter,
            verse: cursor.verse,
        }
    }
}

/// Cursor over a parsed document
#[derive(Debug, Clone)]
pub struct Navigator<'d> {
    document: &'d Document,
    cursor: Cursor,
    policy: RolloverPolicy,
}

impl<'d> Navigator<'d> {
    /// Create a navigator with an empty cursor and count-based rollover
    pub fn new(document: &'d Document) -> Self {
        Self {
            document,
            cursor: Cursor::default(),
            policy: RolloverPolicy::default(),
        }
    }

    /// Set advance policy (builder pattern)
    pub fn with_policy(mut self, policy: RolloverPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Start from a given cursor, e.g. a restored one. The cursor is not
    /// checked against the document; a stale cursor simply fails to display.
    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    /// The document being navigated
    pub fn document(&self) -> &'d Document {
        self.document
    }

    /// Advance policy in use
    pub fn policy(&self) -> RolloverPolicy {
        self.policy
    }

    /// The current cursor
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The current position as (book, chapter, verse)
    pub fn current_position(&self) -> (&str, u32, u32) {
        self.cursor.as_tuple()
    }

    /// Replace the cursor without looking anything up
    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Text at the current cursor, if the cursor is not stale
    pub fn current_text(&self) -> Option<&'d str> {
        let (book, chapter, verse) = self.cursor.as_tuple();
        self.document.verse(book, chapter, verse)
    }

    /// Jump to an explicit location and return its text
    pub fn jump_to(
        &mut self,
        book: &str,
        chapter: u32,
        verse: u32,
    ) -> Result<&'d str, NavigationError> {
        let target = Cursor::new(book, chapter, verse);
        match self.document.verse(book, chapter, verse) {
            Some(text) => {
                debug!(position = %target, "jump");
                self.cursor = target;
                Ok(text)
            }
            None => {
                debug!(position = %target, "jump target not found");
                Err(NavigationError::not_found(&target))
            }
        }
    }

    /// Move to the next verse, rolling over into the next chapter of the
    /// same book, and return its text
    pub fn advance(&mut self) -> Result<&'d str, NavigationError> {
        let next = match self.policy {
            RolloverPolicy::Count => self.next_by_count()?,
            RolloverPolicy::NextKey => self.next_by_key()?,
        };

        let (book, chapter, verse) = next.as_tuple();
        match self.document.verse(book, chapter, verse) {
            Some(text) => {
                debug!(from = %self.cursor, to = %next, "advance");
                self.cursor = next;
                Ok(text)
            }
            None => {
                debug!(from = %self.cursor, to = %next, "advance target not found");
                Err(NavigationError::not_found(&next))
            }
        }
    }

    /// Next position by entry counts. Relies on numbering being dense from 1.
    fn next_by_count(&self) -> Result<Cursor, NavigationError> {
        let current = &self.cursor;
        let book = self
            .document
            .book(&current.book)
            .ok_or_else(|| NavigationError::not_found(current))?;
        let chapter = book
            .chapter(current.chapter)
            .ok_or_else(|| NavigationError::not_found(current))?;

        let verse_count = chapter.verse_count() as u64;
        if u64::from(current.verse) < verse_count {
            return Ok(Cursor::new(
                current.book.clone(),
                current.chapter,
                current.verse + 1,
            ));
        }

        let chapter_count = book.chapter_count() as u64;
        if u64::from(current.chapter) < chapter_count {
            return Ok(Cursor::new(current.book.clone(), current.chapter + 1, 1));
        }

        Err(NavigationError::end_of_book(current))
    }

    /// Next position by recorded keys. Skips gaps in numbering.
    fn next_by_key(&self) -> Result<Cursor, NavigationError> {
        let current = &self.cursor;
        let book = self
            .document
            .book(&current.book)
            .ok_or_else(|| NavigationError::not_found(current))?;
        let chapter = book
            .chapter(current.chapter)
            .ok_or_else(|| NavigationError::not_found(current))?;

        if let Some(verse) = chapter.next_verse_after(current.verse) {
            return Ok(Cursor::new(current.book.clone(), current.chapter, verse));
        }

        // an empty chapter is passed over
        let mut number = current.chapter;
        while let Some(next) = book.next_chapter_after(number) {
            if let Some(verse) = book.chapter(next).and_then(|c| c.first_verse()) {
                return Ok(Cursor::new(current.book.clone(), next, verse));
            }
            number = next;
        }

        Err(NavigationError::end_of_book(current))
    }
}
