//! Book domain model.
//!
//! # Responsibility
//! - Define the reading-list record and its lifecycle status.
//! - Own progress/rating mutation rules so every caller applies them the
//!   same way.
//!
//! # Invariants
//! - `current_page <= total_pages`.
//! - `status == Completed` whenever `current_page == total_pages > 0`.
//! - `rating` stays within `0..=MAX_RATING`.

use crate::model::validation::{require_text, ValidationError, MAX_RATING};
use crate::model::EntityId;
use serde::{Deserialize, Serialize};

/// Placeholder stored when no reading date was scheduled.
pub const UNSCHEDULED_READING_DATE: &str = "TBD";

/// Reading lifecycle of a club book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    /// On the list, not started.
    #[default]
    Planned,
    /// Currently being read; progress is tracked.
    Reading,
    /// Finished.
    Completed,
}

impl BookStatus {
    /// Stable wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Reading => "reading",
            Self::Completed => "completed",
        }
    }

    /// Parses a wire value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "planned" => Some(Self::Planned),
            "reading" => Some(Self::Reading),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Canonical book record as persisted in the club blob.
///
/// Fields other than `id`/`title`/`author` carry serde defaults so blobs
/// written before ratings and progress existed still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    /// Free-form scheduled date, or `"TBD"`.
    #[serde(default = "unscheduled")]
    pub reading_date: String,
    #[serde(default)]
    pub status: BookStatus,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub date_added: String,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
}

fn unscheduled() -> String {
    UNSCHEDULED_READING_DATE.to_string()
}

/// Input for creating a book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    /// Blank or `None` is stored as `"TBD"`.
    pub reading_date: Option<String>,
    /// Defaults to `Planned`.
    pub status: Option<BookStatus>,
    pub total_pages: u32,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_total_pages(mut self, total_pages: u32) -> Self {
        self.total_pages = total_pages;
        self
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_reading_date(mut self, reading_date: impl Into<String>) -> Self {
        self.reading_date = Some(reading_date.into());
        self
    }
}

impl Book {
    /// Builds a new book from validated input.
    ///
    /// # Errors
    /// - `EmptyField("title")` / `EmptyField("author")` for blank text.
    pub fn create(
        id: EntityId,
        input: NewBook,
        date_added: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = require_text("title", &input.title)?;
        let author = require_text("author", &input.author)?;
        let reading_date = input
            .reading_date
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(unscheduled);

        Ok(Self {
            id,
            title,
            author,
            reading_date,
            status: input.status.unwrap_or_default(),
            rating: 0,
            date_added: date_added.into(),
            total_pages: input.total_pages,
            current_page: 0,
        })
    }

    /// Sets the rating after range validation.
    pub fn set_rating(&mut self, rating: i64) -> Result<(), ValidationError> {
        let value = u8::try_from(rating)
            .ok()
            .filter(|value| *value <= MAX_RATING)
            .ok_or(ValidationError::RatingOutOfRange(rating))?;
        self.rating = value;
        Ok(())
    }

    /// Records reading progress.
    ///
    /// Reaching the last page of a book with pages forces `Completed`.
    /// Other statuses are left untouched.
    pub fn set_progress(&mut self, page: i64) -> Result<(), ValidationError> {
        let value = u32::try_from(page)
            .ok()
            .filter(|value| *value <= self.total_pages)
            .ok_or(ValidationError::PageOutOfRange {
                page,
                total_pages: self.total_pages,
            })?;
        self.current_page = value;
        self.apply_completion();
        Ok(())
    }

    /// Changes the lifecycle status while keeping progress consistent.
    ///
    /// `Completed` moves progress to the last page. Leaving `Completed` is
    /// rejected once every page has been read.
    pub fn set_status(&mut self, status: BookStatus) -> Result<(), ValidationError> {
        if status == BookStatus::Completed {
            self.current_page = self.total_pages;
        } else if self.is_finished() {
            return Err(ValidationError::StatusConflictsWithProgress {
                current_page: self.current_page,
                total_pages: self.total_pages,
            });
        }
        self.status = status;
        Ok(())
    }

    /// Whether all pages of a paged book have been read.
    pub fn is_finished(&self) -> bool {
        self.total_pages > 0 && self.current_page == self.total_pages
    }

    /// Repairs records decoded from storage so invariants hold again.
    ///
    /// Returns `true` when a field changed.
    pub fn normalize(&mut self) -> bool {
        let before = (self.current_page, self.rating, self.status);
        self.current_page = self.current_page.min(self.total_pages);
        self.rating = self.rating.min(MAX_RATING);
        self.apply_completion();
        before != (self.current_page, self.rating, self.status)
    }

    fn apply_completion(&mut self) {
        if self.is_finished() {
            self.status = BookStatus::Completed;
        }
    }
}
