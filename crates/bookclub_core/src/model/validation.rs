//! Field validation errors shared by all entity constructors.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest rating a book can carry.
pub const MAX_RATING: u8 = 5;

/// Rejected input for an entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    EmptyField(&'static str),
    /// Email does not contain an `@` separator.
    InvalidEmail,
    /// Rating outside `0..=MAX_RATING`.
    RatingOutOfRange(i64),
    /// Page outside `0..=total_pages`.
    PageOutOfRange { page: i64, total_pages: u32 },
    /// Requested status contradicts recorded progress.
    StatusConflictsWithProgress { current_page: u32, total_pages: u32 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain `@`"),
            Self::RatingOutOfRange(value) => {
                write!(f, "rating {value} is outside 0..={MAX_RATING}")
            }
            Self::PageOutOfRange { page, total_pages } => {
                write!(f, "page {page} is outside 0..={total_pages}")
            }
            Self::StatusConflictsWithProgress {
                current_page,
                total_pages,
            } => write!(
                f,
                "book is finished ({current_page}/{total_pages} pages); status must stay completed"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
