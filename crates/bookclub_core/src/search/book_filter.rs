//! In-memory book filtering.
//!
//! # Invariants
//! - Output keeps input order; nothing is re-sorted.
//! - Inputs are never mutated.
//! - Filtering a filtered result with the same criteria is a no-op.

use crate::model::book::{Book, BookStatus};

/// Active filter criteria; `None`/blank fields do not narrow the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring matched against title or author.
    pub search_term: Option<String>,
    pub status: Option<BookStatus>,
    /// Inclusive lower bound on `rating`.
    pub min_rating: Option<u8>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: BookStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_min_rating(mut self, min_rating: u8) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// Whether any criterion can exclude a book.
    pub fn is_active(&self) -> bool {
        self.needle().is_some()
            || self.status.is_some()
            || self.min_rating.is_some_and(|rating| rating > 0)
    }

    /// Applies all criteria to one book.
    pub fn matches(&self, book: &Book) -> bool {
        self.matcher().matches(book)
    }

    fn needle(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    fn matcher(&self) -> Matcher {
        Matcher {
            needle: self.needle(),
            status: self.status,
            min_rating: self.min_rating,
        }
    }
}

struct Matcher {
    needle: Option<String>,
    status: Option<BookStatus>,
    min_rating: Option<u8>,
}

impl Matcher {
    fn matches(&self, book: &Book) -> bool {
        let text_ok = self.needle.as_deref().map_or(true, |needle| {
            book.title.to_lowercase().contains(needle)
                || book.author.to_lowercase().contains(needle)
        });
        let status_ok = self.status.map_or(true, |status| book.status == status);
        let rating_ok = self.min_rating.map_or(true, |min| book.rating >= min);
        text_ok && status_ok && rating_ok
    }
}

/// Returns the books matching `filter`, in input order.
///
/// Accepts any iterator of book references, so a previous result can be
/// filtered again with `result.iter().copied()`.
pub fn filter_books<'a, I>(books: I, filter: &BookFilter) -> Vec<&'a Book>
where
    I: IntoIterator<Item = &'a Book>,
{
    let matcher = filter.matcher();
    books
        .into_iter()
        .filter(|book| matcher.matches(book))
        .collect()
}
