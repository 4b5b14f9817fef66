//! Display-ready projections of club state.
//!
//! # Responsibility
//! - Map entities into view records with derived fields.
//! - Report empty lists through sentinels whose wording tells "nothing
//!   stored yet" apart from "nothing matches the filter".
//!
//! # Invariants
//! - Projections are pure and never trigger persistence.

pub mod projector;

use serde::Serialize;

/// Why a projected list has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    NoBooks,
    NoMatchingBooks,
    NoMembers,
    NoDiscussions,
    NoMessages,
}

impl EmptyState {
    /// User-facing placeholder text.
    pub fn message(self) -> &'static str {
        match self {
            Self::NoBooks => "No books yet. Add your first book to get started.",
            Self::NoMatchingBooks => "No books match your search or filters.",
            Self::NoMembers => "No members yet. Invite someone to join the club.",
            Self::NoDiscussions => "No discussions yet. Start one from a book.",
            Self::NoMessages => "No messages yet. Be the first to share your thoughts.",
        }
    }
}

/// A projected list, or the reason it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Projection<T> {
    Items(Vec<T>),
    Empty(EmptyState),
}

impl<T> Projection<T> {
    /// Wraps `items`, substituting `empty` when there are none.
    pub fn from_items(items: Vec<T>, empty: EmptyState) -> Self {
        if items.is_empty() {
            Self::Empty(empty)
        } else {
            Self::Items(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            Self::Empty(_) => &[],
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        match self {
            Self::Items(_) => None,
            Self::Empty(state) => Some(*state),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }
}
