//! Club domain model for books, members and discussions.
//!
//! # Responsibility
//! - Define canonical entity records shared by store, filter and views.
//! - Keep field-level invariants next to the records that own them.
//!
//! # Invariants
//! - Every entity is identified by an `EntityId` unique across all kinds.
//! - A discussion keeps a frozen snapshot of its book's title/author.
//! - Nothing is ever hard-deleted.

pub mod book;
pub mod club_data;
pub mod discussion;
pub mod member;
pub mod validation;

/// Stable integer identifier shared by every entity kind.
pub type EntityId = u64;

/// Entity category used in not-found reporting and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Book,
    Member,
    Discussion,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Member => "member",
            Self::Discussion => "discussion",
        }
    }
}
