//! Persisted club blob shape.
//!
//! # Responsibility
//! - Own the three entity collections as one serializable unit.
//! - Decode stored blobs leniently: a top-level key that is not a list is
//!   treated as absent, and a list entry that cannot be decoded is skipped
//!   without affecting its siblings.
//!
//! # Invariants
//! - Unknown top-level keys survive a decode/encode cycle.
//! - Collections keep insertion order.

use crate::model::book::Book;
use crate::model::discussion::Discussion;
use crate::model::member::Member;
use crate::model::EntityId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

pub const BOOKS_KEY: &str = "books";
pub const MEMBERS_KEY: &str = "members";
pub const DISCUSSIONS_KEY: &str = "discussions";

/// All club state, serialized as
/// `{"books": [...], "members": [...], "discussions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClubData {
    pub books: Vec<Book>,
    pub members: Vec<Member>,
    pub discussions: Vec<Discussion>,
    /// Top-level keys this version does not understand.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stored data dropped by a lenient decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// Known key holding something other than a list; loaded as empty.
    Key(&'static str),
    /// Entries of a known list that failed to decode and were skipped.
    Entries { key: &'static str, count: usize },
}

impl Rejected {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Key(key) | Self::Entries { key, .. } => key,
        }
    }
}

impl Display for Rejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Entries { key, count } => write!(f, "{key}[{count}]"),
        }
    }
}

/// Result of a lenient blob decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClubData {
    pub data: ClubData,
    /// Everything dropped while decoding, in key order.
    pub rejected: Vec<Rejected>,
}

impl ClubData {
    /// Decodes a stored blob.
    ///
    /// # Errors
    /// - Returns the JSON error when the blob is not a JSON object at all.
    pub fn decode(blob: &str) -> Result<DecodedClubData, serde_json::Error> {
        let mut object: Map<String, Value> = serde_json::from_str(blob)?;
        let mut rejected = Vec::new();

        let books = take_collection(&mut object, BOOKS_KEY, &mut rejected);
        let members = take_collection(&mut object, MEMBERS_KEY, &mut rejected);
        let discussions = take_collection(&mut object, DISCUSSIONS_KEY, &mut rejected);

        Ok(DecodedClubData {
            data: Self {
                books,
                members,
                discussions,
                extra: object,
            },
            rejected,
        })
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Largest id used anywhere in the collections, `0` when empty.
    pub fn max_id(&self) -> EntityId {
        let books = self.books.iter().map(|book| book.id);
        let members = self.members.iter().map(|member| member.id);
        let discussions = self.discussions.iter().map(Discussion::max_id);
        books.chain(members).chain(discussions).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.members.is_empty() && self.discussions.is_empty()
    }
}

fn take_collection<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    key: &'static str,
    rejected: &mut Vec<Rejected>,
) -> Vec<T> {
    let entries = match object.remove(key) {
        None => return Vec::new(),
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            rejected.push(Rejected::Key(key));
            return Vec::new();
        }
    };

    let total = entries.len();
    let items = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect::<Vec<T>>();
    if items.len() < total {
        rejected.push(Rejected::Entries {
            key,
            count: total - items.len(),
        });
    }
    items
}
