//! Discussion thread model.
//!
//! # Invariants
//! - `book_title`/`book_author` are copied when the thread starts and never
//!   follow later edits of the book.
//! - `book_id` is a weak reference; the book may be missing on load.
//! - Messages are append-only and keep insertion order.

use crate::model::book::Book;
use crate::model::validation::{require_text, ValidationError};
use crate::model::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: EntityId,
    pub book_id: EntityId,
    pub book_title: String,
    pub book_author: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: EntityId,
    pub author: String,
    pub content: String,
    pub timestamp: String,
}

impl Discussion {
    /// Opens an empty thread with a snapshot of `book`.
    pub fn start(id: EntityId, book: &Book, created_date: impl Into<String>) -> Self {
        Self {
            id,
            book_id: book.id,
            book_title: book.title.clone(),
            book_author: book.author.clone(),
            created_date: created_date.into(),
            messages: Vec::new(),
        }
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Largest id used by the thread or any of its messages.
    pub fn max_id(&self) -> EntityId {
        self.messages
            .iter()
            .map(|message| message.id)
            .fold(self.id, EntityId::max)
    }
}

impl Message {
    /// Builds a message; blank content is rejected.
    pub fn create(
        id: EntityId,
        author: impl Into<String>,
        content: &str,
        timestamp: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = require_text("content", content)?;
        Ok(Self {
            id,
            author: author.into(),
            content,
            timestamp: timestamp.into(),
        })
    }
}
