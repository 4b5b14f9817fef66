//! Club store: the single source of truth for books, members and
//! discussions.
//!
//! # Responsibility
//! - Own all entity collections and every mutation on them.
//! - Enforce field and referential invariants before persisting.
//! - Load the persisted blob leniently; malformed data degrades to empty.
//!
//! # Invariants
//! - Mutations are atomic: they run on a working copy that replaces live
//!   state only after validation and a successful save.
//! - At most one discussion exists per book.
//! - Ids come from one monotonic sequence and are never reused.
//! - The store holds no presentation state (e.g. the open discussion).

use crate::config::StoreConfig;
use crate::model::book::{Book, BookStatus, NewBook};
use crate::model::club_data::{ClubData, Rejected};
use crate::model::discussion::{Discussion, Message};
use crate::model::member::{Member, NewMember};
use crate::model::validation::ValidationError;
use crate::model::{EntityId, EntityKind};
use crate::repo::blob_repo::{PersistenceAdapter, PersistenceError};
use crate::service::clock::{Clock, SystemClock};
use crate::service::ids::IdSequence;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Recoverable failure of a store operation.
#[derive(Debug)]
pub enum StoreError {
    /// Missing or out-of-range input.
    Validation(ValidationError),
    /// Referenced entity does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// The book already has a discussion.
    Conflict {
        book_id: EntityId,
        discussion_id: EntityId,
    },
    /// Every id up to `EntityId::MAX` is taken; nothing can be created.
    IdsExhausted,
    /// The blob could not be written; state is unchanged.
    Persistence(PersistenceError),
}

impl StoreError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::IdsExhausted => "ids_exhausted",
            Self::Persistence(_) => "persistence",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.as_str()),
            Self::Conflict {
                book_id,
                discussion_id,
            } => write!(
                f,
                "book {book_id} already has discussion {discussion_id}"
            ),
            Self::IdsExhausted => write!(f, "no entity ids left"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict { .. } | Self::IdsExhausted => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// How the last `load()` resolved the stored blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No blob stored; collections are empty.
    Missing,
    /// Every present key decoded.
    Loaded,
    /// Some stored data could not be decoded and was dropped.
    Partial(Vec<Rejected>),
    /// Blob was not a JSON object; collections are empty.
    Malformed,
    /// Adapter read failed; collections are empty.
    Unreadable,
}

/// Club state owner with an injected persistence adapter and clock.
pub struct ClubStore<P: PersistenceAdapter, C: Clock = SystemClock> {
    adapter: P,
    clock: C,
    config: StoreConfig,
    data: ClubData,
    ids: IdSequence,
}

impl<P: PersistenceAdapter> ClubStore<P> {
    /// Creates an empty store on the system clock with default config.
    ///
    /// Nothing is read until `load()` is called.
    pub fn new(adapter: P) -> Self {
        Self::with_parts(adapter, SystemClock, StoreConfig::default())
    }

    /// Creates a store and loads the persisted blob.
    pub fn open(adapter: P) -> Self {
        let mut store = Self::new(adapter);
        store.load();
        store
    }
}

impl<P: PersistenceAdapter, C: Clock> ClubStore<P, C> {
    pub fn with_parts(adapter: P, clock: C, config: StoreConfig) -> Self {
        Self {
            adapter,
            clock,
            config,
            data: ClubData::default(),
            ids: IdSequence::default(),
        }
    }

    /// Replaces in-memory state with the persisted blob.
    ///
    /// Never fails: a missing, unreadable or malformed blob yields empty
    /// collections, and a malformed top-level key yields an empty collection.
    pub fn load(&mut self) -> LoadStatus {
        let key = self.config.storage_key.as_str();
        let (mut data, status) = match self.adapter.load_blob(key) {
            Ok(None) => (ClubData::default(), LoadStatus::Missing),
            Ok(Some(blob)) => match ClubData::decode(&blob) {
                Ok(decoded) if decoded.rejected.is_empty() => (decoded.data, LoadStatus::Loaded),
                Ok(decoded) => (decoded.data, LoadStatus::Partial(decoded.rejected)),
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=degraded reason=malformed_blob error={err}"
                    );
                    (ClubData::default(), LoadStatus::Malformed)
                }
            },
            Err(err) => {
                warn!(
                    "event=store_load module=store status=degraded reason=read_failed error={err}"
                );
                (ClubData::default(), LoadStatus::Unreadable)
            }
        };

        let repaired = data
            .books
            .iter_mut()
            .map(Book::normalize)
            .filter(|changed| *changed)
            .count();
        self.ids.observe(data.max_id());
        self.data = data;

        if let LoadStatus::Partial(rejected) = &status {
            let dropped = rejected
                .iter()
                .map(Rejected::to_string)
                .collect::<Vec<_>>()
                .join(",");
            warn!("event=store_load module=store status=degraded reason=malformed_data dropped={dropped}");
        }
        if self.ids.is_exhausted() {
            warn!("event=store_load module=store status=degraded reason=ids_exhausted");
        }
        info!(
            "event=store_load module=store status=ok books={} members={} discussions={} repaired_books={}",
            self.data.books.len(),
            self.data.members.len(),
            self.data.discussions.len(),
            repaired
        );
        status
    }

    /// Adds a book with defaults: `planned`, rating 0, page 0, added today.
    ///
    /// # Errors
    /// - `Validation` for a blank title or author.
    pub fn add_book(&mut self, input: NewBook) -> StoreResult<Book> {
        let today = self.clock.today();
        self.commit("book_add", |data, ids| {
            let book = Book::create(allocate(ids)?, input, today)?;
            data.books.push(book.clone());
            Ok(book)
        })
        .inspect(|book| debug!("event=book_add module=store status=ok book_id={}", book.id))
    }

    /// Registers a member who joins today.
    ///
    /// # Errors
    /// - `Validation` for a blank name/email or an email without `@`.
    pub fn add_member(&mut self, input: NewMember) -> StoreResult<Member> {
        let today = self.clock.today();
        self.commit("member_add", |data, ids| {
            let member = Member::create(allocate(ids)?, input, today)?;
            data.members.push(member.clone());
            Ok(member)
        })
        .inspect(|member| {
            debug!(
                "event=member_add module=store status=ok member_id={}",
                member.id
            )
        })
    }

    /// Opens the discussion for a book, snapshotting its title and author.
    ///
    /// # Errors
    /// - `NotFound` when the book does not exist.
    /// - `Conflict` when the book already has a discussion.
    pub fn start_discussion(&mut self, book_id: EntityId) -> StoreResult<Discussion> {
        let today = self.clock.today();
        self.commit("discussion_start", |data, ids| {
            let book = find_book(&data.books, book_id)?;
            if let Some(existing) = data.discussions.iter().find(|d| d.book_id == book_id) {
                return Err(StoreError::Conflict {
                    book_id,
                    discussion_id: existing.id,
                });
            }
            let discussion = Discussion::start(allocate(ids)?, book, today);
            data.discussions.push(discussion.clone());
            Ok(discussion)
        })
        .inspect(|discussion| {
            debug!(
                "event=discussion_start module=store status=ok discussion_id={} book_id={}",
                discussion.id, discussion.book_id
            )
        })
    }

    /// Appends a message authored by the configured placeholder.
    ///
    /// # Errors
    /// - `Validation` for blank content.
    /// - `NotFound` when the discussion does not exist.
    pub fn add_message(
        &mut self,
        discussion_id: EntityId,
        content: &str,
    ) -> StoreResult<Message> {
        let timestamp = self.clock.timestamp();
        let author = self.config.message_author.clone();
        self.commit("message_add", |data, ids| {
            if content.trim().is_empty() {
                return Err(ValidationError::EmptyField("content").into());
            }
            let discussion = data
                .discussions
                .iter_mut()
                .find(|discussion| discussion.id == discussion_id)
                .ok_or(StoreError::NotFound {
                    kind: EntityKind::Discussion,
                    id: discussion_id,
                })?;
            let message = Message::create(allocate(ids)?, author, content, timestamp)?;
            discussion.messages.push(message.clone());
            Ok(message)
        })
        .inspect(|message| {
            debug!(
                "event=message_add module=store status=ok discussion_id={} message_id={}",
                discussion_id, message.id
            )
        })
    }

    /// Sets a book's rating.
    ///
    /// # Errors
    /// - `NotFound` when the book does not exist.
    /// - `Validation` when `rating` is outside `0..=5`.
    pub fn rate_book(&mut self, book_id: EntityId, rating: i64) -> StoreResult<Book> {
        self.commit("book_rate", |data, _| {
            let book = find_book_mut(&mut data.books, book_id)?;
            book.set_rating(rating)?;
            Ok(book.clone())
        })
    }

    /// Records the current page; the last page completes the book.
    ///
    /// # Errors
    /// - `NotFound` when the book does not exist.
    /// - `Validation` when `new_page` is outside `0..=total_pages`.
    pub fn update_progress(&mut self, book_id: EntityId, new_page: i64) -> StoreResult<Book> {
        self.commit("book_progress", |data, _| {
            let book = find_book_mut(&mut data.books, book_id)?;
            book.set_progress(new_page)?;
            Ok(book.clone())
        })
    }

    /// Changes a book's status.
    ///
    /// # Errors
    /// - `NotFound` when the book does not exist.
    /// - `Validation` when moving a finished book out of `completed`.
    pub fn set_book_status(
        &mut self,
        book_id: EntityId,
        status: BookStatus,
    ) -> StoreResult<Book> {
        self.commit("book_status", |data, _| {
            let book = find_book_mut(&mut data.books, book_id)?;
            book.set_status(status)?;
            Ok(book.clone())
        })
    }

    pub fn books(&self) -> &[Book] {
        &self.data.books
    }

    pub fn members(&self) -> &[Member] {
        &self.data.members
    }

    pub fn discussions(&self) -> &[Discussion] {
        &self.data.discussions
    }

    pub fn book(&self, id: EntityId) -> Option<&Book> {
        self.data.books.iter().find(|book| book.id == id)
    }

    pub fn member(&self, id: EntityId) -> Option<&Member> {
        self.data.members.iter().find(|member| member.id == id)
    }

    pub fn discussion(&self, id: EntityId) -> Option<&Discussion> {
        self.data
            .discussions
            .iter()
            .find(|discussion| discussion.id == id)
    }

    pub fn discussion_for_book(&self, book_id: EntityId) -> Option<&Discussion> {
        self.data
            .discussions
            .iter()
            .find(|discussion| discussion.book_id == book_id)
    }

    /// Full in-memory state.
    pub fn data(&self) -> &ClubData {
        &self.data
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    fn commit<T>(
        &mut self,
        event: &'static str,
        mutate: impl FnOnce(&mut ClubData, &mut IdSequence) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut working = self.data.clone();
        let result = mutate(&mut working, &mut self.ids).and_then(|value| {
            self.persist(&working)?;
            Ok(value)
        });

        match result {
            Ok(value) => {
                self.data = working;
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event={event} module=store status=error error_code={}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    fn persist(&self, data: &ClubData) -> StoreResult<()> {
        let blob = data.encode().map_err(PersistenceError::from)?;
        self.adapter
            .save_blob(&self.config.storage_key, &blob)
            .map_err(StoreError::from)
    }
}

fn allocate(ids: &mut IdSequence) -> StoreResult<EntityId> {
    ids.next_id().ok_or(StoreError::IdsExhausted)
}

fn find_book(books: &[Book], id: EntityId) -> StoreResult<&Book> {
    books
        .iter()
        .find(|book| book.id == id)
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Book,
            id,
        })
}

fn find_book_mut(books: &mut [Book], id: EntityId) -> StoreResult<&mut Book> {
    books
        .iter_mut()
        .find(|book| book.id == id)
        .ok_or(StoreError::NotFound {
            kind: EntityKind::Book,
            id,
        })
}
