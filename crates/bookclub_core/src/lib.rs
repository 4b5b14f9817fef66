//! Core domain logic for the book club manager.
//! This crate is the single source of truth for club state invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod view;

pub use config::{default_log_level, ConfigError, LoggingConfig, StoreConfig};
pub use logging::{init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookStatus, NewBook};
pub use model::club_data::{ClubData, Rejected};
pub use model::discussion::{Discussion, Message};
pub use model::member::{Member, MemberRole, NewMember};
pub use model::validation::ValidationError;
pub use model::{EntityId, EntityKind};
pub use repo::blob_repo::{
    MemoryPersistence, PersistenceAdapter, PersistenceError, PersistenceResult,
    SqlitePersistence,
};
pub use search::book_filter::{filter_books, BookFilter};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::club_store::{ClubStore, LoadStatus, StoreError, StoreResult};
pub use view::projector::{
    project_book, project_book_list, project_discussion, project_discussion_list,
    project_member, project_member_list, project_message, project_message_list, BookView,
    DiscussionView, MemberView, MessageView, StarSlot,
};
pub use view::{EmptyState, Projection};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
