//! Entity to view-record mapping.

use crate::model::book::{Book, BookStatus};
use crate::model::discussion::{Discussion, Message};
use crate::model::member::{Member, MemberRole};
use crate::model::validation::MAX_RATING;
use crate::model::EntityId;
use crate::search::book_filter::{filter_books, BookFilter};
use crate::view::{EmptyState, Projection};
use serde::Serialize;

/// One star in the rating widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarSlot {
    pub filled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    pub reading_date: String,
    pub status: BookStatus,
    pub status_label: &'static str,
    /// Badge style token, e.g. `status-reading`.
    pub status_badge: &'static str,
    pub rating: u8,
    pub stars: [StarSlot; MAX_RATING as usize],
    pub date_added: String,
    pub current_page: u32,
    pub total_pages: u32,
    /// `None` for books without a page count.
    pub progress_percent: Option<u8>,
    pub shows_progress_input: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    /// Capitalized role, also for roles this version does not know.
    pub role_label: String,
    pub join_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionView {
    pub id: EntityId,
    pub book_id: EntityId,
    pub book_title: String,
    pub book_author: String,
    /// `"<title> by <author>"` from the snapshot.
    pub heading: String,
    pub created_date: String,
    pub message_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: EntityId,
    pub author: String,
    pub content: String,
    pub timestamp: String,
}

pub fn project_book(book: &Book) -> BookView {
    BookView {
        id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        reading_date: book.reading_date.clone(),
        status: book.status,
        status_label: status_label(book.status),
        status_badge: status_badge(book.status),
        rating: book.rating,
        stars: star_slots(book.rating),
        date_added: book.date_added.clone(),
        current_page: book.current_page,
        total_pages: book.total_pages,
        progress_percent: progress_percent(book.current_page, book.total_pages),
        shows_progress_input: book.status == BookStatus::Reading,
    }
}

pub fn project_member(member: &Member) -> MemberView {
    MemberView {
        id: member.id,
        name: member.name.clone(),
        email: member.email.clone(),
        role: member.role.clone(),
        role_label: role_label(&member.role),
        join_date: member.join_date.clone(),
    }
}

pub fn project_discussion(discussion: &Discussion) -> DiscussionView {
    DiscussionView {
        id: discussion.id,
        book_id: discussion.book_id,
        book_title: discussion.book_title.clone(),
        book_author: discussion.book_author.clone(),
        heading: format!("{} by {}", discussion.book_title, discussion.book_author),
        created_date: discussion.created_date.clone(),
        message_count: discussion.message_count(),
    }
}

pub fn project_message(message: &Message) -> MessageView {
    MessageView {
        id: message.id,
        author: message.author.clone(),
        content: message.content.clone(),
        timestamp: message.timestamp.clone(),
    }
}

/// Projects the books that pass `filter`.
///
/// An empty collection reports `NoBooks` even while a filter is active;
/// `NoMatchingBooks` is reserved for an active filter that hides every book.
pub fn project_book_list(books: &[Book], filter: &BookFilter) -> Projection<BookView> {
    if books.is_empty() {
        return Projection::Empty(EmptyState::NoBooks);
    }
    let views = filter_books(books, filter)
        .into_iter()
        .map(project_book)
        .collect();
    let empty = if filter.is_active() {
        EmptyState::NoMatchingBooks
    } else {
        EmptyState::NoBooks
    };
    Projection::from_items(views, empty)
}

pub fn project_member_list(members: &[Member]) -> Projection<MemberView> {
    Projection::from_items(
        members.iter().map(project_member).collect(),
        EmptyState::NoMembers,
    )
}

pub fn project_discussion_list(discussions: &[Discussion]) -> Projection<DiscussionView> {
    Projection::from_items(
        discussions.iter().map(project_discussion).collect(),
        EmptyState::NoDiscussions,
    )
}

/// Projects a thread's messages in posting order.
pub fn project_message_list(discussion: &Discussion) -> Projection<MessageView> {
    Projection::from_items(
        discussion.messages.iter().map(project_message).collect(),
        EmptyState::NoMessages,
    )
}

fn status_label(status: BookStatus) -> &'static str {
    match status {
        BookStatus::Planned => "Planned",
        BookStatus::Reading => "Reading",
        BookStatus::Completed => "Completed",
    }
}

fn status_badge(status: BookStatus) -> &'static str {
    match status {
        BookStatus::Planned => "status-planned",
        BookStatus::Reading => "status-reading",
        BookStatus::Completed => "status-completed",
    }
}

fn role_label(role: &MemberRole) -> String {
    let mut chars = role.as_str().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn star_slots(rating: u8) -> [StarSlot; MAX_RATING as usize] {
    std::array::from_fn(|index| StarSlot {
        filled: index < usize::from(rating),
    })
}

/// `round(current / total * 100)` with halves rounded up.
fn progress_percent(current_page: u32, total_pages: u32) -> Option<u8> {
    if total_pages == 0 {
        return None;
    }
    let current = u64::from(current_page.min(total_pages));
    let total = u64::from(total_pages);
    let percent = (current * 200 + total) / (total * 2);
    u8::try_from(percent).ok()
}
