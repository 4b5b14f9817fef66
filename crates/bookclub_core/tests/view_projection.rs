use bookclub_core::{
    project_book, project_book_list, project_discussion, project_discussion_list, project_member,
    project_member_list, project_message_list, Book, BookFilter, BookStatus, ClubStore,
    EmptyState, FixedClock, MemberRole, MemoryPersistence, NewBook, NewMember, Projection,
    StoreConfig,
};

fn fixed_store(adapter: &MemoryPersistence) -> ClubStore<&MemoryPersistence, FixedClock> {
    ClubStore::with_parts(
        adapter,
        FixedClock::new("2026-10-17", "2026-10-17 19:30:00"),
        StoreConfig::default(),
    )
}

fn paged(total_pages: u32, current_page: u32, status: BookStatus) -> Book {
    let mut book = Book::create(
        1,
        NewBook::new("Dune", "Herbert").with_total_pages(total_pages),
        "2026-10-17",
    )
    .unwrap();
    book.current_page = current_page;
    book.status = status;
    book
}

#[test]
fn book_view_derives_display_fields() {
    let mut book = paged(400, 100, BookStatus::Reading);
    book.rating = 2;

    let view = project_book(&book);
    assert_eq!(view.progress_percent, Some(25));
    assert!(view.shows_progress_input);
    assert_eq!(view.status_label, "Reading");
    assert_eq!(view.status_badge, "status-reading");
    assert_eq!(
        view.stars.iter().filter(|slot| slot.filled).count(),
        usize::from(book.rating)
    );
    assert_eq!(view.stars.len(), 5);
}

#[test]
fn book_without_pages_has_no_progress() {
    let view = project_book(&paged(0, 0, BookStatus::Planned));
    assert_eq!(view.progress_percent, None);
    assert!(!view.shows_progress_input);
    assert_eq!(view.status_label, "Planned");
}

#[test]
fn progress_input_only_for_reading_status() {
    for (status, expected) in [
        (BookStatus::Planned, false),
        (BookStatus::Reading, true),
        (BookStatus::Completed, false),
    ] {
        assert_eq!(project_book(&paged(10, 5, status)).shows_progress_input, expected);
    }
}

#[test]
fn book_list_distinguishes_no_data_from_no_matches() {
    let active = BookFilter::new().with_search_term("tolkien");

    let empty = project_book_list(&[], &active);
    assert_eq!(empty.empty_state(), Some(EmptyState::NoBooks));

    let books = vec![paged(10, 0, BookStatus::Planned)];
    let no_matches = project_book_list(&books, &active);
    assert_eq!(no_matches.empty_state(), Some(EmptyState::NoMatchingBooks));
    assert_ne!(
        EmptyState::NoBooks.message(),
        EmptyState::NoMatchingBooks.message()
    );

    let all = project_book_list(&books, &BookFilter::default());
    assert_eq!(all.len(), 1);
    assert_eq!(all.items()[0].title, "Dune");
}

#[test]
fn member_and_discussion_views_from_store() {
    let adapter = MemoryPersistence::new();
    let mut store = fixed_store(&adapter);

    assert!(matches!(
        project_member_list(store.members()),
        Projection::Empty(EmptyState::NoMembers)
    ));
    assert!(matches!(
        project_discussion_list(store.discussions()),
        Projection::Empty(EmptyState::NoDiscussions)
    ));

    let member = store
        .add_member(NewMember::new("Amy", "amy@example.com").with_role(MemberRole::Admin))
        .unwrap();
    let member_view = project_member(&member);
    assert_eq!(member_view.role_label, "Admin");
    assert_eq!(member_view.join_date, "2026-10-17");

    let book = store.add_book(NewBook::new("Dune", "Herbert")).unwrap();
    let discussion = store.start_discussion(book.id).unwrap();
    assert_eq!(
        project_message_list(&discussion).empty_state(),
        Some(EmptyState::NoMessages)
    );

    store.add_message(discussion.id, "First!").unwrap();
    store.add_message(discussion.id, "Second").unwrap();
    let stored = store.discussion(discussion.id).unwrap();

    let view = project_discussion(stored);
    assert_eq!(view.message_count, 2);
    assert_eq!(view.heading, "Dune by Herbert");

    let messages = project_message_list(stored);
    let contents = messages
        .items()
        .iter()
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>();
    assert_eq!(contents, vec!["First!", "Second"]);
}

#[test]
fn projection_does_not_touch_persistence() {
    let adapter = MemoryPersistence::new();
    let mut store = fixed_store(&adapter);
    store.add_book(NewBook::new("Dune", "Herbert")).unwrap();
    let before = adapter.blob("bookClubData");

    let _ = project_book_list(store.books(), &BookFilter::default());
    let _ = project_discussion_list(store.discussions());

    assert_eq!(adapter.blob("bookClubData"), before);
}

#[test]
fn book_view_serializes_camel_case() {
    let view = project_book(&paged(400, 400, BookStatus::Completed));
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["progressPercent"], 100);
    assert_eq!(json["showsProgressInput"], false);
    assert_eq!(json["stars"][0]["filled"], false);
    assert_eq!(json["statusLabel"], "Completed");
}
