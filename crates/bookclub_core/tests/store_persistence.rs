use bookclub_core::db::open_db;
use bookclub_core::{
    project_discussion, BookStatus, ClubStore, FixedClock, LoadStatus, MemberRole,
    MemoryPersistence, NewBook, NewMember, PersistenceAdapter, PersistenceError,
    PersistenceResult, Rejected, SqlitePersistence, StoreConfig, StoreError,
};
use serde_json::{json, Value};
use std::cell::Cell;

const KEY: &str = "bookClubData";

fn clock() -> FixedClock {
    FixedClock::new("2026-10-17", "2026-10-17 19:30:00")
}

/// Adapter whose writes fail while `fail_writes` is set.
#[derive(Default)]
struct FlakyPersistence {
    inner: MemoryPersistence,
    fail_writes: Cell<bool>,
}

impl PersistenceAdapter for FlakyPersistence {
    fn load_blob(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.inner.load_blob(key)
    }

    fn save_blob(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Backend("disk full".to_string()));
        }
        self.inner.save_blob(key, blob)
    }
}

/// Adapter whose reads always fail.
struct UnreadablePersistence;

impl PersistenceAdapter for UnreadablePersistence {
    fn load_blob(&self, _key: &str) -> PersistenceResult<Option<String>> {
        Err(PersistenceError::Backend("storage unavailable".to_string()))
    }

    fn save_blob(&self, _key: &str, _blob: &str) -> PersistenceResult<()> {
        Ok(())
    }
}

#[test]
fn added_entities_survive_reload() {
    let adapter = MemoryPersistence::new();
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());

    let book = store
        .add_book(NewBook::new("Dune", "Herbert").with_total_pages(400))
        .unwrap();
    store.rate_book(book.id, 4).unwrap();
    let member = store
        .add_member(NewMember::new("Amy", "amy@example.com").with_role(MemberRole::Admin))
        .unwrap();
    let discussion = store.start_discussion(book.id).unwrap();
    store.add_message(discussion.id, "Loved it").unwrap();

    let mut reloaded = ClubStore::new(&adapter);
    assert_eq!(reloaded.load(), LoadStatus::Loaded);
    assert_eq!(reloaded.data(), store.data());
    assert_eq!(reloaded.book(book.id).unwrap().rating, 4);
    assert_eq!(reloaded.member(member.id), Some(&member));
    assert_eq!(reloaded.discussion(discussion.id).unwrap().message_count(), 1);
}

#[test]
fn blob_uses_camel_case_wire_fields() {
    let adapter = MemoryPersistence::new();
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());
    store
        .add_book(NewBook::new("Dune", "Herbert").with_total_pages(400))
        .unwrap();

    let blob: Value = serde_json::from_str(&adapter.blob(KEY).unwrap()).unwrap();
    let book = &blob["books"][0];
    assert_eq!(book["readingDate"], "TBD");
    assert_eq!(book["status"], "planned");
    assert_eq!(book["dateAdded"], "2026-10-17");
    assert_eq!(book["totalPages"], 400);
    assert_eq!(book["currentPage"], 0);
    assert_eq!(blob["members"], json!([]));
    assert_eq!(blob["discussions"], json!([]));
}

#[test]
fn reload_never_reuses_ids() {
    let adapter = MemoryPersistence::new();
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());
    let first = store.add_book(NewBook::new("Dune", "Herbert")).unwrap();
    let discussion = store.start_discussion(first.id).unwrap();
    let message = store.add_message(discussion.id, "hi").unwrap();

    let mut reloaded = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());
    reloaded.load();
    let second = reloaded.add_book(NewBook::new("Emma", "Austen")).unwrap();

    assert!(second.id > message.id);
}

#[test]
fn malformed_blob_loads_as_empty() {
    for blob in ["not json", "[]", "42", "null"] {
        let adapter = MemoryPersistence::with_blob(KEY, blob);
        let mut store = ClubStore::new(&adapter);
        assert_eq!(store.load(), LoadStatus::Malformed, "blob: {blob}");
        assert!(store.data().is_empty());
    }
}

#[test]
fn malformed_key_loads_as_empty_collection() {
    let blob = json!({
        "books": [{"id": 1, "title": "Dune", "author": "Herbert"}],
        "members": {"oops": true},
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::new(&adapter);

    assert_eq!(
        store.load(),
        LoadStatus::Partial(vec![Rejected::Key("members")])
    );
    assert_eq!(store.books().len(), 1);
    assert!(store.members().is_empty());
    assert!(store.discussions().is_empty());
}

#[test]
fn unknown_member_role_keeps_every_member() {
    let blob = json!({
        "members": [
            {"id": 1, "name": "Amy", "email": "amy@example.com", "role": "member"},
            {"id": 2, "name": "Cy", "email": "cy@example.com", "role": "guest"}
        ]
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());

    assert_eq!(store.load(), LoadStatus::Loaded);
    assert_eq!(store.members().len(), 2);
    assert_eq!(
        store.member(2).unwrap().role,
        MemberRole::Other("guest".to_string())
    );

    store.add_book(NewBook::new("Dune", "Herbert")).unwrap();
    let saved: Value = serde_json::from_str(&adapter.blob(KEY).unwrap()).unwrap();
    let roles = saved["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|member| member["role"].clone())
        .collect::<Vec<_>>();
    assert_eq!(roles, vec![json!("member"), json!("guest")]);
}

#[test]
fn broken_member_entry_does_not_drop_its_siblings() {
    let blob = json!({
        "members": [
            {"id": 1, "name": "Amy", "email": "amy@example.com"},
            {"id": 2, "name": "Bo"},
            {"id": 3, "name": "Cy", "email": "cy@example.com", "role": "admin"}
        ]
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::new(&adapter);

    assert_eq!(
        store.load(),
        LoadStatus::Partial(vec![Rejected::Entries {
            key: "members",
            count: 1
        }])
    );
    let ids = store
        .members()
        .iter()
        .map(|member| member.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn discussion_of_missing_book_loads_from_snapshot() {
    let blob = json!({
        "books": [],
        "discussions": [{
            "id": 7,
            "bookId": 99,
            "bookTitle": "Dune",
            "bookAuthor": "Herbert",
            "createdDate": "2026-10-01",
            "messages": [
                {"id": 8, "author": "You", "content": "Spice!", "timestamp": "2026-10-01 20:00:00"}
            ]
        }]
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());

    assert_eq!(store.load(), LoadStatus::Loaded);
    assert!(store.book(99).is_none());
    let discussion = store.discussion_for_book(99).unwrap();
    let view = project_discussion(discussion);
    assert_eq!(view.heading, "Dune by Herbert");
    assert_eq!(view.message_count, 1);

    let message = store.add_message(7, "Still here").unwrap();
    assert_eq!(message.id, 9);
}

#[test]
fn legacy_books_without_progress_fields_load_with_defaults() {
    let blob = json!({
        "books": [{
            "id": 1_700_000_000_000_u64,
            "title": "Dune",
            "author": "Herbert",
            "readingDate": "TBD",
            "status": "planned"
        }]
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());
    store.load();

    let book = &store.books()[0];
    assert_eq!(book.rating, 0);
    assert_eq!(book.total_pages, 0);
    assert_eq!(book.current_page, 0);
    assert_eq!(book.date_added, "");

    let next = store.add_book(NewBook::new("Emma", "Austen")).unwrap();
    assert_eq!(next.id, 1_700_000_000_001);
}

#[test]
fn load_repairs_inconsistent_progress() {
    let blob = json!({
        "books": [{
            "id": 5,
            "title": "Dune",
            "author": "Herbert",
            "status": "reading",
            "totalPages": 100,
            "currentPage": 150
        }]
    })
    .to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let store = ClubStore::open(&adapter);

    let book = store.book(5).unwrap();
    assert_eq!(book.current_page, 100);
    assert_eq!(book.status, BookStatus::Completed);
}

#[test]
fn unknown_top_level_keys_are_preserved_on_save() {
    let blob = json!({"books": [], "settings": {"theme": "dark"}}).to_string();
    let adapter = MemoryPersistence::with_blob(KEY, blob);
    let mut store = ClubStore::open(&adapter);
    store.add_book(NewBook::new("Dune", "Herbert")).unwrap();

    let saved: Value = serde_json::from_str(&adapter.blob(KEY).unwrap()).unwrap();
    assert_eq!(saved["settings"]["theme"], "dark");
    assert_eq!(saved["books"].as_array().unwrap().len(), 1);
}

#[test]
fn unreadable_adapter_loads_as_empty() {
    let mut store = ClubStore::new(UnreadablePersistence);
    assert_eq!(store.load(), LoadStatus::Unreadable);
    assert!(store.data().is_empty());
}

#[test]
fn failed_save_leaves_state_unchanged() {
    let adapter = FlakyPersistence::default();
    let mut store = ClubStore::with_parts(&adapter, clock(), StoreConfig::default());
    let book = store
        .add_book(NewBook::new("Dune", "Herbert").with_total_pages(10))
        .unwrap();

    adapter.fail_writes.set(true);
    let err = store.update_progress(book.id, 10).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    let err = store.add_book(NewBook::new("Emma", "Austen")).unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));

    assert_eq!(store.books().len(), 1);
    assert_eq!(store.book(book.id).unwrap().current_page, 0);
    assert_eq!(store.book(book.id).unwrap().status, BookStatus::Planned);

    adapter.fail_writes.set(false);
    let done = store.update_progress(book.id, 10).unwrap();
    assert_eq!(done.status, BookStatus::Completed);
}

#[test]
fn custom_storage_key_is_used() {
    let adapter = MemoryPersistence::new();
    let config = StoreConfig::default().with_storage_key("club-v2");
    let mut store = ClubStore::with_parts(&adapter, clock(), config);
    store.add_book(NewBook::new("Dune", "Herbert")).unwrap();

    assert!(adapter.blob("club-v2").is_some());
    assert!(adapter.blob(KEY).is_none());
}

#[test]
fn sqlite_adapter_round_trips_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("club.db");

    {
        let conn = open_db(&path).unwrap();
        let mut store =
            ClubStore::with_parts(SqlitePersistence::new(&conn), clock(), StoreConfig::default());
        assert_eq!(store.load(), LoadStatus::Missing);
        let book = store.add_book(NewBook::new("Dune", "Herbert")).unwrap();
        store.start_discussion(book.id).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let mut store = ClubStore::new(SqlitePersistence::new(&conn));
    assert_eq!(store.load(), LoadStatus::Loaded);
    assert_eq!(store.books().len(), 1);
    assert_eq!(store.discussions().len(), 1);
    assert_eq!(store.discussions()[0].book_title, "Dune");
}
