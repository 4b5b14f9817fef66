//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bookclub_core` linkage with deterministic output.
//! - Optionally load a club database and print a summary.
//!
//! Usage: `bookclub_cli [db_path]`

use bookclub_core::db::open_db;
use bookclub_core::{ClubStore, LoadStatus, SqlitePersistence};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("bookclub_core ping={}", bookclub_core::ping());
    println!("bookclub_core version={}", bookclub_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut store = ClubStore::new(SqlitePersistence::new(&conn));
    let status = store.load();
    println!("load_status={}", describe(&status));
    println!("books={}", store.books().len());
    println!("members={}", store.members().len());
    println!("discussions={}", store.discussions().len());
    ExitCode::SUCCESS
}

fn describe(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Missing => "missing".to_string(),
        LoadStatus::Loaded => "loaded".to_string(),
        LoadStatus::Partial(rejected) => {
            let dropped = rejected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            format!("partial({})", dropped.join(","))
        }
        LoadStatus::Malformed => "malformed".to_string(),
        LoadStatus::Unreadable => "unreadable".to_string(),
    }
}
