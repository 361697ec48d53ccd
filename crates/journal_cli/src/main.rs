//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `journal_core` linkage.
//! - Drive one end-to-end session load against an in-memory store.

use journal_core::db::open_db_in_memory;
use journal_core::{JournalSession, SqliteKeyValueStore};

fn main() {
    println!("journal_core version={}", journal_core::core_version());
    println!("journal_core session={}", probe_session());
}

fn probe_session() -> String {
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => return format!("error ({err})"),
    };
    let store = match SqliteKeyValueStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => return format!("error ({err})"),
    };
    match JournalSession::load(store) {
        Ok(session) => format!(
            "ready habits={} backup_stale={}",
            session.state().habits.len(),
            session.backup_stale()
        ),
        Err(err) => format!("error ({err})"),
    }
}
