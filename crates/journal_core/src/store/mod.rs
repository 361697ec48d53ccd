//! Journal state store.
//!
//! # Responsibility
//! - Own the full in-memory domain state: entry map, habit catalog,
//!   profile, last-backup timestamp.
//! - Provide the only sanctioned mutation operations.
//!
//! # Invariants
//! - Every mutation fully applies or is a no-op; nothing partially applies.
//! - Each mutation reports which persisted section it dirtied, so the
//!   persistence adapter can write through key-scoped.
//! - Reads of absent days synthesize defaults without inserting them.

mod journal_state;

pub use journal_state::{JournalState, StateChange};
