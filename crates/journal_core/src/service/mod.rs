//! Core use-case services.
//!
//! # Responsibility
//! - Bridge the journal state store to the persistent key-value store.
//! - Keep presentation hosts decoupled from storage and codec details.

pub mod journal_session;
