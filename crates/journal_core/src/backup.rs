//! Backup codec: full-state export and per-field validated import.
//!
//! # Responsibility
//! - Serialize the exportable state into one versioned JSON document.
//! - Shape-check each restorable field independently, so a partially
//!   valid document restores what it can.
//!
//! # Invariants
//! - Only top-level JSON syntax failures reject a document wholesale.
//! - Malformed elements inside an accepted field are dropped and counted,
//!   never adopted and never poisoning their siblings.

use crate::model::date::DateKey;
use crate::model::entry::DayEntry;
use crate::model::habit::HabitDefinition;
use crate::model::profile::Profile;
use crate::store::JournalState;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Version stamped into every export, for future format migrations.
pub const BACKUP_FORMAT_VERSION: u32 = 1;

/// Fixed file-name prefix; the full name appends the export date.
pub const BACKUP_FILE_PREFIX: &str = "journal_backup_2026";

#[derive(Debug, Serialize)]
struct BackupDocument<'a> {
    version: u32,
    generated: String,
    data: &'a BTreeMap<DateKey, DayEntry>,
    habits: &'a [HabitDefinition],
    profile: &'a Profile,
}

/// Renders the full exportable state as a pretty-printed JSON document.
pub fn encode_backup(
    state: &JournalState,
    generated: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BackupDocument {
        version: BACKUP_FORMAT_VERSION,
        generated: iso_timestamp(generated),
        data: &state.entries,
        habits: &state.habits,
        profile: &state.profile,
    })
}

/// Download name for an export generated on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_FILE_PREFIX}_{}.json", date.format("%Y-%m-%d"))
}

/// ISO-8601 UTC timestamp with millisecond precision (`...Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted ISO-8601 timestamp, any offset accepted.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// A field that passed its shape check, with the count of malformed
/// elements dropped along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecode<T> {
    pub value: T,
    pub dropped: usize,
}

/// Decodes an entry-map field. `None` when the value is not an object;
/// entries under malformed date keys or with malformed bodies are dropped.
pub fn decode_entry_field(value: &Value) -> Option<FieldDecode<BTreeMap<DateKey, DayEntry>>> {
    let object = value.as_object()?;
    let mut entries = BTreeMap::new();
    let mut dropped = 0;
    for (key, body) in object {
        let Ok(date) = DateKey::parse(key) else {
            dropped += 1;
            continue;
        };
        match serde_json::from_value::<DayEntry>(body.clone()) {
            Ok(entry) => {
                entries.insert(date, entry);
            }
            Err(_) => dropped += 1,
        }
    }
    Some(FieldDecode {
        value: entries,
        dropped,
    })
}

/// Decodes a habit-catalog field. `None` when the value is not an array;
/// malformed definitions are dropped.
pub fn decode_habit_field(value: &Value) -> Option<FieldDecode<Vec<HabitDefinition>>> {
    let items = value.as_array()?;
    let mut habits = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for item in items {
        match serde_json::from_value::<HabitDefinition>(item.clone()) {
            Ok(habit) => habits.push(habit),
            Err(_) => dropped += 1,
        }
    }
    Some(FieldDecode {
        value: habits,
        dropped,
    })
}

/// Extracts a usable display name from a profile-shaped value: must be a
/// non-empty string under `name`.
pub fn decode_profile_name(value: &Value) -> Option<String> {
    value
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
