//! Day entry model.
//!
//! # Responsibility
//! - Define the per-day record: tasks, habit completions, notes, mood.
//! - Provide the partial-merge shape used by the state store.
//!
//! # Invariants
//! - Task ids are unique within one day's list (no cross-day guarantee).
//! - `mood` is `1..=10` when present; `None` means unrated.
//! - Absent habit ids in `habits` mean "not completed".

use crate::model::habit::HabitId;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MOOD_MIN: u8 = 1;
pub const MOOD_MAX: u8 = 10;

/// One item on a day's task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable within the owning day's list for toggle/delete addressing.
    #[serde(deserialize_with = "lenient_task_id")]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates an open task with a freshly generated unique id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

// Backups written by earlier releases carry numeric task ids; normalize
// them to their decimal string form instead of rejecting the entry.
fn lenient_task_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Number(i64),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(value) => value,
        IdRepr::Number(value) => value.to_string(),
    })
}

/// The full journal record for one calendar day.
///
/// Created lazily: reads synthesize this default without inserting it, so
/// the entry map stays sparse until a mutation actually lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayEntry {
    /// Ordered task list; order is user-visible and significant.
    pub tasks: Vec<Task>,
    /// Habit completion by definition id. Retired ids may linger here and
    /// are simply never rendered.
    pub habits: BTreeMap<HabitId, bool>,
    /// Free-text reflections / remarks.
    pub notes: String,
    /// Daily rating, `1..=10`.
    pub mood: Option<u8>,
    /// Persisted for forward compatibility; nothing reads it yet.
    pub gratitude: String,
}

/// Partial-field update for one day entry.
///
/// `None` leaves a field untouched; `mood` uses a nested option so a patch
/// can distinguish "leave mood alone" from "clear the rating".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub tasks: Option<Vec<Task>>,
    pub habits: Option<BTreeMap<HabitId, bool>>,
    pub notes: Option<String>,
    pub mood: Option<Option<u8>>,
    pub gratitude: Option<String>,
}

impl EntryPatch {
    pub fn notes(text: impl Into<String>) -> Self {
        Self {
            notes: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn mood(value: u8) -> Self {
        Self {
            mood: Some(Some(value)),
            ..Self::default()
        }
    }

    pub fn clear_mood() -> Self {
        Self {
            mood: Some(None),
            ..Self::default()
        }
    }

    pub fn gratitude(text: impl Into<String>) -> Self {
        Self {
            gratitude: Some(text.into()),
            ..Self::default()
        }
    }

    /// Whether the carried mood, if any, honors the `1..=10` invariant.
    pub fn mood_in_range(&self) -> bool {
        match self.mood {
            Some(Some(value)) => (MOOD_MIN..=MOOD_MAX).contains(&value),
            _ => true,
        }
    }

    /// Shallow per-field merge: replaces exactly the named fields.
    pub fn apply_to(self, entry: &mut DayEntry) {
        if let Some(tasks) = self.tasks {
            entry.tasks = tasks;
        }
        if let Some(habits) = self.habits {
            entry.habits = habits;
        }
        if let Some(notes) = self.notes {
            entry.notes = notes;
        }
        if let Some(mood) = self.mood {
            entry.mood = mood;
        }
        if let Some(gratitude) = self.gratitude {
            entry.gratitude = gratitude;
        }
    }
}
