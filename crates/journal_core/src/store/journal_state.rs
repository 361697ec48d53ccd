//! In-memory journal state and its mutation operations.

use crate::model::date::DateKey;
use crate::model::entry::{DayEntry, EntryPatch, Task};
use crate::model::habit::{HabitDefinition, MoveDirection, FALLBACK_HABIT_ICON};
use crate::model::profile::Profile;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Which persisted section a mutation dirtied.
///
/// `None` doubles as the validation-rejection outcome: an operation that
/// refuses its input leaves the state untouched and reports `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    None,
    Entries,
    Habits,
    Profile,
    Backup,
}

impl StateChange {
    pub fn is_dirty(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The whole journal's in-memory state.
///
/// The entry map is sparse: days nobody wrote to are simply absent, and
/// reads synthesize a default `DayEntry` instead of inserting one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalState {
    pub entries: BTreeMap<DateKey, DayEntry>,
    pub habits: Vec<HabitDefinition>,
    pub profile: Profile,
    pub last_backup: Option<DateTime<Utc>>,
}

impl JournalState {
    /// The compiled-in state used before any persisted data is adopted.
    pub fn initial() -> Self {
        Self {
            entries: BTreeMap::new(),
            habits: crate::model::habit::starter_habits(),
            profile: Profile::default(),
            last_backup: None,
        }
    }

    /// Returns the stored entry or a structural default; never inserts.
    pub fn entry(&self, date: &DateKey) -> DayEntry {
        self.entries.get(date).cloned().unwrap_or_default()
    }

    /// Shallow-merges `patch` into the entry for `date`, creating it on
    /// first write. Refuses the whole patch when it carries an
    /// out-of-range mood.
    pub fn merge_entry(&mut self, date: &DateKey, patch: EntryPatch) -> StateChange {
        if !patch.mood_in_range() {
            return StateChange::None;
        }
        let mut entry = self.entry(date);
        patch.apply_to(&mut entry);
        self.entries.insert(*date, entry);
        StateChange::Entries
    }

    /// Flips one habit's completion for the day; an absent record counts
    /// as "not completed", so the first toggle sets it true. Retired
    /// habit ids are allowed (harmless).
    pub fn toggle_habit(&mut self, date: &DateKey, habit_id: &str) -> StateChange {
        let entry = self.entries.entry(*date).or_default();
        let done = entry.habits.get(habit_id).copied().unwrap_or(false);
        entry.habits.insert(habit_id.to_string(), !done);
        StateChange::Entries
    }

    /// Prepends a fresh open task; no-op when the trimmed text is empty.
    pub fn add_task(&mut self, date: &DateKey, text: &str) -> StateChange {
        if text.trim().is_empty() {
            return StateChange::None;
        }
        let entry = self.entries.entry(*date).or_default();
        entry.tasks.insert(0, Task::new(text));
        StateChange::Entries
    }

    /// Flips a task's completion, then re-partitions the day's list:
    /// incomplete tasks first, both groups keeping their prior relative
    /// order, with the toggled task sinking to the end of its new group.
    pub fn toggle_task(&mut self, date: &DateKey, task_id: &str) -> StateChange {
        let Some(entry) = self.entries.get_mut(date) else {
            return StateChange::None;
        };
        let Some(position) = entry.tasks.iter().position(|task| task.id == task_id) else {
            return StateChange::None;
        };

        let mut toggled = entry.tasks.remove(position);
        toggled.completed = !toggled.completed;

        let (mut open, done): (Vec<Task>, Vec<Task>) =
            entry.tasks.drain(..).partition(|task| !task.completed);
        if toggled.completed {
            open.extend(done);
            open.push(toggled);
        } else {
            open.push(toggled);
            open.extend(done);
        }
        entry.tasks = open;

        StateChange::Entries
    }

    /// Removes the matching task; no-op when absent.
    pub fn delete_task(&mut self, date: &DateKey, task_id: &str) -> StateChange {
        let Some(entry) = self.entries.get_mut(date) else {
            return StateChange::None;
        };
        let before = entry.tasks.len();
        entry.tasks.retain(|task| task.id != task_id);
        if entry.tasks.len() == before {
            StateChange::None
        } else {
            StateChange::Entries
        }
    }

    /// Prepends a new habit definition; no-op when the trimmed name is
    /// empty. A blank icon falls back to the default glyph.
    pub fn add_habit(&mut self, name: &str, icon: Option<&str>) -> StateChange {
        if name.trim().is_empty() {
            return StateChange::None;
        }
        let icon = icon
            .map(str::trim)
            .filter(|glyph| !glyph.is_empty())
            .unwrap_or(FALLBACK_HABIT_ICON);
        self.habits.insert(0, HabitDefinition::new(name, icon));
        StateChange::Habits
    }

    /// Renames / re-icons the matching definition in place; no-op when
    /// the trimmed name is empty or the id is unknown.
    pub fn update_habit(&mut self, habit_id: &str, name: &str, icon: &str) -> StateChange {
        if name.trim().is_empty() {
            return StateChange::None;
        }
        match self.habits.iter_mut().find(|habit| habit.id == habit_id) {
            Some(habit) => {
                habit.name = name.to_string();
                habit.icon = icon.to_string();
                StateChange::Habits
            }
            None => StateChange::None,
        }
    }

    /// Swaps the definition at `index` with its neighbor; no-op at the
    /// boundary in that direction or for an out-of-range index.
    pub fn move_habit(&mut self, index: usize, direction: MoveDirection) -> StateChange {
        let last = match self.habits.len() {
            0 => return StateChange::None,
            len => len - 1,
        };
        match direction {
            MoveDirection::Up if index > 0 && index <= last => {
                self.habits.swap(index, index - 1);
                StateChange::Habits
            }
            MoveDirection::Down if index < last => {
                self.habits.swap(index, index + 1);
                StateChange::Habits
            }
            _ => StateChange::None,
        }
    }

    /// Removes the definition. Historical per-day completion maps keep
    /// the orphaned id; it just stops rendering.
    pub fn delete_habit(&mut self, habit_id: &str) -> StateChange {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != habit_id);
        if self.habits.len() == before {
            StateChange::None
        } else {
            StateChange::Habits
        }
    }

    /// Replaces the display name verbatim; empty is allowed, the
    /// presentation layer decides fallback display.
    pub fn set_profile_name(&mut self, name: &str) -> StateChange {
        self.profile.name = name.to_string();
        StateChange::Profile
    }

    /// Records a successful export at `at`.
    pub fn mark_backed_up(&mut self, at: DateTime<Utc>) -> StateChange {
        self.last_backup = Some(at);
        StateChange::Backup
    }

    /// Adopts a whole entry map (import path).
    pub fn replace_entries(&mut self, entries: BTreeMap<DateKey, DayEntry>) -> StateChange {
        self.entries = entries;
        StateChange::Entries
    }

    /// Adopts a whole habit catalog (import path).
    pub fn replace_habits(&mut self, habits: Vec<HabitDefinition>) -> StateChange {
        self.habits = habits;
        StateChange::Habits
    }
}
