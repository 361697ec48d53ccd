//! Habit definition catalog model.
//!
//! # Responsibility
//! - Define the global, user-ordered habit catalog entry.
//! - Carry the compiled-in starter set and icon palette.
//!
//! # Invariants
//! - Ids are globally unique and immutable for the definition's lifetime.
//! - Catalog order is the display order for both settings and table columns.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one habit definition.
///
/// Kept as a string alias: the starter set uses short `h1`..`h5` ids and
/// freshly created habits use uuid-v4 strings.
pub type HabitId = String;

/// Icon applied when a new habit is added without picking one.
pub const FALLBACK_HABIT_ICON: &str = "✨";

/// The glyph palette the settings surface offers for habit icons.
pub const HABIT_ICON_CHOICES: &[&str] = &[
    "💧", "📖", "💪", "🧘", "🥗", "💤", "💼", "🧹", "🎸", "🎨", "🍳", "🚶", "💊", "🚭", "💰",
    "🪴", "📱", "🛁", "📝", "☀️", "🏃", "🚲", "🥦", "🍎", "📵", "💻", "🎓", "🐶", "🎹", "✨",
];

/// One named, iconized, user-ordered trackable habit.
///
/// Distinct from its per-day completion record: deleting a definition
/// leaves historical completion maps untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: HabitId,
    pub name: String,
    #[serde(default = "fallback_icon")]
    pub icon: String,
}

fn fallback_icon() -> String {
    FALLBACK_HABIT_ICON.to_string()
}

impl HabitDefinition {
    /// Creates a definition with a freshly generated unique id.
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            icon: icon.into(),
        }
    }

    fn seeded(id: &str, name: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// The compiled-in default catalog applied when no persisted catalog exists.
pub fn starter_habits() -> Vec<HabitDefinition> {
    vec![
        HabitDefinition::seeded("h1", "Book Reading", "📖"),
        HabitDefinition::seeded("h2", "Exercise", "💪"),
        HabitDefinition::seeded("h3", "Meditation", "🧘"),
        HabitDefinition::seeded("h4", "No Reels", "📱"),
        HabitDefinition::seeded("h5", "No Added Sugar", "🥗"),
    ]
}

/// Direction of an adjacent-swap reorder in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::{starter_habits, HabitDefinition, FALLBACK_HABIT_ICON, HABIT_ICON_CHOICES};
    use std::collections::HashSet;

    #[test]
    fn starter_set_has_five_unique_ids() {
        let habits = starter_habits();
        assert_eq!(habits.len(), 5);
        let ids: HashSet<_> = habits.iter().map(|habit| habit.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn fresh_definitions_get_distinct_ids() {
        let a = HabitDefinition::new("Stretching", "🏃");
        let b = HabitDefinition::new("Stretching", "🏃");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_icon_decodes_to_fallback() {
        let habit: HabitDefinition =
            serde_json::from_str(r#"{"id": "h9", "name": "Hydrate"}"#).unwrap();
        assert_eq!(habit.icon, FALLBACK_HABIT_ICON);
    }

    #[test]
    fn palette_offers_the_fallback_icon() {
        assert!(HABIT_ICON_CHOICES.contains(&FALLBACK_HABIT_ICON));
    }
}
