//! Month read-models for the calendar and habit-table presentations.
//!
//! # Responsibility
//! - Project the sparse entry map into per-day calendar cells and
//!   habit-table rows for one month.
//!
//! # Invariants
//! - Projections never mutate the state; absent days read as defaults.
//! - Habit columns follow catalog order; retired ids are never rendered,
//!   but still count toward a day's completed total.

use crate::model::date::{DateKey, Month};
use crate::model::habit::HabitDefinition;
use crate::store::JournalState;

/// At most this many task completion marks render per calendar cell.
pub const MAX_TASK_MARKS: usize = 3;

/// Rating bands driving mood color-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodBand {
    Low,
    Mid,
    High,
}

/// `1..=4` low, `5..=7` mid, `8..=10` high.
pub fn mood_band(mood: u8) -> MoodBand {
    match mood {
        0..=4 => MoodBand::Low,
        5..=7 => MoodBand::Mid,
        _ => MoodBand::High,
    }
}

/// One day cell of the calendar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: DateKey,
    /// 1-based day of month.
    pub day: u32,
    pub completed_habits: usize,
    pub total_habits: usize,
    pub mood: Option<u8>,
    /// Completion flags of the first few tasks, list order.
    pub task_marks: Vec<bool>,
}

impl DayCell {
    /// Habit completion as a 0–100 progress value.
    pub fn habit_progress(&self) -> f64 {
        if self.total_habits == 0 {
            0.0
        } else {
            self.completed_habits as f64 / self.total_habits as f64 * 100.0
        }
    }
}

/// The calendar view's month projection.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    pub month: Month,
    /// Blank cells before day 1 in a Sunday-first week row.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

pub fn month_grid(state: &JournalState, month: Month) -> MonthGrid {
    let total_habits = state.habits.len();
    let days = month
        .days()
        .enumerate()
        .map(|(index, date)| {
            let entry = state.entry(&date);
            DayCell {
                date,
                day: index as u32 + 1,
                completed_habits: entry.habits.values().filter(|done| **done).count(),
                total_habits,
                mood: entry.mood,
                task_marks: entry
                    .tasks
                    .iter()
                    .take(MAX_TASK_MARKS)
                    .map(|task| task.completed)
                    .collect(),
            }
        })
        .collect();

    MonthGrid {
        month,
        leading_blanks: month.leading_weekday_gap(),
        days,
    }
}

/// One row of the monthly habit table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub date: DateKey,
    /// 1-based day of month.
    pub day: u32,
    /// One check per catalog column, in column order.
    pub checks: Vec<bool>,
    /// The remarks column.
    pub notes: String,
}

/// The monthly-table projection: one column per habit definition, one row
/// per day of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTable {
    pub columns: Vec<HabitDefinition>,
    pub rows: Vec<TableRow>,
}

pub fn month_table(state: &JournalState, month: Month) -> MonthTable {
    let rows = month
        .days()
        .enumerate()
        .map(|(index, date)| {
            let entry = state.entry(&date);
            TableRow {
                date,
                day: index as u32 + 1,
                checks: state
                    .habits
                    .iter()
                    .map(|habit| entry.habits.get(&habit.id).copied().unwrap_or(false))
                    .collect(),
                notes: entry.notes,
            }
        })
        .collect();

    MonthTable {
        columns: state.habits.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::{mood_band, MoodBand};

    #[test]
    fn mood_bands_match_rating_thresholds() {
        assert_eq!(mood_band(1), MoodBand::Low);
        assert_eq!(mood_band(4), MoodBand::Low);
        assert_eq!(mood_band(5), MoodBand::Mid);
        assert_eq!(mood_band(7), MoodBand::Mid);
        assert_eq!(mood_band(8), MoodBand::High);
        assert_eq!(mood_band(10), MoodBand::High);
    }
}
