use journal_core::{DateKey, DayEntry, EntryPatch, JournalState, StateChange, Task};
use std::collections::BTreeMap;

#[test]
fn unwritten_dates_read_as_default_without_inserting() {
    let state = JournalState::initial();
    let date = key("2026-01-05");

    let entry = state.entry(&date);
    assert_eq!(entry, DayEntry::default());
    assert!(entry.tasks.is_empty());
    assert!(entry.habits.is_empty());
    assert_eq!(entry.notes, "");
    assert_eq!(entry.mood, None);
    assert!(state.entries.is_empty());
}

#[test]
fn merge_entry_fields_compose_across_calls() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    assert_eq!(
        state.merge_entry(&date, EntryPatch::mood(7)),
        StateChange::Entries
    );
    assert_eq!(
        state.merge_entry(&date, EntryPatch::notes("x")),
        StateChange::Entries
    );

    let entry = state.entry(&date);
    assert_eq!(entry.mood, Some(7));
    assert_eq!(entry.notes, "x");
}

#[test]
fn merge_entry_last_write_wins_per_field() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    state.merge_entry(&date, EntryPatch::mood(3));
    state.merge_entry(&date, EntryPatch::mood(9));

    assert_eq!(state.entry(&date).mood, Some(9));
}

#[test]
fn merge_entry_refuses_out_of_range_mood_patches() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    state.merge_entry(&date, EntryPatch::notes("kept"));

    let refused = EntryPatch {
        mood: Some(Some(11)),
        notes: Some("overwritten?".to_string()),
        ..EntryPatch::default()
    };
    assert_eq!(state.merge_entry(&date, refused), StateChange::None);

    let entry = state.entry(&date);
    assert_eq!(entry.mood, None);
    assert_eq!(entry.notes, "kept");
}

#[test]
fn merge_entry_can_clear_a_rating() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    state.merge_entry(&date, EntryPatch::mood(5));
    state.merge_entry(&date, EntryPatch::clear_mood());

    assert_eq!(state.entry(&date).mood, None);
}

#[test]
fn gratitude_is_carried_but_inert() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    state.merge_entry(&date, EntryPatch::gratitude("sunny morning"));
    state.merge_entry(&date, EntryPatch::notes("unrelated"));

    assert_eq!(state.entry(&date).gratitude, "sunny morning");
}

#[test]
fn first_habit_toggle_sets_true_second_returns_false() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    state.toggle_habit(&date, "h2");
    assert_eq!(state.entry(&date).habits.get("h2"), Some(&true));

    state.toggle_habit(&date, "h2");
    assert_eq!(state.entry(&date).habits.get("h2"), Some(&false));
}

#[test]
fn toggling_a_retired_habit_id_is_allowed() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    state.delete_habit("h1");

    assert_eq!(state.toggle_habit(&date, "h1"), StateChange::Entries);
    assert_eq!(state.entry(&date).habits.get("h1"), Some(&true));
}

#[test]
fn add_task_prepends_open_tasks_with_unique_ids() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    state.add_task(&date, "first");
    state.add_task(&date, "second");

    let tasks = state.entry(&date).tasks;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].text, "second");
    assert_eq!(tasks[1].text, "first");
    assert!(tasks.iter().all(|task| !task.completed));
    assert_ne!(tasks[0].id, tasks[1].id);
}

#[test]
fn add_task_rejects_blank_text() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");

    assert_eq!(state.add_task(&date, ""), StateChange::None);
    assert_eq!(state.add_task(&date, "   "), StateChange::None);
    assert!(state.entries.is_empty());
}

#[test]
fn completing_a_task_sinks_it_below_already_completed_ones() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    seed_tasks(
        &mut state,
        &date,
        &[("a", false), ("b", true), ("c", false)],
    );

    state.toggle_task(&date, "a");

    let order = task_order(&state, &date);
    assert_eq!(order, vec!["c", "b", "a"]);
    let tasks = state.entry(&date).tasks;
    assert!(!tasks[0].completed);
    assert!(tasks[1].completed);
    assert!(tasks[2].completed);
}

#[test]
fn uncompleting_returns_the_task_to_its_stable_partition_position() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    seed_tasks(
        &mut state,
        &date,
        &[("a", false), ("b", true), ("c", false)],
    );

    state.toggle_task(&date, "a");
    state.toggle_task(&date, "a");

    // Back to incomplete, at the end of the incomplete group rather than
    // its original index.
    assert_eq!(task_order(&state, &date), vec!["c", "a", "b"]);
    assert!(!state.entry(&date).tasks[1].completed);
}

#[test]
fn completed_tasks_keep_their_relative_order() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    seed_tasks(
        &mut state,
        &date,
        &[("a", false), ("b", true), ("c", true), ("d", false)],
    );

    state.toggle_task(&date, "d");

    assert_eq!(task_order(&state, &date), vec!["a", "b", "c", "d"]);
}

#[test]
fn toggle_task_without_match_is_a_no_op() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    seed_tasks(&mut state, &date, &[("a", false)]);

    assert_eq!(state.toggle_task(&date, "ghost"), StateChange::None);
    assert_eq!(state.toggle_task(&key("2026-01-06"), "a"), StateChange::None);
    assert_eq!(task_order(&state, &date), vec!["a"]);
}

#[test]
fn delete_task_removes_only_the_match() {
    let mut state = JournalState::initial();
    let date = key("2026-01-05");
    seed_tasks(&mut state, &date, &[("a", false), ("b", true)]);

    assert_eq!(state.delete_task(&date, "a"), StateChange::Entries);
    assert_eq!(task_order(&state, &date), vec!["b"]);

    assert_eq!(state.delete_task(&date, "a"), StateChange::None);
}

fn key(value: &str) -> DateKey {
    DateKey::parse(value).unwrap()
}

fn seed_tasks(state: &mut JournalState, date: &DateKey, tasks: &[(&str, bool)]) {
    let tasks = tasks
        .iter()
        .map(|(id, completed)| Task {
            id: (*id).to_string(),
            text: format!("task {id}"),
            completed: *completed,
        })
        .collect();
    state.merge_entry(
        date,
        EntryPatch {
            tasks: Some(tasks),
            habits: Some(BTreeMap::new()),
            ..EntryPatch::default()
        },
    );
}

fn task_order(state: &JournalState, date: &DateKey) -> Vec<String> {
    state
        .entry(date)
        .tasks
        .iter()
        .map(|task| task.id.clone())
        .collect()
}
