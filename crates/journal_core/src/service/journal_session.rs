//! Journal session: load/persist orchestration over the key-value store.
//!
//! # Responsibility
//! - Load the four persisted sections independently, each falling back to
//!   its compiled-in default on absence or parse failure.
//! - Write through exactly the section a mutation dirtied.
//! - Own the stale-backup signal and transient status notices.
//!
//! # Invariants
//! - A session only exists fully loaded; no write can precede the load.
//! - One corrupt key never blocks the other keys from loading.
//! - The stale-backup check runs exactly once per session, at load.

use crate::backup::{self, FieldDecode};
use crate::model::date::DateKey;
use crate::model::entry::{DayEntry, EntryPatch};
use crate::model::habit::MoveDirection;
use crate::notice::NoticeCenter;
use crate::repo::kv_repo::{KeyValueStore, KvError};
use crate::store::{JournalState, StateChange};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DATA_KEY: &str = "journal_2026_data";
pub const HABITS_KEY: &str = "journal_2026_habits";
pub const PROFILE_KEY: &str = "journal_2026_profile";
pub const LAST_BACKUP_KEY: &str = "journal_2026_last_backup";

/// A backup older than this raises the stale signal at load.
pub const BACKUP_STALE_AFTER_MS: i64 = 7 * 24 * 60 * 60 * 1000;

pub const MSG_HABIT_ADDED: &str = "Habit added!";
pub const MSG_HABIT_UPDATED: &str = "Habit updated!";
pub const MSG_EXPORT_OK: &str = "Data exported successfully!";
pub const MSG_EXPORT_FAILED: &str = "Export failed.";
pub const MSG_IMPORT_OK: &str = "Backup restored successfully!";

pub type SessionResult<T> = Result<T, SessionError>;

/// Error for session persistence and backup operations.
#[derive(Debug)]
pub enum SessionError {
    /// Key-value store transport failure.
    Kv(KvError),
    /// State failed to encode for persistence or export.
    Encode(serde_json::Error),
    /// An imported document is not JSON at all; nothing was adopted.
    InvalidBackup(serde_json::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode journal state: {err}"),
            Self::InvalidBackup(err) => write!(f, "invalid backup file: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Encode(err) | Self::InvalidBackup(err) => Some(err),
        }
    }
}

impl From<KvError> for SessionError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// The rendered export document plus its download file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub json: String,
}

/// What an import adopted and what it dropped along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub entries_adopted: bool,
    pub entries_dropped: usize,
    pub habits_adopted: bool,
    pub habits_dropped: usize,
    pub profile_adopted: bool,
}

/// A loaded journal bound to its persistent key-value store.
pub struct JournalSession<S: KeyValueStore> {
    store: S,
    state: JournalState,
    backup_stale: bool,
    notices: NoticeCenter,
}

impl<S: KeyValueStore> JournalSession<S> {
    /// Loads all four persisted sections and computes the stale-backup
    /// signal against the current time.
    pub fn load(store: S) -> SessionResult<Self> {
        Self::load_at(store, Utc::now())
    }

    pub fn load_at(store: S, now: DateTime<Utc>) -> SessionResult<Self> {
        let mut state = JournalState::initial();

        if let Some(raw) = store.get(DATA_KEY)? {
            match parse_value(&raw).as_ref().and_then(backup::decode_entry_field) {
                Some(FieldDecode { value, dropped }) => {
                    if dropped > 0 {
                        warn!(
                            "event=session_load module=service status=pruned key={DATA_KEY} dropped={dropped}"
                        );
                    }
                    state.entries = value;
                }
                None => {
                    warn!("event=session_load module=service status=fallback key={DATA_KEY}");
                }
            }
        }

        if let Some(raw) = store.get(HABITS_KEY)? {
            match parse_value(&raw).as_ref().and_then(backup::decode_habit_field) {
                Some(FieldDecode { value, dropped }) => {
                    if dropped > 0 {
                        warn!(
                            "event=session_load module=service status=pruned key={HABITS_KEY} dropped={dropped}"
                        );
                    }
                    state.habits = value;
                }
                None => {
                    warn!("event=session_load module=service status=fallback key={HABITS_KEY}");
                }
            }
        }

        if let Some(raw) = store.get(PROFILE_KEY)? {
            match parse_value(&raw).as_ref().and_then(backup::decode_profile_name) {
                Some(name) => state.profile.name = name,
                None => {
                    warn!("event=session_load module=service status=fallback key={PROFILE_KEY}");
                }
            }
        }

        if let Some(raw) = store.get(LAST_BACKUP_KEY)? {
            match decode_last_backup(&raw) {
                Some(at) => state.last_backup = Some(at),
                None => {
                    warn!(
                        "event=session_load module=service status=fallback key={LAST_BACKUP_KEY}"
                    );
                }
            }
        }

        let backup_stale = match state.last_backup {
            Some(at) => now.signed_duration_since(at).num_milliseconds() > BACKUP_STALE_AFTER_MS,
            None => true,
        };

        info!(
            "event=session_load module=service status=ok entries={} habits={} backup_stale={backup_stale}",
            state.entries.len(),
            state.habits.len()
        );

        Ok(Self {
            store,
            state,
            backup_stale,
            notices: NoticeCenter::default(),
        })
    }

    pub fn state(&self) -> &JournalState {
        &self.state
    }

    /// Stored entry or a structural default; never inserts.
    pub fn entry(&self, date: &DateKey) -> DayEntry {
        self.state.entry(date)
    }

    pub fn backup_stale(&self) -> bool {
        self.backup_stale
    }

    /// User dismissed the stale-backup banner without exporting.
    pub fn dismiss_backup_warning(&mut self) {
        self.backup_stale = false;
    }

    pub fn current_notice(&self) -> Option<&str> {
        self.notices.current()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.clear();
    }

    pub fn merge_entry(&mut self, date: &DateKey, patch: EntryPatch) -> SessionResult<bool> {
        let change = self.state.merge_entry(date, patch);
        self.commit(change)
    }

    pub fn toggle_habit(&mut self, date: &DateKey, habit_id: &str) -> SessionResult<bool> {
        let change = self.state.toggle_habit(date, habit_id);
        self.commit(change)
    }

    pub fn add_task(&mut self, date: &DateKey, text: &str) -> SessionResult<bool> {
        let change = self.state.add_task(date, text);
        self.commit(change)
    }

    pub fn toggle_task(&mut self, date: &DateKey, task_id: &str) -> SessionResult<bool> {
        let change = self.state.toggle_task(date, task_id);
        self.commit(change)
    }

    pub fn delete_task(&mut self, date: &DateKey, task_id: &str) -> SessionResult<bool> {
        let change = self.state.delete_task(date, task_id);
        self.commit(change)
    }

    pub fn add_habit(&mut self, name: &str, icon: Option<&str>) -> SessionResult<bool> {
        let change = self.state.add_habit(name, icon);
        let applied = self.commit(change)?;
        if applied {
            self.notices.post(MSG_HABIT_ADDED);
        }
        Ok(applied)
    }

    pub fn update_habit(&mut self, habit_id: &str, name: &str, icon: &str) -> SessionResult<bool> {
        let change = self.state.update_habit(habit_id, name, icon);
        let applied = self.commit(change)?;
        if applied {
            self.notices.post(MSG_HABIT_UPDATED);
        }
        Ok(applied)
    }

    pub fn move_habit(&mut self, index: usize, direction: MoveDirection) -> SessionResult<bool> {
        let change = self.state.move_habit(index, direction);
        self.commit(change)
    }

    /// The caller is expected to have confirmed the deletion with the
    /// user; historical completion records stay untouched either way.
    pub fn delete_habit(&mut self, habit_id: &str) -> SessionResult<bool> {
        let change = self.state.delete_habit(habit_id);
        self.commit(change)
    }

    pub fn set_profile_name(&mut self, name: &str) -> SessionResult<bool> {
        let change = self.state.set_profile_name(name);
        self.commit(change)
    }

    /// Renders the export document, persists the new last-backup
    /// timestamp, and clears the stale signal. On failure the state is
    /// left untouched and only a transient notice is raised.
    pub fn export_backup(&mut self) -> SessionResult<ExportPayload> {
        self.export_backup_at(Utc::now())
    }

    pub fn export_backup_at(&mut self, now: DateTime<Utc>) -> SessionResult<ExportPayload> {
        match self.try_export(now) {
            Ok(payload) => {
                self.state.mark_backed_up(now);
                self.backup_stale = false;
                self.notices.post(MSG_EXPORT_OK);
                info!(
                    "event=backup_export module=service status=ok file={}",
                    payload.file_name
                );
                Ok(payload)
            }
            Err(err) => {
                self.notices.post(MSG_EXPORT_FAILED);
                error!("event=backup_export module=service status=error error={err}");
                Err(err)
            }
        }
    }

    fn try_export(&self, now: DateTime<Utc>) -> SessionResult<ExportPayload> {
        let json = backup::encode_backup(&self.state, now).map_err(SessionError::Encode)?;
        let stamp =
            serde_json::to_string(&backup::iso_timestamp(now)).map_err(SessionError::Encode)?;
        self.store.put(LAST_BACKUP_KEY, &stamp)?;
        Ok(ExportPayload {
            file_name: backup::backup_file_name(now.date_naive()),
            json,
        })
    }

    /// Restores from a backup document. A document that is not JSON is
    /// rejected wholesale; otherwise each field is validated and adopted
    /// independently, and the untouched fields keep their current values.
    pub fn import_backup(&mut self, raw: &str) -> SessionResult<ImportReport> {
        let document: Value = serde_json::from_str(raw).map_err(|err| {
            error!("event=backup_import module=service status=error reason=syntax error={err}");
            SessionError::InvalidBackup(err)
        })?;

        if let Some(version) = document.get("version").and_then(Value::as_u64) {
            if version != u64::from(backup::BACKUP_FORMAT_VERSION) {
                warn!("event=backup_import module=service status=warn reason=version version={version}");
            }
        }

        let mut report = ImportReport::default();

        if let Some(decoded) = document.get("data").and_then(backup::decode_entry_field) {
            report.entries_adopted = true;
            report.entries_dropped = decoded.dropped;
            let change = self.state.replace_entries(decoded.value);
            self.write_through(change)?;
        }

        if let Some(decoded) = document.get("habits").and_then(backup::decode_habit_field) {
            report.habits_adopted = true;
            report.habits_dropped = decoded.dropped;
            let change = self.state.replace_habits(decoded.value);
            self.write_through(change)?;
        }

        if let Some(name) = document
            .get("profile")
            .and_then(backup::decode_profile_name)
        {
            report.profile_adopted = true;
            let change = self.state.set_profile_name(&name);
            self.write_through(change)?;
        }

        self.notices.post(MSG_IMPORT_OK);
        info!(
            "event=backup_import module=service status=ok entries={} habits={} profile={}",
            report.entries_adopted, report.habits_adopted, report.profile_adopted
        );
        Ok(report)
    }

    fn commit(&mut self, change: StateChange) -> SessionResult<bool> {
        self.write_through(change)?;
        Ok(change.is_dirty())
    }

    fn write_through(&self, change: StateChange) -> SessionResult<()> {
        let (key, payload) = match change {
            StateChange::None => return Ok(()),
            StateChange::Entries => (DATA_KEY, serde_json::to_string(&self.state.entries)),
            StateChange::Habits => (HABITS_KEY, serde_json::to_string(&self.state.habits)),
            StateChange::Profile => (PROFILE_KEY, serde_json::to_string(&self.state.profile)),
            StateChange::Backup => match self.state.last_backup {
                Some(at) => (
                    LAST_BACKUP_KEY,
                    serde_json::to_string(&backup::iso_timestamp(at)),
                ),
                None => return Ok(()),
            },
        };
        let payload = payload.map_err(SessionError::Encode)?;
        if let Err(err) = self.store.put(key, &payload) {
            error!("event=write_through module=service status=error key={key} error={err}");
            return Err(err.into());
        }
        Ok(())
    }
}

fn parse_value(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

// The original app stored this key as a bare ISO string rather than a
// JSON document; accept both so its data survives a migration.
fn decode_last_backup(raw: &str) -> Option<DateTime<Utc>> {
    let text = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    backup::parse_timestamp(&text)
}
