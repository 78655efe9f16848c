//! On-device storage for Savvy.
//!
//! Provides a small key-value store backed by `rusqlite`, plus typed accessors
//! for the documents the app keeps.
//!
//! # Thread Safety
//!
//! The [`Store`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Store` can be moved between threads but not shared without external
//! synchronization.
//!
//! # Schema
//!
//! A single `kv` table maps a key to a JSON document:
//!
//! | key                 | value                              |
//! |---------------------|------------------------------------|
//! | `calendar_events`   | array of `CalendarEvent`           |
//! | `completed_lessons` | sorted array of lesson IDs         |
//! | `budget_entries`    | array of `BudgetEntry`             |
//! | `savings_goals`     | array of `SavingsGoal`             |
//!
//! `updated_at` holds an ISO 8601 UTC timestamp of the last write. Missing keys
//! read as empty documents.
//!
//! Read-modify-write updates run inside a transaction so a crash never leaves
//! a half-written document.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use savvy_core::{
    BudgetEntry, CalendarEvent, CompletedLessons, LessonId, Money, SavingsGoal,
};

pub const KEY_CALENDAR_EVENTS: &str = "calendar_events";
pub const KEY_COMPLETED_LESSONS: &str = "completed_lessons";
pub const KEY_BUDGET_ENTRIES: &str = "budget_entries";
pub const KEY_SAVINGS_GOALS: &str = "savings_goals";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored document could not be decoded or encoded.
    #[error("invalid document under {key}")]
    Json {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// A referenced record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Key-value store wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Store {
    conn: Connection,
}

/// Generates a fresh record identifier.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

impl Store {
    /// Opens a store at the given path, creating it if necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. The data is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema. Idempotent.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Lists stored keys in order.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    // ========== Calendar ==========

    pub fn calendar_events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        read_json(&self.conn, KEY_CALENDAR_EVENTS)
    }

    /// Saves an event, replacing any stored event with the same ID.
    pub fn save_event(&mut self, event: CalendarEvent) -> Result<(), StoreError> {
        self.update(KEY_CALENDAR_EVENTS, |events: &mut Vec<CalendarEvent>| {
            match events.iter_mut().find(|e| e.id == event.id) {
                Some(existing) => *existing = event,
                None => events.push(event),
            }
        })
    }

    /// Removes an event. Returns `false` if no event had that ID.
    pub fn remove_event(&mut self, event_id: &str) -> Result<bool, StoreError> {
        self.update(KEY_CALENDAR_EVENTS, |events: &mut Vec<CalendarEvent>| {
            let before = events.len();
            events.retain(|e| e.id.as_str() != event_id);
            events.len() != before
        })
    }

    // ========== Lessons ==========

    pub fn completed_lessons(&self) -> Result<CompletedLessons, StoreError> {
        read_json(&self.conn, KEY_COMPLETED_LESSONS)
    }

    /// Records a lesson as complete. Returns `false` if it already was.
    pub fn mark_lesson_complete(&mut self, lesson_id: LessonId) -> Result<bool, StoreError> {
        let newly = self.update(KEY_COMPLETED_LESSONS, |completed: &mut CompletedLessons| {
            completed.mark_complete(lesson_id)
        })?;
        tracing::debug!(newly, "lesson completion recorded");
        Ok(newly)
    }

    // ========== Budget ==========

    pub fn budget_entries(&self) -> Result<Vec<BudgetEntry>, StoreError> {
        read_json(&self.conn, KEY_BUDGET_ENTRIES)
    }

    pub fn add_budget_entry(&mut self, entry: BudgetEntry) -> Result<(), StoreError> {
        self.update(KEY_BUDGET_ENTRIES, |entries: &mut Vec<BudgetEntry>| {
            entries.push(entry);
        })
    }

    pub fn savings_goals(&self) -> Result<Vec<SavingsGoal>, StoreError> {
        read_json(&self.conn, KEY_SAVINGS_GOALS)
    }

    pub fn add_savings_goal(&mut self, goal: SavingsGoal) -> Result<(), StoreError> {
        self.update(KEY_SAVINGS_GOALS, |goals: &mut Vec<SavingsGoal>| {
            goals.push(goal);
        })
    }

    /// Adds `amount` to a goal's savings and returns the updated goal.
    pub fn deposit_to_goal(
        &mut self,
        goal_id: &str,
        amount: Money,
    ) -> Result<SavingsGoal, StoreError> {
        let updated = self.update(KEY_SAVINGS_GOALS, |goals: &mut Vec<SavingsGoal>| {
            goals.iter_mut().find(|g| g.id.as_str() == goal_id).map(|goal| {
                goal.deposit(amount);
                goal.clone()
            })
        })?;
        updated.ok_or_else(|| StoreError::NotFound {
            kind: "savings goal",
            id: goal_id.to_string(),
        })
    }

    /// Reads a document, applies `f`, and writes it back in one transaction.
    fn update<T, R>(
        &mut self,
        key: &'static str,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let tx = self.conn.transaction()?;
        let mut value: T = read_json(&tx, key)?;
        let result = f(&mut value);
        let raw =
            serde_json::to_string(&value).map_err(|source| StoreError::Json { key, source })?;
        write_raw(&tx, key, &raw)?;
        tx.commit()?;
        Ok(result)
    }
}

fn read_json<T>(conn: &Connection, key: &'static str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let raw: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
        .optional()?;
    match raw {
        None => Ok(T::default()),
        Some(raw) => {
            serde_json::from_str(&raw).map_err(|source| StoreError::Json { key, source })
        }
    }
}

fn write_raw(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    conn.execute(
        "
        INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        ",
        params![key, value, now],
    )?;
    Ok(())
}
