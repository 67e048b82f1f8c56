// SPDX-License-Identifier: GPL-3.0-or-later

//! Local state persistence using SQLite.
//!
//! Stores favorite events, the active ticket category, the planned budget
//! and a short history of budget calculations in
//! ~/.local/share/afisha/afisha.db

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, warn};

use crate::budget::{BudgetContext, TicketCategory};
use crate::config::Config;

/// Number of calculation history entries kept; older ones are evicted first.
pub const HISTORY_LIMIT: usize = 10;

/// A snapshot of one budget calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub calculated_at: DateTime<Utc>,
    pub planned_budget: u64,
    pub category: TicketCategory,
    pub event_ids: Vec<u32>,
    pub total: u64,
}

/// SQLite-backed local storage for afisha state.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the default location
    /// (`~/.local/share/afisha/afisha.db`) and run migrations.
    pub fn open() -> Result<Self> {
        let data_dir = Config::data_dir()?;
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let db_path = data_dir.join("afisha.db");
        Self::open_path(&db_path)
    }

    /// Open (or create) the database at a custom path and run migrations.
    ///
    /// Useful for tests (pass a tempfile path or use `:memory:`).
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let storage = Self { conn };
        storage.migrate()?;
        debug!(path = %path.display(), "opened database");
        Ok(storage)
    }

    /// Run schema migrations (create tables if they don't exist).
    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
            CREATE TABLE IF NOT EXISTS favorites (
                position INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id INTEGER NOT NULL UNIQUE,
                added_at TEXT    NOT NULL
            );

            CREATE TABLE IF NOT EXISTS settings (
                id             INTEGER PRIMARY KEY CHECK (id = 1),
                category       TEXT    NOT NULL DEFAULT '',
                planned_budget INTEGER NOT NULL DEFAULT 0
            );

            INSERT OR IGNORE INTO settings (id) VALUES (1);

            CREATE TABLE IF NOT EXISTS calculation_history (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                calculated_at  TEXT    NOT NULL,
                planned_budget INTEGER NOT NULL,
                category       TEXT    NOT NULL,
                event_ids      TEXT    NOT NULL DEFAULT '[]',
                total          INTEGER NOT NULL
            );
            ",
            )
            .context("Failed to run database migrations")?;
        Ok(())
    }

    // --- Favorites ---

    /// IDs of favorite events, in the order they were added.
    pub fn favorite_ids(&self) -> Result<Vec<u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT event_id FROM favorites ORDER BY position")?;

        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to query favorites")?;

        Ok(ids
            .into_iter()
            .filter_map(|id| match u32::try_from(id) {
                Ok(id) => Some(id),
                Err(_) => {
                    warn!(id, "ignoring out-of-range favorite id");
                    None
                }
            })
            .collect())
    }

    pub fn is_favorite(&self, event_id: u32) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT count(*) FROM favorites WHERE event_id = ?1",
                params![event_id],
                |row| row.get(0),
            )
            .context("Failed to query favorites")?;
        Ok(count > 0)
    }

    /// Mark an event as favorite. Returns `false` if it already was.
    pub fn add_favorite(&self, event_id: u32) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO favorites (event_id, added_at) VALUES (?1, ?2)",
            params![event_id, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    /// Remove an event from favorites. Returns `false` if it was not one.
    pub fn remove_favorite(&self, event_id: u32) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM favorites WHERE event_id = ?1", params![event_id])?;
        Ok(deleted > 0)
    }

    /// Flip the favorite state of an event, returning the new state.
    pub fn toggle_favorite(&self, event_id: u32) -> Result<bool> {
        if self.remove_favorite(event_id)? {
            Ok(false)
        } else {
            self.add_favorite(event_id)?;
            Ok(true)
        }
    }

    /// Remove every favorite, returning how many there were.
    pub fn clear_favorites(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM favorites", [])?)
    }

    // --- Settings ---

    /// The stored ticket category; unknown or unset values mean full price.
    pub fn active_category(&self) -> Result<TicketCategory> {
        let key: String = self
            .conn
            .query_row("SELECT category FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .context("Failed to query ticket category")?;
        Ok(TicketCategory::from_key(&key))
    }

    pub fn set_active_category(&self, category: TicketCategory) -> Result<()> {
        self.conn.execute(
            "UPDATE settings SET category = ?1 WHERE id = 1",
            params![category.key()],
        )?;
        Ok(())
    }

    /// The planned budget; 0 when none has been set.
    pub fn planned_budget(&self) -> Result<u64> {
        let amount: i64 = self
            .conn
            .query_row(
                "SELECT planned_budget FROM settings WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .context("Failed to query planned budget")?;
        Ok(u64::try_from(amount).unwrap_or(0))
    }

    pub fn set_planned_budget(&self, amount: u64) -> Result<()> {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        self.conn.execute(
            "UPDATE settings SET planned_budget = ?1 WHERE id = 1",
            params![amount],
        )?;
        Ok(())
    }

    /// Category and planned budget together, ready for evaluation.
    pub fn context(&self) -> Result<BudgetContext> {
        Ok(BudgetContext {
            category: self.active_category()?,
            planned_budget: self.planned_budget()?,
        })
    }

    // --- Calculation history ---

    /// Record a calculation, keeping only the newest [`HISTORY_LIMIT`] entries.
    pub fn append_history(&self, entry: &HistoryEntry) -> Result<()> {
        let event_ids =
            serde_json::to_string(&entry.event_ids).context("Failed to serialize event ids")?;

        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;

        tx.execute(
            "INSERT INTO calculation_history
             (calculated_at, planned_budget, category, event_ids, total)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.calculated_at.to_rfc3339(),
                i64::try_from(entry.planned_budget).unwrap_or(i64::MAX),
                entry.category.key(),
                event_ids,
                i64::try_from(entry.total).unwrap_or(i64::MAX),
            ],
        )
        .context("Failed to insert history entry")?;

        tx.execute(
            "DELETE FROM calculation_history WHERE id NOT IN
             (SELECT id FROM calculation_history ORDER BY id DESC LIMIT ?1)",
            params![HISTORY_LIMIT as i64],
        )
        .context("Failed to trim history")?;

        tx.commit().context("Failed to commit history entry")?;
        Ok(())
    }

    /// Calculation history, oldest first.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT calculated_at, planned_budget, category, event_ids, total
             FROM calculation_history ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .map(|r| {
                let (calculated_at_str, planned_budget, category, event_ids_json, total) = r?;
                let calculated_at: DateTime<Utc> = calculated_at_str.parse().with_context(|| {
                    format!("Failed to parse calculated_at: {calculated_at_str}")
                })?;
                let event_ids: Vec<u32> = serde_json::from_str(&event_ids_json)
                    .context("Failed to deserialize event ids")?;
                Ok(HistoryEntry {
                    calculated_at,
                    planned_budget: u64::try_from(planned_budget).unwrap_or(0),
                    category: TicketCategory::from_key(&category),
                    event_ids,
                    total: u64::try_from(total).unwrap_or(0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(rows)
    }

    // --- Change detection ---

    /// A counter that changes whenever another connection commits to the
    /// database. Writes made through this connection do not change it.
    pub fn data_version(&self) -> Result<i64> {
        self.conn
            .query_row("PRAGMA data_version", [], |row| row.get(0))
            .context("Failed to query data version")
    }
}
