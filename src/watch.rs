// SPDX-License-Identifier: GPL-3.0-or-later

//! Re-render when another process changes the stored state.
//!
//! SQLite bumps `PRAGMA data_version` whenever a different connection
//! commits, which gives a cheap cross-process change signal. The watcher
//! polls it on a fixed interval and only notifies on actual changes.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::storage::Storage;

/// Tracks the last seen data version of a database connection.
pub struct ChangeWatcher {
    last_version: i64,
}

impl ChangeWatcher {
    /// Start watching from the connection's current state.
    pub fn new(storage: &Storage) -> Result<Self> {
        Ok(Self {
            last_version: storage.data_version()?,
        })
    }

    /// Returns `true` if another connection committed since the last poll.
    pub fn poll(&mut self, storage: &Storage) -> Result<bool> {
        let version = storage.data_version()?;
        if version == self.last_version {
            return Ok(false);
        }
        debug!(from = self.last_version, to = version, "database changed");
        self.last_version = version;
        Ok(true)
    }

    /// Poll every `interval`, calling `on_change` after each detected change.
    ///
    /// Runs until `on_change` fails, or for `cycles` polls when given.
    pub fn run<F>(
        &mut self,
        storage: &Storage,
        interval: Duration,
        cycles: Option<usize>,
        mut on_change: F,
    ) -> Result<()>
    where
        F: FnMut() -> Result<()>,
    {
        info!(interval_secs = interval.as_secs(), "watching for changes");

        let mut done = 0;
        while cycles.is_none_or(|limit| done < limit) {
            thread::sleep(interval);
            if self.poll(storage)? {
                on_change()?;
            }
            done += 1;
        }

        Ok(())
    }
}
