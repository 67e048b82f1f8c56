// SPDX-License-Identifier: GPL-3.0-or-later

//! The event catalog: every event the listing knows about.
//!
//! The catalog is read-only. It is loaded once per process, either from the
//! JSON file named by [`Config::catalog`] or from the sample catalog bundled
//! into the binary, and budget calculations only ever select from it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;

const BUILTIN_CATALOG: &str = include_str!("../../data/events.json");

/// A listed cultural event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,

    pub title: String,

    /// Free-form date text as shown on the listing (e.g. "15 марта")
    #[serde(default)]
    pub date: String,

    /// Event type label ("Концерт", "Выставка", ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Human-formatted price, parsed with [`crate::budget::parse_price`]
    #[serde(default)]
    pub price: String,

    /// Any other listing fields (venue, district, ...), carried through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An ordered, read-only list of events.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Load the catalog configured by the user, or the bundled one.
    pub fn load(config: &Config) -> Result<Self> {
        match &config.catalog {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    /// The sample catalog shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG).context("Failed to parse built-in catalog")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        let catalog = Self::from_json(&content)
            .with_context(|| format!("Failed to parse catalog from {}", path.display()))?;
        debug!(path = %path.display(), events = catalog.len(), "loaded event catalog");
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let events: Vec<Event> = serde_json::from_str(json)?;

        let mut seen = std::collections::HashSet::new();
        for event in &events {
            if !seen.insert(event.id) {
                warn!(id = event.id, "duplicate event id in catalog; first entry wins");
            }
        }

        Ok(Self { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events whose IDs are in `ids`, in catalog order.
    ///
    /// IDs missing from the catalog are skipped, and each catalog entry is
    /// returned at most once.
    pub fn select(&self, ids: &[u32]) -> Vec<Event> {
        let mut taken = std::collections::HashSet::new();
        self.events
            .iter()
            .filter(|e| ids.contains(&e.id) && taken.insert(e.id))
            .cloned()
            .collect()
    }
}
