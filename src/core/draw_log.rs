//! Append-only audit log of draw outcomes.
//!
//! One `WinnerRecord` per winner; all records of one draw share a single
//! draw timestamp. Rows are never mutated; the only deletion path is the
//! test-data reset, which removes `is_test` rows exclusively.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::store::{self, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub draw_time: DateTime<Utc>,
    pub participant_id: String,
    pub place: u32,
    pub is_test: bool,
    pub admin_user: String,
}

/// One historical draw: its winner references ordered by ascending place.
#[derive(Debug, Clone)]
pub struct DrawEvent {
    pub time: DateTime<Utc>,
    pub is_test: bool,
    pub admin: String,
    pub winners: Vec<WinnerRef>,
}

#[derive(Debug, Clone)]
pub struct WinnerRef {
    pub place: u32,
    pub participant_id: String,
}

#[derive(Default)]
struct Inner {
    rows: Vec<WinnerRecord>,
}

#[derive(Clone)]
pub struct DrawLogStore {
    inner: Arc<RwLock<Inner>>,
    snapshot: Option<PathBuf>,
}

impl DrawLogStore {
    pub fn open(snapshot: Option<PathBuf>) -> Result<Self, StoreError> {
        let rows = match &snapshot {
            Some(path) => store::read_snapshot(path)?.unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(Inner { rows })),
            snapshot,
        })
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot {
            store::write_snapshot(path, &inner.rows)?;
        }
        Ok(())
    }

    /// Appends all records of one draw as a unit. Either every record is in
    /// the log (memory and snapshot) afterwards, or none is and an error is
    /// returned. Validates the per-draw invariants before touching anything.
    pub async fn append_draw(&self, records: &[WinnerRecord]) -> Result<(), StoreError> {
        validate_draw(records)?;
        let mut g = self.inner.write().await;
        let len_before = g.rows.len();
        g.rows.extend_from_slice(records);
        if let Err(e) = self.persist(&g) {
            g.rows.truncate(len_before);
            return Err(e);
        }
        Ok(())
    }

    /// Draw history: draws sorted by descending time, winners within each
    /// draw by ascending place.
    pub async fn history(&self) -> Vec<DrawEvent> {
        let g = self.inner.read().await;
        let mut grouped: BTreeMap<DateTime<Utc>, DrawEvent> = BTreeMap::new();
        for row in &g.rows {
            let event = grouped.entry(row.draw_time).or_insert_with(|| DrawEvent {
                time: row.draw_time,
                is_test: row.is_test,
                admin: row.admin_user.clone(),
                winners: Vec::new(),
            });
            event.winners.push(WinnerRef {
                place: row.place,
                participant_id: row.participant_id.clone(),
            });
        }
        let mut events: Vec<DrawEvent> = grouped.into_values().rev().collect();
        for event in &mut events {
            event.winners.sort_by_key(|w| w.place);
        }
        events
    }

    pub async fn remove_test_rows(&self) -> Result<usize, StoreError> {
        let mut g = self.inner.write().await;
        let before = std::mem::take(&mut g.rows);
        let (test, real): (Vec<_>, Vec<_>) = before.into_iter().partition(|r| r.is_test);
        g.rows = real;
        if let Err(e) = self.persist(&g) {
            g.rows.extend(test);
            return Err(e);
        }
        Ok(test.len())
    }

    #[cfg(test)]
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

/// Per-draw invariants: a shared timestamp and mode, places exactly
/// `{1..k}`, pairwise distinct participants.
fn validate_draw(records: &[WinnerRecord]) -> Result<(), StoreError> {
    let first = records
        .first()
        .ok_or_else(|| StoreError::Invariant("empty draw".to_string()))?;
    if records
        .iter()
        .any(|r| r.draw_time != first.draw_time || r.is_test != first.is_test)
    {
        return Err(StoreError::Invariant(
            "draw records must share one timestamp and mode".to_string(),
        ));
    }
    let mut places: Vec<u32> = records.iter().map(|r| r.place).collect();
    places.sort_unstable();
    if places != (1..=records.len() as u32).collect::<Vec<_>>() {
        return Err(StoreError::Invariant(
            "places must be exactly 1..k".to_string(),
        ));
    }
    let mut ids: Vec<&str> = records.iter().map(|r| r.participant_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.len() != records.len() {
        return Err(StoreError::Invariant(
            "a participant cannot win twice in one draw".to_string(),
        ));
    }
    Ok(())
}
