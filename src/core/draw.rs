//! The winner draw engine.
//!
//! Selection is uniform sampling without replacement over the eligible pool,
//! driven by the operating system's random generator. Fairness of a prize
//! draw is a correctness requirement, so a predictable statistical PRNG is
//! not an acceptable substitute here.
//!
//! The engine records every selection in the draw log before reporting
//! success; a failed log write fails the whole draw instead of reporting
//! winners that were never recorded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::draw_log::{DrawLogStore, WinnerRecord};
use crate::core::participants::{Participant, ParticipantStore};
use crate::core::store::StoreError;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("insufficient participants: {available} available, {required} required")]
    InsufficientParticipants { available: usize, required: usize },
    #[error("winner {0} missing from participant store")]
    MissingWinner(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One selected winner: participant id and rank, places starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub participant_id: String,
    pub place: u32,
}

/// Pure selection over a materialized pool of unique ids. Seam for tests;
/// the production implementation is [`OsSelector`].
pub trait WinnerSelector: Send + Sync {
    fn select(&self, pool: &[String], winner_count: usize) -> Result<Vec<Selection>, DrawError>;
}

/// Uniform sampling without replacement from the OS random generator.
pub struct OsSelector;

impl WinnerSelector for OsSelector {
    fn select(&self, pool: &[String], winner_count: usize) -> Result<Vec<Selection>, DrawError> {
        if pool.len() < winner_count {
            return Err(DrawError::InsufficientParticipants {
                available: pool.len(),
                required: winner_count,
            });
        }
        let mut remaining: Vec<String> = pool.to_vec();
        let mut selections = Vec::with_capacity(winner_count);
        let mut rng = OsRng;
        for place in 1..=winner_count as u32 {
            let index = rng.gen_range(0..remaining.len());
            selections.push(Selection {
                participant_id: remaining.swap_remove(index),
                place,
            });
        }
        Ok(selections)
    }
}

/// A fully resolved winner, ready for display.
#[derive(Debug, Clone)]
pub struct DrawWinner {
    pub participant: Participant,
    pub place: u32,
}

#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub draw_time: DateTime<Utc>,
    pub test_draw: bool,
    pub winners: Vec<DrawWinner>,
}

/// Orchestrates one draw: pool fetch, selection, audit append, detail
/// resolution. Draws are serialized by a process-wide guard so two
/// simultaneous requests cannot select from the same pool concurrently.
pub struct DrawService {
    participants: ParticipantStore,
    draw_log: DrawLogStore,
    selector: Arc<dyn WinnerSelector>,
    winner_count: usize,
    guard: Mutex<()>,
}

impl DrawService {
    pub fn new(
        participants: ParticipantStore,
        draw_log: DrawLogStore,
        selector: Arc<dyn WinnerSelector>,
        winner_count: usize,
    ) -> Self {
        Self {
            participants,
            draw_log,
            selector,
            winner_count,
            guard: Mutex::new(()),
        }
    }

    /// Runs one draw in the given mode. The mode is an explicit parameter,
    /// read once per request by the caller, so a test-mode toggle cannot
    /// affect a draw already in flight. Never retries: a draw either fully
    /// succeeds once or is reported as failed.
    pub async fn run(&self, test_draw: bool, admin_user: &str) -> Result<DrawOutcome, DrawError> {
        let _serialized = self.guard.lock().await;

        let pool = self.participants.eligible_ids(test_draw).await;
        let selections = self.selector.select(&pool, self.winner_count)?;

        let draw_time = Utc::now();
        let records: Vec<WinnerRecord> = selections
            .iter()
            .map(|s| WinnerRecord {
                draw_time,
                participant_id: s.participant_id.clone(),
                place: s.place,
                is_test: test_draw,
                admin_user: admin_user.to_string(),
            })
            .collect();
        self.draw_log.append_draw(&records).await?;

        let mut winners = Vec::with_capacity(selections.len());
        for selection in &selections {
            let participant = self
                .participants
                .get(&selection.participant_id)
                .await
                .ok_or_else(|| DrawError::MissingWinner(selection.participant_id.clone()))?;
            winners.push(DrawWinner {
                participant,
                place: selection.place,
            });
        }
        winners.sort_by_key(|w| w.place);

        info!(
            "draw completed: {} winners, test_draw={}, by {}",
            winners.len(),
            test_draw,
            admin_user
        );
        Ok(DrawOutcome {
            draw_time,
            test_draw,
            winners,
        })
    }
}
