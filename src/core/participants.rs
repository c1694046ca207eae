//! Participant store service.
//!
//! Records are immutable once created; the only deletion path is the
//! test-data reset, which removes `is_test` rows exclusively.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::store::{self, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub is_test: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticipantFilter {
    #[default]
    All,
    Test,
    Real,
}

impl ParticipantFilter {
    /// Maps the `filter` query parameter; unknown values mean no filter.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("test") => Self::Test,
            Some("real") => Self::Real,
            _ => Self::All,
        }
    }

    fn matches(self, row: &Participant) -> bool {
        match self {
            Self::All => true,
            Self::Test => row.is_test,
            Self::Real => !row.is_test,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Firstname,
    Lastname,
    Email,
    CreatedAt,
}

impl SortKey {
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some("firstname") => Some(Self::Firstname),
            Some("lastname") => Some(Self::Lastname),
            Some("email") => Some(Self::Email),
            Some("created_at") => Some(Self::CreatedAt),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticipantQuery {
    pub filter: ParticipantFilter,
    pub search: Option<String>,
    /// `None` falls back to newest-first, matching the admin panel default.
    pub sort: Option<(SortKey, bool)>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Participant>,
}

#[derive(Clone)]
pub struct ParticipantStore {
    inner: Arc<RwLock<Inner>>,
    snapshot: Option<PathBuf>,
}

impl ParticipantStore {
    /// Opens the store, loading the snapshot file when present.
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

    pub async fn register(
        &self,
        firstname: &str,
        lastname: &str,
        email: &str,
        is_test: bool,
    ) -> Result<Participant, StoreError> {
        let row = Participant {
            id: Uuid::new_v4().to_string(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            is_test,
            created_at: Utc::now(),
        };
        let mut g = self.inner.write().await;
        g.rows.push(row.clone());
        if let Err(e) = self.persist(&g) {
            g.rows.pop();
            return Err(e);
        }
        Ok(row)
    }

    pub async fn list(&self, query: &ParticipantQuery) -> Vec<Participant> {
        let g = self.inner.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut rows: Vec<Participant> = g
            .rows
            .iter()
            .filter(|r| query.filter.matches(r))
            .filter(|r| match &needle {
                Some(n) => {
                    r.firstname.to_lowercase().contains(n)
                        || r.lastname.to_lowercase().contains(n)
                        || r.email.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        match query.sort {
            Some((key, descending)) => {
                rows.sort_by(|a, b| {
                    let ord = match key {
                        SortKey::Firstname => {
                            a.firstname.to_lowercase().cmp(&b.firstname.to_lowercase())
                        }
                        SortKey::Lastname => {
                            a.lastname.to_lowercase().cmp(&b.lastname.to_lowercase())
                        }
                        SortKey::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
                        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                    };
                    if descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                });
            }
            None => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        rows
    }

    /// The draw pool: ids of all participants whose test flag matches the
    /// requested draw mode. Test and real pools never mix.
    pub async fn eligible_ids(&self, test_draw: bool) -> Vec<String> {
        let g = self.inner.read().await;
        g.rows
            .iter()
            .filter(|r| r.is_test == test_draw)
            .map(|r| r.id.clone())
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Participant> {
        let g = self.inner.read().await;
        g.rows.iter().find(|r| r.id == id).cloned()
    }

    /// Removes all test rows; real rows are untouched. Returns the number of
    /// removed rows, which may be zero.
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
}

/// Basic syntactic email check: one `@`, no whitespace, dotted domain.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}
