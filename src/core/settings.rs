//! Settings store: a persisted string key/value map.
//!
//! Currently holds a single key, `test_mode`. Handlers read the flag once
//! per request and pass it along explicitly, so a toggle mid-request cannot
//! change the behavior of an in-flight intake or draw.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::store::{self, StoreError};

pub const TEST_MODE_KEY: &str = "test_mode";

#[derive(Default)]
struct Inner {
    values: HashMap<String, String>,
}

#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<Inner>>,
    snapshot: Option<PathBuf>,
}

impl SettingsStore {
    pub fn open(snapshot: Option<PathBuf>) -> Result<Self, StoreError> {
        let values = match &snapshot {
            Some(path) => store::read_snapshot(path)?.unwrap_or_default(),
            None => HashMap::new(),
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(Inner { values })),
            snapshot,
        })
    }

    fn persist(&self, inner: &Inner) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot {
            store::write_snapshot(path, &inner.values)?;
        }
        Ok(())
    }

    /// Missing key means test mode is off.
    pub async fn test_mode(&self) -> bool {
        let g = self.inner.read().await;
        g.values.get(TEST_MODE_KEY).map(String::as_str) == Some("true")
    }

    pub async fn set_test_mode(&self, enabled: bool) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        let previous = g.values.insert(
            TEST_MODE_KEY.to_string(),
            if enabled { "true" } else { "false" }.to_string(),
        );
        if let Err(e) = self.persist(&g) {
            match previous {
                Some(v) => {
                    g.values.insert(TEST_MODE_KEY.to_string(), v);
                }
                None => {
                    g.values.remove(TEST_MODE_KEY);
                }
            }
            return Err(e);
        }
        Ok(())
    }
}
