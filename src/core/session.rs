//! Admin session tokens.
//!
//! In-memory only: sessions do not survive a restart, matching the original
//! deployment. Tokens are 32 random bytes from the OS generator, hex
//! encoded; expired entries are dropped on access.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::OsRng;
use rand::RngCore;
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "tombola_session";

struct Session {
    username: String,
    created_at: Instant,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn create(&self, username: &str) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let token: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        let mut g = self.inner.write().await;
        g.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                created_at: Instant::now(),
            },
        );
        token
    }

    /// Returns the admin username behind a live token, dropping it if it has
    /// expired.
    pub async fn validate(&self, token: &str) -> Option<String> {
        let mut g = self.inner.write().await;
        match g.get(token) {
            Some(session) if session.created_at.elapsed() <= self.ttl => {
                Some(session.username.clone())
            }
            Some(_) => {
                g.remove(token);
                None
            }
            None => None,
        }
    }

    pub async fn destroy(&self, token: &str) {
        self.inner.write().await.remove(token);
    }
}
