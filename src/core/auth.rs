//! Admin account directory.
//!
//! Passwords are stored as argon2id PHC strings. A default admin is
//! bootstrapped from config when the directory is empty, so a fresh
//! deployment is reachable without manual seeding.

use std::path::PathBuf;
use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::core::store::{self, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct AdminDirectory {
    inner: Arc<RwLock<Vec<AdminAccount>>>,
    snapshot: Option<PathBuf>,
}

impl AdminDirectory {
    pub fn open(snapshot: Option<PathBuf>) -> Result<Self, StoreError> {
        let accounts = match &snapshot {
            Some(path) => store::read_snapshot(path)?.unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(Self {
            inner: Arc::new(RwLock::new(accounts)),
            snapshot,
        })
    }

    fn persist(&self, accounts: &[AdminAccount]) -> Result<(), StoreError> {
        if let Some(path) = &self.snapshot {
            store::write_snapshot(path, &accounts)?;
        }
        Ok(())
    }

    /// Creates the default admin if no account exists yet.
    pub async fn bootstrap(&self, username: &str, password: &str) -> Result<(), StoreError> {
        let mut g = self.inner.write().await;
        if !g.is_empty() {
            return Ok(());
        }
        let account = AdminAccount {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        };
        g.push(account);
        if let Err(e) = self.persist(&g) {
            g.pop();
            return Err(e);
        }
        info!("default admin account created");
        Ok(())
    }

    /// Constant behavior on unknown usernames: the caller only learns
    /// valid/invalid, never which part was wrong.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        let g = self.inner.read().await;
        match g.iter().find(|a| a.username == username) {
            Some(account) => verify_password(password, &account.password_hash),
            None => false,
        }
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
