//! Password hashing and the in-memory session table.

use crate::error::{InventoryError, Result};
use anyhow::anyhow;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[cfg(not(test))]
const PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;
// Minimum cost keeps the unit tests fast.
#[cfg(test)]
const PASSWORD_COST: u32 = 4;

/// Sessions expire a day after they were opened unless configured otherwise.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns a bcrypt hash with a fresh salt embedded.
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, PASSWORD_COST)
        .map_err(|e| InventoryError::Internal(anyhow!("password hashing failed: {e}")))
}

/// A malformed stored hash never matches.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

/// Opaque bearer tokens mapped to user ids. Entries older than the TTL are
/// evicted lazily, on lookup and whenever a new session opens.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<Uuid, (i32, Instant)>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    pub fn open(&self, user_id: i32) -> Uuid {
        self.purge_expired();
        let token = Uuid::new_v4();
        self.sessions.insert(token, (user_id, Instant::now()));
        token
    }

    pub fn user_id(&self, token: &Uuid) -> Option<i32> {
        let (user_id, opened) = *self.sessions.get(token)?;
        if opened.elapsed() < self.ttl {
            return Some(user_id);
        }
        self.sessions.remove(token);
        None
    }

    pub fn close(&self, token: &Uuid) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn purge_expired(&self) {
        let ttl = self.ttl;
        self.sessions.retain(|_, (_, opened)| opened.elapsed() < ttl);
    }
}
