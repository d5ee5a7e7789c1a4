use std::collections::{hash_map::Entry, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::core::types::StateNonce;

/// Purge on insert once the cache grows past this many entries.
const PURGE_THRESHOLD: usize = 4096;

/// Nonces of state tokens that have already been redeemed.
///
/// Entries are kept until the token they belong to would have expired anyway.
#[derive(Debug, Default)]
pub struct ReplayCache {
    seen: Mutex<HashMap<StateNonce, DateTime<Utc>>>,
}

impl ReplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `nonce` as used. Returns `false` if it had been used before.
    pub fn consume(&self, nonce: &StateNonce, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let mut seen = self.lock();
        if seen.len() >= PURGE_THRESHOLD {
            seen.retain(|_, expiry| *expiry > now);
        }

        match seen.entry(nonce.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                true
            }
        }
    }

    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut seen = self.lock();
        let before = seen.len();
        seen.retain(|_, expiry| *expiry > now);
        before - seen.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<StateNonce, DateTime<Utc>>> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
