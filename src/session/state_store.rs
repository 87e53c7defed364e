//! Server-side record of issued OAuth `state` values
//!
//! A value is redeemable once, and only until its expiry. The store holds at
//! most `max_pending` values; issuing past that evicts the oldest.

use crate::oauth::OAuthError;
use crate::settings::OAuthStateSettings;
use crate::utils::crypto::generate_csrf_token;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Longest lifetime accepted for an issued state
const MAX_TTL_SECONDS: u64 = 86_400;

/// Pending states kept when no explicit limit is configured
pub const DEFAULT_MAX_PENDING: usize = 10_000;

pub struct OAuthStateStore {
    entries: DashMap<String, DateTime<Utc>>,
    // Issue order; with a fixed TTL this is also expiry order
    issued: Mutex<VecDeque<(String, DateTime<Utc>)>>,
    ttl: Duration,
    max_pending: usize,
}

impl OAuthStateStore {
    #[must_use]
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl_seconds = ttl_seconds.clamp(1, MAX_TTL_SECONDS);
        Self {
            entries: DashMap::new(),
            issued: Mutex::new(VecDeque::new()),
            ttl: Duration::seconds(i64::try_from(ttl_seconds).unwrap_or(600)),
            max_pending: DEFAULT_MAX_PENDING,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &OAuthStateSettings) -> Self {
        Self::new(settings.ttl_seconds).with_max_pending(settings.max_pending)
    }

    /// Cap the number of pending states; values below 1 are raised to 1
    #[must_use]
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending.max(1);
        self
    }

    #[must_use]
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }

    /// Generate and remember a fresh state value
    pub fn issue(&self) -> String {
        let state = generate_csrf_token();
        self.register(&state);
        state
    }

    /// Remember a state value generated elsewhere, starting its TTL now
    pub fn register(&self, state: &str) {
        self.record(state.to_string(), Utc::now() + self.ttl);
        debug!("Issued OAuth state ({} pending)", self.entries.len());
    }

    fn record(&self, state: String, expires_at: DateTime<Utc>) {
        let mut issued = self
            .issued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        self.drain_front(&mut issued, Utc::now());

        let mut evicted = 0usize;
        while issued.len() >= self.max_pending {
            let Some((oldest, _)) = issued.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                evicted += 1;
            }
        }
        if evicted > 0 {
            warn!(
                "OAuth state store full ({} pending), evicted {evicted} oldest state(s)",
                self.max_pending
            );
        }

        self.entries.insert(state.clone(), expires_at);
        issued.push_back((state, expires_at));
    }

    /// Pop leading entries that have expired or were already redeemed
    fn drain_front(&self, issued: &mut VecDeque<(String, DateTime<Utc>)>, now: DateTime<Utc>) {
        while let Some((state, expires_at)) = issued.front() {
            if *expires_at > now && self.entries.contains_key(state) {
                break;
            }
            self.entries.remove(state);
            issued.pop_front();
        }
    }

    /// Redeem a state value; it is removed whether or not it was still valid
    ///
    /// # Errors
    ///
    /// Returns `StateRejected` if the value was never issued, was already
    /// redeemed, has expired, or was evicted
    pub fn consume(&self, state: &str) -> Result<(), OAuthError> {
        match self.entries.remove(state) {
            Some((_, expires_at)) if expires_at > Utc::now() => Ok(()),
            Some(_) => {
                debug!("Rejected expired OAuth state");
                Err(OAuthError::StateRejected)
            }
            None => {
                debug!("Rejected unknown OAuth state");
                Err(OAuthError::StateRejected)
            }
        }
    }

    /// Drop leading entries past their expiry
    pub fn purge_expired(&self) {
        let mut issued = self
            .issued
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.drain_front(&mut issued, Utc::now());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a state with an explicit expiry
    #[cfg(any(test, feature = "testing"))]
    pub fn insert_with_expiry(&self, state: &str, expires_at: DateTime<Utc>) {
        self.record(state.to_string(), expires_at);
    }
}
