//! Debounced draft autosave.
//!
//! The [`Debouncer`] holds a single deadline that every qualifying mutation
//! pushes out; the owner polls it with the current time. The [`DraftRing`]
//! persists drafts as a bounded list, newest last.

use crate::core::build::Build;
use crate::core::error::QuadcalcError;
use crate::core::kv::{self, KeyValueStore};

pub const DEFAULT_DEBOUNCE_MS: i64 = 1000;
pub const DEFAULT_DRAFT_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: i64,
    deadline: Option<i64>,
}

impl Debouncer {
    pub fn new(delay_ms: i64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// (Re)start the quiet period at `now`. A huge delay pins the deadline at
    /// `i64::MAX` instead of wrapping.
    pub fn schedule(&mut self, now: i64) {
        self.deadline = Some(now.saturating_add(self.delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    /// Consumes the pending deadline if it has elapsed.
    pub fn fire_if_due(&mut self, now: i64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Bounded draft list under one storage key.
#[derive(Debug, Clone)]
pub struct DraftRing {
    key: String,
    limit: usize,
}

impl DraftRing {
    pub fn new(key: impl Into<String>, limit: usize) -> Self {
        Self {
            key: key.into(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Stored drafts, oldest first. Unreadable storage reads as empty.
    pub fn load(&self, kv: &dyn KeyValueStore) -> Vec<Build> {
        kv::read_json_or_default(kv, &self.key)
    }

    pub fn latest(&self, kv: &dyn KeyValueStore) -> Option<Build> {
        self.load(kv).pop()
    }

    /// Append a draft, evicting the oldest entries beyond the limit.
    pub fn push(&self, kv: &dyn KeyValueStore, draft: Build) -> Result<(), QuadcalcError> {
        let mut drafts = self.load(kv);
        drafts.push(draft);
        if drafts.len() > self.limit {
            let excess = drafts.len() - self.limit;
            drafts.drain(..excess);
        }
        kv::write_json(kv, &self.key, &drafts)
    }
}
