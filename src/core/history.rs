//! Undo/redo history over full slot-map snapshots.
//!
//! `undo` is bounded (oldest snapshot evicted first); `redo` is unbounded but is
//! wiped by every forward mutation, so it is only non-empty right after an undo.

use crate::core::slots::SlotMap;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<SlotMap>,
    redo: Vec<SlotMap>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Snapshot taken before a forward mutation.
    pub fn record(&mut self, before: SlotMap) {
        self.undo.push_back(before);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Returns the state to restore, moving `current` onto the redo stack.
    pub fn undo(&mut self, current: &SlotMap) -> Option<SlotMap> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Returns the state to restore, moving `current` onto the undo stack.
    pub fn redo(&mut self, current: &SlotMap) -> Option<SlotMap> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.clone());
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        Some(next)
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Oldest retained snapshot.
    pub fn oldest(&self) -> Option<&SlotMap> {
        self.undo.front()
    }
}
