//! Undo/redo history of full canvas states.

use std::collections::VecDeque;

use crate::config::DEFAULT_HISTORY_DEPTH;
use crate::layer::{Layer, LayerId};

/// Immutable snapshot of every layer plus the selection and document size.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub layers: Vec<Layer>,
    pub selected_layer_id: LayerId,
    pub width: u32,
    pub height: u32,
}

/// Linear history with the current state on top of the undo stack.
///
/// The bottom entry is the initial state and is never undone past.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl HistoryStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record a new current state. Returns `false` when it equals the current top.
    pub fn push(&mut self, entry: HistoryEntry) -> bool {
        if self.undo_stack.back() == Some(&entry) {
            return false;
        }
        self.undo_stack.push_back(entry);
        self.redo_stack.clear();
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        log::debug!(
            "History push: {} undo, {} redo",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        true
    }

    /// Step back. Returns a copy of the state to restore.
    pub fn undo(&mut self) -> Option<HistoryEntry> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let current = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        self.undo_stack.back().cloned()
    }

    /// Step forward. Returns a copy of the state to restore.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push_back(entry.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Steps available to undo (the initial state is not counted).
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len().saturating_sub(1)
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Total stored states, the current one included.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.undo_stack.back()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
