//! Linear undo/redo over committed snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::Element;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A committed element list. Shared, never mutated in place.
pub type Snapshot = Arc<[Element]>;

/// Bounded undo/redo stacks of committed snapshots.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    limit: usize,
}

impl History {
    /// Create an empty history with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an empty history keeping at most `limit` undo steps.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the snapshot being replaced by a commit.
    ///
    /// Clears the redo stack and drops the oldest entry past the limit.
    pub fn record(&mut self, previous: Snapshot) {
        self.future.clear();
        if self.past.len() >= self.limit {
            self.past.pop_front();
        }
        self.past.push_back(previous);
    }

    /// Step back: returns the snapshot to restore, keeping `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward: returns the snapshot to restore, keeping `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    /// Check if there is anything to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if there is anything to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.past.len()
    }

    /// Check if the undo stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(count: usize) -> Snapshot {
        (0..count).map(|_| Element::text("h")).collect()
    }

    #[test]
    fn test_undo_redo_round() {
        let mut history = History::new();
        let first = snapshot(0);
        let second = snapshot(1);

        history.record(first.clone());
        let restored = history.undo(second.clone()).expect("one step recorded");
        assert!(Arc::ptr_eq(&restored, &first));
        assert!(history.can_redo());

        let again = history.redo(restored).expect("one step undone");
        assert!(Arc::ptr_eq(&again, &second));
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(snapshot(0));
        let _ = history.undo(snapshot(1));
        assert!(history.can_redo());

        history.record(snapshot(1));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(2);
        history.record(snapshot(0));
        history.record(snapshot(1));
        history.record(snapshot(2));
        assert_eq!(history.len(), 2);

        let newest = history.undo(snapshot(3)).expect("entry");
        assert_eq!(newest.len(), 2);
        let older = history.undo(newest).expect("entry");
        assert_eq!(older.len(), 1);
        assert!(history.undo(older).is_none());
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert!(history.is_empty());
        assert!(history.undo(snapshot(0)).is_none());
        assert!(history.redo(snapshot(0)).is_none());
    }
}
