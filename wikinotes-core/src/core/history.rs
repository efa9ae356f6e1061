//! Linear, bounded undo/redo over full forest snapshots.

use crate::Node;

/// Number of snapshots retained when no limit is configured.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A snapshot stack with a cursor.
///
/// Pushing after an undo discards the redo branch. Once more than
/// `max_size` snapshots are held, the oldest is evicted and the cursor
/// shifts down with it. Undo and redo past either end are no-ops.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Node>>,
    current: usize,
    max_size: usize,
}

impl History {
    /// Starts a history holding `initial` as its only snapshot. A
    /// `max_size` of zero is treated as one.
    pub fn new(initial: Vec<Node>, max_size: usize) -> Self {
        Self {
            snapshots: vec![initial],
            current: 0,
            max_size: max_size.max(1),
        }
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &[Node] {
        &self.snapshots[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Records `state` as the newest snapshot.
    pub fn push(&mut self, state: Vec<Node>) {
        self.snapshots.truncate(self.current + 1);
        self.snapshots.push(state);
        if self.snapshots.len() > self.max_size {
            let excess = self.snapshots.len() - self.max_size;
            self.snapshots.drain(..excess);
        }
        self.current = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot. Returns the new current snapshot, or
    /// `None` when already at the oldest.
    pub fn undo(&mut self) -> Option<&[Node]> {
        if !self.can_undo() {
            return None;
        }
        self.current -= 1;
        Some(self.current())
    }

    /// Steps forward one snapshot. Returns the new current snapshot, or
    /// `None` when already at the newest.
    pub fn redo(&mut self) -> Option<&[Node]> {
        if !self.can_redo() {
            return None;
        }
        self.current += 1;
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current + 1 < self.snapshots.len()
    }

    /// Replaces the whole history with `state`, e.g. when switching documents.
    pub fn reset(&mut self, state: Vec<Node>) {
        self.snapshots = vec![state];
        self.current = 0;
    }
}
