//! Single-slot copy/cut/paste buffer.

use crate::{IdGenerator, Node};
use serde::{Deserialize, Serialize};

/// How the clipboard entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipboardOperation {
    /// Survives any number of pastes.
    Copy,
    /// Cleared by the first paste.
    Cut,
}

/// A deep snapshot of a node subtree and the operation that captured it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardEntry {
    pub node: Node,
    pub operation: ClipboardOperation,
}

/// Holds at most one [`ClipboardEntry`]; each copy or cut replaces it.
///
/// Cutting only records the snapshot; removing the node from the tree is
/// up to the caller.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entry: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, node: &Node) {
        self.store(node, ClipboardOperation::Copy);
    }

    pub fn cut(&mut self, node: &Node) {
        self.store(node, ClipboardOperation::Cut);
    }

    fn store(&mut self, node: &Node, operation: ClipboardOperation) {
        log::debug!("clipboard: {operation:?} {}", node.id);
        self.entry = Some(ClipboardEntry { node: node.clone(), operation });
    }

    /// Returns a copy of the stored subtree with fresh ids on every node,
    /// or `None` when the clipboard is empty.
    ///
    /// Descendants' `parent_id`s are rewritten to the new ids; the top
    /// node keeps its recorded `parent_id` until it is inserted. A cut
    /// entry is consumed by this call.
    pub fn paste(&mut self, ids: &mut dyn IdGenerator) -> Option<Node> {
        let entry = self.entry.as_ref()?;
        let mut node = entry.node.clone();
        let parent_id = node.parent_id.clone();
        reassign_ids(&mut node, parent_id, ids);

        if entry.operation == ClipboardOperation::Cut {
            self.entry = None;
        }
        Some(node)
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn can_paste(&self) -> bool {
        self.entry.is_some()
    }

    pub fn entry(&self) -> Option<&ClipboardEntry> {
        self.entry.as_ref()
    }
}

fn reassign_ids(node: &mut Node, parent_id: Option<String>, ids: &mut dyn IdGenerator) {
    node.id = ids.next_id();
    node.parent_id = parent_id;
    let id = node.id.clone();
    for child in &mut node.children {
        reassign_ids(child, Some(id.clone()), ids);
    }
}
