//! The outliner node: a recursive, exclusively owned tree element.

use crate::{Result, WikiError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered list of root nodes. "Tree" and "forest" are used interchangeably.
pub type Forest = Vec<Node>;

/// A single outliner entry with content, an optional note, and ordered children.
///
/// `children` is the authoritative parent/child relation; `parent_id` is a
/// back-reference that every mutator keeps in sync. `level` is a depth hint
/// persisted alongside the tree and may differ from structural depth when it
/// was set directly through [`NodeUpdate::level`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_note_visible: bool,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub level: usize,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Node {
    /// Creates an empty node with the given identity and position hints.
    pub fn empty(id: impl Into<String>, level: usize, parent_id: Option<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            note: String::new(),
            is_note_visible: false,
            children: Vec::new(),
            is_collapsed: false,
            level,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if the node has a non-blank note.
    pub fn has_note(&self) -> bool {
        !self.note.trim().is_empty()
    }

    /// Calls `f` on this node and every descendant, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Mutable counterpart of [`walk`](Self::walk).
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Adds `delta` to the level of this node and all of its descendants,
    /// saturating at zero.
    pub(crate) fn shift_levels(&mut self, delta: isize) {
        self.walk_mut(&mut |n| {
            n.level = n.level.saturating_add_signed(delta);
        });
    }
}

/// A partial update applied by [`update_node`](crate::update_node).
///
/// `None` fields are left untouched. Supplying a non-blank `note` always
/// makes the note visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_note_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
}

impl NodeUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self { note: Some(note.into()), ..Self::default() }
    }

    pub fn collapsed(is_collapsed: bool) -> Self {
        Self { is_collapsed: Some(is_collapsed), ..Self::default() }
    }

    pub fn note_visible(is_note_visible: bool) -> Self {
        Self { is_note_visible: Some(is_note_visible), ..Self::default() }
    }

    pub fn level(level: usize) -> Self {
        Self { level: Some(level), ..Self::default() }
    }
}

/// Checks the forest invariants: globally unique ids, and every `parent_id`
/// naming the node whose `children` holds it (absent for roots).
///
/// # Errors
///
/// Returns [`WikiError::InvalidDocument`] describing the first violation found.
pub fn validate_forest(forest: &[Node]) -> Result<()> {
    fn check(node: &Node, expected_parent: Option<&str>, seen: &mut HashSet<String>) -> Result<()> {
        if !seen.insert(node.id.clone()) {
            return Err(WikiError::InvalidDocument(format!("duplicate node id '{}'", node.id)));
        }
        if node.parent_id.as_deref() != expected_parent {
            return Err(WikiError::InvalidDocument(format!(
                "node '{}' has parent_id {:?}, expected {:?}",
                node.id, node.parent_id, expected_parent
            )));
        }
        for child in &node.children {
            check(child, Some(&node.id), seen)?;
        }
        Ok(())
    }

    let mut seen = HashSet::new();
    for root in forest {
        check(root, None, &mut seen)?;
    }
    Ok(())
}
