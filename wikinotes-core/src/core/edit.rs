//! Editing commands a UI host dispatches into a
//! [`DocumentSession`](crate::DocumentSession).

use crate::{AddPosition, DeleteStrategy, DropPosition, NodeUpdate};
use serde::{Deserialize, Serialize};

/// One user intent against the current document.
///
/// Serialized with an internal `type` tag so a front end can send edits as
/// plain JSON objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Edit {
    /// Insert an empty node under `parent_id` (root when `None`).
    AddNode {
        #[serde(default)]
        parent_id: Option<String>,
        /// Position among siblings; appended when `None`.
        #[serde(default)]
        index: Option<usize>,
    },
    /// Remove a node, optionally promoting its children.
    DeleteNode {
        node_id: String,
        #[serde(default)]
        strategy: DeleteStrategy,
    },
    /// Drag-and-drop relocation of a subtree.
    MoveNode {
        dragged_id: String,
        target_id: String,
        position: DropPosition,
    },
    /// Field changes on one node. Only committed updates (on blur or
    /// explicit completion) become undo steps.
    UpdateNode {
        node_id: String,
        update: NodeUpdate,
        #[serde(default)]
        commit: bool,
    },
    /// Show or hide a node's children.
    ToggleCollapse { node_id: String },
    /// Show or hide a node's note.
    ToggleNote { node_id: String },
    /// Snapshot a subtree into the clipboard.
    Copy { node_id: String },
    /// Snapshot a subtree into the clipboard and remove it.
    Cut { node_id: String },
    /// Insert the clipboard contents relative to `target_id`, or at the end
    /// of the root list when `None`.
    Paste {
        #[serde(default)]
        target_id: Option<String>,
        position: AddPosition,
    },
    Undo,
    Redo,
    /// Zoom into a node, or out when it is already zoomed or `None`.
    Zoom {
        #[serde(default)]
        node_id: Option<String>,
    },
}

impl Edit {
    /// Whether applying this edit records a new undo snapshot.
    ///
    /// Structural edits always do. Field updates do only when committed;
    /// display toggles, clipboard reads, zoom and history navigation never do.
    #[must_use]
    pub fn records_history(&self) -> bool {
        match self {
            Self::AddNode { .. }
            | Self::DeleteNode { .. }
            | Self::MoveNode { .. }
            | Self::Cut { .. }
            | Self::Paste { .. } => true,
            Self::UpdateNode { commit, .. } => *commit,
            Self::ToggleCollapse { .. }
            | Self::ToggleNote { .. }
            | Self::Copy { .. }
            | Self::Undo
            | Self::Redo
            | Self::Zoom { .. } => false,
        }
    }
}

/// What [`DocumentSession::apply`](crate::DocumentSession::apply) did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    /// The visible document (forest, clipboard or zoom) changed.
    pub changed: bool,
    /// Id of a node created by `AddNode` or `Paste`.
    pub created_id: Option<String>,
}

impl EditOutcome {
    pub(crate) fn changed(changed: bool) -> Self {
        Self { changed, created_id: None }
    }

    pub(crate) fn created(created_id: Option<String>) -> Self {
        Self { changed: created_id.is_some(), created_id }
    }
}
