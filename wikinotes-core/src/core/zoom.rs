//! Display-only narrowing of the forest to one node's subtree.

use crate::{find_node, Node};

/// The single zoomed-in node id, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoomState {
    zoomed_id: Option<String>,
}

impl ZoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zooms into `node_id`, or out when `node_id` is `None` or already the
    /// zoomed node.
    pub fn toggle(&mut self, node_id: Option<&str>) {
        self.zoomed_id = match node_id {
            Some(id) if self.zoomed_id.as_deref() != Some(id) => Some(id.to_string()),
            _ => None,
        };
    }

    pub fn clear(&mut self) {
        self.zoomed_id = None;
    }

    pub fn zoomed_id(&self) -> Option<&str> {
        self.zoomed_id.as_deref()
    }
}

/// The part of `forest` to render: the zoomed node alone (subtree intact)
/// when it exists, otherwise the whole forest.
pub fn derive_display_forest<'a>(forest: &'a [Node], zoomed_id: Option<&str>) -> &'a [Node] {
    zoomed_id
        .and_then(|id| find_node(forest, id))
        .map_or(forest, std::slice::from_ref)
}
