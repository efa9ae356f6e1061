//! Pure tree mutations over a forest.
//!
//! Every function takes the current forest by reference and returns a new
//! one. Operations naming an id that is not in the forest return an
//! unchanged copy; stale ids are expected from racing UI events and are
//! never an error.

use crate::{DeleteStrategy, IdGenerator, Node, NodeUpdate};
use serde::{Deserialize, Serialize};

/// Where a dragged node lands relative to its drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DropPosition {
    /// Sibling of the target, immediately before it.
    Before,
    /// Sibling of the target, immediately after it.
    After,
    /// Last child of the target.
    Inside,
}

/// The structural position of a node: its parent (`None` at root) and its
/// index among that parent's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLocation {
    pub parent_id: Option<String>,
    pub index: usize,
}

// ── queries ─────────────────────────────────────────────────────

/// Depth-first search for `id` anywhere in the forest.
pub fn find_node<'a>(forest: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn find_node_mut<'a>(forest: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains_node(forest: &[Node], id: &str) -> bool {
    find_node(forest, id).is_some()
}

/// Returns the structural parent and sibling index of `id`.
pub fn locate_node(forest: &[Node], id: &str) -> Option<NodeLocation> {
    fn search(siblings: &[Node], parent_id: Option<&str>, id: &str) -> Option<NodeLocation> {
        if let Some(index) = siblings.iter().position(|n| n.id == id) {
            return Some(NodeLocation { parent_id: parent_id.map(str::to_string), index });
        }
        siblings.iter().find_map(|n| search(&n.children, Some(&n.id), id))
    }
    search(forest, None, id)
}

/// Returns `true` if `id` lies strictly below `ancestor_id`.
pub fn is_descendant(forest: &[Node], ancestor_id: &str, id: &str) -> bool {
    find_node(forest, ancestor_id)
        .is_some_and(|ancestor| find_node(&ancestor.children, id).is_some())
}

/// Zero-based structural depth of `id` (roots are at depth 0).
pub fn structural_depth(forest: &[Node], id: &str) -> Option<usize> {
    fn search(siblings: &[Node], depth: usize, id: &str) -> Option<usize> {
        siblings.iter().find_map(|n| {
            if n.id == id {
                Some(depth)
            } else {
                search(&n.children, depth + 1, id)
            }
        })
    }
    search(forest, 0, id)
}

/// All ids in depth-first, parent-before-children order.
pub fn collect_ids(forest: &[Node]) -> Vec<String> {
    let mut ids = Vec::new();
    for root in forest {
        root.walk(&mut |n| ids.push(n.id.clone()));
    }
    ids
}

pub fn count_nodes(forest: &[Node]) -> usize {
    forest.iter().map(Node::subtree_len).sum()
}

// ── display flags ───────────────────────────────────────────────

/// Copy of `forest` with every node expanded.
pub fn expand_all(forest: &[Node]) -> Vec<Node> {
    let mut next = forest.to_vec();
    for root in &mut next {
        root.walk_mut(&mut |n| n.is_collapsed = false);
    }
    next
}

/// Copy of `forest` with every node that has children collapsed.
pub fn collapse_all(forest: &[Node]) -> Vec<Node> {
    let mut next = forest.to_vec();
    for root in &mut next {
        root.walk_mut(&mut |n| n.is_collapsed = !n.children.is_empty());
    }
    next
}

// ── mutations ───────────────────────────────────────────────────

/// Applies `update` to the node with `id` and refreshes its `updated_at`.
///
/// A non-blank `update.note` always turns the note visible, regardless of
/// `update.is_note_visible`.
pub fn update_node(forest: &[Node], id: &str, update: &NodeUpdate, now: i64) -> Vec<Node> {
    let mut next = forest.to_vec();
    let Some(node) = find_node_mut(&mut next, id) else {
        log::debug!("update_node: no node {id}");
        return forest.to_vec();
    };

    if let Some(content) = &update.content {
        node.content.clone_from(content);
    }
    if let Some(is_note_visible) = update.is_note_visible {
        node.is_note_visible = is_note_visible;
    }
    if let Some(note) = &update.note {
        node.note.clone_from(note);
        if !note.trim().is_empty() {
            node.is_note_visible = true;
        }
    }
    if let Some(is_collapsed) = update.is_collapsed {
        node.is_collapsed = is_collapsed;
    }
    if let Some(level) = update.level {
        node.level = level;
    }
    node.updated_at = now;
    next
}

/// Inserts an empty node under `parent_id` (or at root) at `index`,
/// appending when `index` is `None` or past the end.
///
/// Returns the new forest and the new node's id, or `None` (with the forest
/// unchanged) when `parent_id` does not exist.
pub fn add_node(
    forest: &[Node],
    parent_id: Option<&str>,
    index: Option<usize>,
    ids: &mut dyn IdGenerator,
    now: i64,
) -> (Vec<Node>, Option<String>) {
    let mut next = forest.to_vec();

    let (siblings, level) = match parent_id {
        None => (&mut next, 0),
        Some(pid) => match find_node_mut(&mut next, pid) {
            Some(parent) => {
                let level = parent.level + 1;
                (&mut parent.children, level)
            }
            None => {
                log::debug!("add_node: no parent {pid}");
                return (forest.to_vec(), None);
            }
        },
    };

    let id = ids.next_id();
    let node = Node::empty(id.clone(), level, parent_id.map(str::to_string), now);
    insert_at(siblings, index, node);
    (next, Some(id))
}

/// Removes the node with `id`.
///
/// With [`DeleteStrategy::PromoteChildren`] its children are spliced into
/// the vacated slot, in order, taking over the deleted node's `level` and
/// `parent_id`. Their descendants shift by the same number of levels.
pub fn delete_node(forest: &[Node], id: &str, strategy: DeleteStrategy) -> Vec<Node> {
    let mut next = forest.to_vec();
    let Some(location) = locate_node(&next, id) else {
        log::debug!("delete_node: no node {id}");
        return forest.to_vec();
    };
    let Some(siblings) = sibling_list_mut(&mut next, location.parent_id.as_deref()) else {
        return forest.to_vec();
    };

    let removed = siblings.remove(location.index);
    if strategy == DeleteStrategy::PromoteChildren {
        let Node { level, parent_id, children, .. } = removed;
        let promoted = children.into_iter().map(|mut child| {
            reposition(&mut child, parent_id.clone(), level);
            child
        });
        siblings.splice(location.index..location.index, promoted);
    }
    next
}

/// Moves the subtree rooted at `dragged_id` relative to `target_id`.
///
/// `Before`/`After` make it a sibling of the target at the target's level;
/// `Inside` appends it to the target's children one level deeper. The
/// forest is returned unchanged when the ids are equal, either id is
/// missing, or the target lies inside the dragged subtree.
pub fn move_node(forest: &[Node], dragged_id: &str, target_id: &str, position: DropPosition) -> Vec<Node> {
    if dragged_id == target_id {
        return forest.to_vec();
    }
    if !contains_node(forest, dragged_id) || !contains_node(forest, target_id) {
        log::debug!("move_node: {dragged_id} or {target_id} not found");
        return forest.to_vec();
    }
    if is_descendant(forest, dragged_id, target_id) {
        log::warn!("move_node: refusing to move {dragged_id} into its own descendant {target_id}");
        return forest.to_vec();
    }

    let mut next = forest.to_vec();
    let Some(mut subtree) = detach(&mut next, dragged_id) else {
        return forest.to_vec();
    };

    match position {
        DropPosition::Inside => {
            let Some(target) = find_node_mut(&mut next, target_id) else {
                return forest.to_vec();
            };
            reposition(&mut subtree, Some(target.id.clone()), target.level + 1);
            target.children.push(subtree);
        }
        DropPosition::Before | DropPosition::After => {
            let Some(location) = locate_node(&next, target_id) else {
                return forest.to_vec();
            };
            let Some(target_level) = find_node(&next, target_id).map(|t| t.level) else {
                return forest.to_vec();
            };
            reposition(&mut subtree, location.parent_id.clone(), target_level);
            let Some(siblings) = sibling_list_mut(&mut next, location.parent_id.as_deref()) else {
                return forest.to_vec();
            };
            let at = match position {
                DropPosition::Before => location.index,
                _ => location.index + 1,
            };
            siblings.insert(at, subtree);
        }
    }
    next
}

/// Places an existing subtree under `parent_id` (or at root) at `index`.
///
/// The top node's `parent_id` is rewritten and the whole subtree's levels
/// shift so the top sits one below its new parent. Returns the forest
/// unchanged when `parent_id` does not exist.
pub fn insert_subtree(
    forest: &[Node],
    mut subtree: Node,
    parent_id: Option<&str>,
    index: Option<usize>,
) -> Vec<Node> {
    let mut next = forest.to_vec();
    let siblings = match parent_id {
        None => {
            reposition(&mut subtree, None, 0);
            &mut next
        }
        Some(pid) => match find_node_mut(&mut next, pid) {
            Some(parent) => {
                reposition(&mut subtree, Some(parent.id.clone()), parent.level + 1);
                &mut parent.children
            }
            None => {
                log::debug!("insert_subtree: no parent {pid}");
                return forest.to_vec();
            }
        },
    };
    insert_at(siblings, index, subtree);
    next
}

// ── internals ───────────────────────────────────────────────────

fn insert_at(siblings: &mut Vec<Node>, index: Option<usize>, node: Node) {
    let at = index.map_or(siblings.len(), |i| i.min(siblings.len()));
    siblings.insert(at, node);
}

fn sibling_list_mut<'a>(forest: &'a mut Vec<Node>, parent_id: Option<&str>) -> Option<&'a mut Vec<Node>> {
    match parent_id {
        None => Some(forest),
        Some(pid) => find_node_mut(forest, pid).map(|parent| &mut parent.children),
    }
}

fn detach(siblings: &mut Vec<Node>, id: &str) -> Option<Node> {
    if let Some(index) = siblings.iter().position(|n| n.id == id) {
        return Some(siblings.remove(index));
    }
    siblings.iter_mut().find_map(|n| detach(&mut n.children, id))
}

fn reposition(node: &mut Node, parent_id: Option<String>, level: usize) {
    node.parent_id = parent_id;
    let delta = level as isize - node.level as isize;
    node.shift_levels(delta);
}
