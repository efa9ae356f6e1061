//! Delete strategy and result types for node removal.
//!
//! Two strategies are supported:
//!
//! - [`DeleteStrategy::DeleteAll`] removes the target node and its whole
//!   subtree.
//! - [`DeleteStrategy::PromoteChildren`] removes only the target node and
//!   splices its direct children into the vacated position, in order.
//!
//! Both types cross the UI boundary as JSON: `DeleteStrategy` variants
//! serialize as PascalCase strings, `DeleteResult` fields in camelCase.
//!
//! ```rust
//! use wikinotes_core::{DeleteResult, DeleteStrategy};
//!
//! let json = serde_json::to_string(&DeleteStrategy::PromoteChildren).unwrap();
//! assert_eq!(json, r#""PromoteChildren""#);
//!
//! let result = DeleteResult { deleted_count: 2, affected_ids: vec!["a".into(), "b".into()] };
//! assert!(serde_json::to_string(&result).unwrap().contains("deletedCount"));
//! ```

use serde::{Deserialize, Serialize};

/// Determines how children are handled when a node is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DeleteStrategy {
    /// Delete the target node and all of its descendants.
    #[default]
    DeleteAll,

    /// Delete only the target node; its children take its place.
    PromoteChildren,
}

impl DeleteStrategy {
    /// Maps the UI's `deleteChildren` flag onto a strategy.
    pub fn from_delete_children(delete_children: bool) -> Self {
        if delete_children {
            Self::DeleteAll
        } else {
            Self::PromoteChildren
        }
    }
}

/// The outcome of a delete performed through a
/// [`DocumentSession`](crate::DocumentSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Number of nodes removed from the forest.
    pub deleted_count: usize,

    /// IDs of the removed nodes followed by any promoted children.
    pub affected_ids: Vec<String>,
}
