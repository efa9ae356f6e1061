//! Core library for Wikinotes, a hierarchical outliner over plain bullet text.
//!
//! A document is stored as indented bullet text and edited as a forest of
//! [`Node`]s. The text codec ([`parse`], [`serialize`]) converts between the
//! two; the functions in [`core::tree`] derive new forests from old ones
//! without mutating their input. [`DocumentSession`] is the primary entry
//! point for a UI host: it owns undo history, the clipboard, zoom and
//! debounced autosave for one open document.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    autosave::{AutosaveScheduler, PendingSave, DEFAULT_AUTOSAVE_DELAY_MS},
    clipboard::{Clipboard, ClipboardEntry, ClipboardOperation},
    codec::{parse, parse_at, serialize, serialize_with, SerializeOptions},
    config::OutlineConfig,
    delete::{DeleteResult, DeleteStrategy},
    edit::{Edit, EditOutcome},
    error::{Result, WikiError},
    export::{export_document, import_document, ExportDocument, APP_VERSION, EXPORT_VERSION},
    history::{History, DEFAULT_HISTORY_LIMIT},
    ids::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidIds},
    node::{validate_forest, Forest, Node, NodeUpdate},
    session::{AddPosition, DocumentSession},
    storage::{DocumentSummary, Storage},
    store::{DocumentStore, MemoryStore},
    tree::{
        add_node, collapse_all, collect_ids, contains_node, delete_node, expand_all, find_node,
        insert_subtree, is_descendant, locate_node, move_node, structural_depth, update_node,
        count_nodes, DropPosition, NodeLocation,
    },
    zoom::{derive_display_forest, ZoomState},
};
