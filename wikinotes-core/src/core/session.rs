//! An open outline document: the editing surface a UI host talks to.

use crate::core::tree;
use crate::{
    derive_display_forest, find_node, locate_node, parse_at, serialize_with, AutosaveScheduler,
    Clipboard, Clock, DeleteResult, DeleteStrategy, DocumentStore, DropPosition, Edit,
    EditOutcome, History, IdGenerator, Node, NodeUpdate, OutlineConfig, PendingSave, Result,
    SystemClock, UuidIds, ZoomState,
};
use serde::{Deserialize, Serialize};

/// Controls where pasted content lands relative to the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddPosition {
    /// Insert as the first child of the target.
    AsChild,
    /// Insert immediately after the target within the same parent.
    AsSibling,
}

/// An open document with its undo history, clipboard, zoom and pending
/// autosave.
///
/// Edits run to completion one at a time against the latest state. Each
/// mutating call derives a new forest through the pure functions in
/// [`tree`](crate::core::tree) and then either records it as an undo step
/// or keeps it as an uncommitted working draft (typing in progress, display
/// toggles). Every visible change schedules a debounced save of the
/// serialized text; the host drives persistence through [`tick`](Self::tick)
/// and [`flush`](Self::flush).
pub struct DocumentSession {
    document_id: String,
    config: OutlineConfig,
    history: History,
    working: Option<Vec<Node>>,
    clipboard: Clipboard,
    zoom: ZoomState,
    autosave: AutosaveScheduler,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl DocumentSession {
    /// Opens `text` as document `document_id` with UUID ids and the system clock.
    pub fn new(document_id: impl Into<String>, text: &str, config: OutlineConfig) -> Self {
        Self::with_collaborators(document_id, text, config, Box::new(UuidIds), Box::new(SystemClock))
    }

    /// Opens `text` with injected id and time sources.
    pub fn with_collaborators(
        document_id: impl Into<String>,
        text: &str,
        config: OutlineConfig,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let document_id = document_id.into();
        let forest = parse_at(text, clock.now_millis());
        log::debug!("opened document {document_id} with {} root nodes", forest.len());
        Self {
            document_id,
            history: History::new(forest, config.history_limit),
            autosave: AutosaveScheduler::new(config.autosave_delay_ms),
            config,
            working: None,
            clipboard: Clipboard::new(),
            zoom: ZoomState::new(),
            ids,
            clock,
        }
    }

    /// Loads `document_id` from `store`.
    ///
    /// # Errors
    ///
    /// Propagates the store's error, e.g. [`crate::WikiError::DocumentNotFound`].
    pub fn open(store: &dyn DocumentStore, document_id: &str, config: OutlineConfig) -> Result<Self> {
        let text = store.load_document_text(document_id)?;
        Ok(Self::new(document_id, &text, config))
    }

    // ── state ───────────────────────────────────────────────────

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// The current forest, including any uncommitted working draft.
    pub fn forest(&self) -> &[Node] {
        self.working.as_deref().unwrap_or_else(|| self.history.current())
    }

    /// The forest narrowed to the zoomed node, if any.
    pub fn display_forest(&self) -> &[Node] {
        derive_display_forest(self.forest(), self.zoom.zoomed_id())
    }

    /// The current forest as document text, as it would be saved.
    pub fn text(&self) -> String {
        serialize_with(self.forest(), self.config.serialize_options())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn zoomed_id(&self) -> Option<&str> {
        self.zoom.zoomed_id()
    }

    pub fn pending_save(&self) -> Option<&PendingSave> {
        self.autosave.pending()
    }

    pub fn has_uncommitted_changes(&self) -> bool {
        self.working.is_some()
    }

    // ── structural edits ────────────────────────────────────────

    /// Inserts an empty node and returns its id so the caller can focus it.
    pub fn add_node(&mut self, parent_id: Option<&str>, index: Option<usize>) -> Option<String> {
        let now = self.clock.now_millis();
        let current = self.working.as_deref().unwrap_or_else(|| self.history.current());
        let (next, id) = tree::add_node(current, parent_id, index, self.ids.as_mut(), now);
        if id.is_some() {
            self.record(next);
        }
        id
    }

    /// Deletes `node_id`. A stale id yields an empty [`DeleteResult`].
    pub fn delete_node(&mut self, node_id: &str, strategy: DeleteStrategy) -> DeleteResult {
        let Some(node) = find_node(self.forest(), node_id) else {
            log::debug!("delete: no node {node_id}");
            return DeleteResult::default();
        };

        let result = match strategy {
            DeleteStrategy::DeleteAll => {
                let mut affected_ids = Vec::new();
                node.walk(&mut |n| affected_ids.push(n.id.clone()));
                DeleteResult { deleted_count: affected_ids.len(), affected_ids }
            }
            DeleteStrategy::PromoteChildren => {
                let mut affected_ids = vec![node.id.clone()];
                affected_ids.extend(node.children.iter().map(|c| c.id.clone()));
                DeleteResult { deleted_count: 1, affected_ids }
            }
        };

        let next = tree::delete_node(self.forest(), node_id, strategy);
        let next = self.ensure_insertion_point(next);
        self.record(next);
        result
    }

    /// Drag-and-drop move. Returns `false` when the move was rejected.
    pub fn move_node(&mut self, dragged_id: &str, target_id: &str, position: DropPosition) -> bool {
        let next = tree::move_node(self.forest(), dragged_id, target_id, position);
        self.record(next)
    }

    /// Applies `update` to `node_id`. Committed updates become an undo
    /// step; uncommitted ones stay in the working draft.
    pub fn update_node(&mut self, node_id: &str, update: &NodeUpdate, commit: bool) -> bool {
        if find_node(self.forest(), node_id).is_none() {
            log::debug!("update: no node {node_id}");
            return false;
        }
        let next = tree::update_node(self.forest(), node_id, update, self.clock.now_millis());
        if commit {
            self.commit(next)
        } else {
            self.stage(next)
        }
    }

    // ── display toggles ─────────────────────────────────────────

    pub fn toggle_collapse(&mut self, node_id: &str) -> bool {
        let Some(node) = find_node(self.forest(), node_id) else {
            return false;
        };
        let update = NodeUpdate::collapsed(!node.is_collapsed);
        self.update_node(node_id, &update, false)
    }

    pub fn toggle_note(&mut self, node_id: &str) -> bool {
        let Some(node) = find_node(self.forest(), node_id) else {
            return false;
        };
        let update = NodeUpdate::note_visible(!node.is_note_visible);
        self.update_node(node_id, &update, false)
    }

    /// Zooms into `node_id`, or back out when it is already zoomed or
    /// `None`. Returns whether the displayed forest changed; unknown ids are
    /// ignored.
    pub fn zoom_toggle(&mut self, node_id: Option<&str>) -> bool {
        if let Some(id) = node_id {
            if self.zoom.zoomed_id() != Some(id) && find_node(self.forest(), id).is_none() {
                log::debug!("zoom: no node {id}");
                return false;
            }
        }
        let before = self.effective_zoom().map(str::to_string);
        self.zoom.toggle(node_id);
        before.as_deref() != self.effective_zoom()
    }

    /// The zoomed id, if it still names a node.
    fn effective_zoom(&self) -> Option<&str> {
        self.zoom.zoomed_id().filter(|id| find_node(self.forest(), id).is_some())
    }

    // ── clipboard ───────────────────────────────────────────────

    pub fn copy(&mut self, node_id: &str) -> bool {
        let Some(node) = find_node(self.forest(), node_id) else {
            log::debug!("copy: no node {node_id}");
            return false;
        };
        let node = node.clone();
        self.clipboard.copy(&node);
        true
    }

    /// Copies `node_id` into the clipboard as a cut and removes its subtree
    /// in one undo step.
    pub fn cut(&mut self, node_id: &str) -> bool {
        let Some(node) = find_node(self.forest(), node_id) else {
            log::debug!("cut: no node {node_id}");
            return false;
        };
        let node = node.clone();
        self.clipboard.cut(&node);
        let next = tree::delete_node(self.forest(), node_id, DeleteStrategy::DeleteAll);
        let next = self.ensure_insertion_point(next);
        self.record(next)
    }

    /// Pastes the clipboard relative to `target_id`, or at the end of the
    /// root list when `target_id` is `None`. Returns the pasted node's id.
    ///
    /// Nothing is consumed when the clipboard is empty or the target is gone.
    pub fn paste(&mut self, target_id: Option<&str>, position: AddPosition) -> Option<String> {
        if !self.clipboard.can_paste() {
            log::debug!("paste: clipboard is empty");
            return None;
        }

        let (parent_id, index) = match target_id {
            None => (None, None),
            Some(target) => match position {
                AddPosition::AsChild if find_node(self.forest(), target).is_some() => {
                    (Some(target.to_string()), Some(0))
                }
                AddPosition::AsSibling => match locate_node(self.forest(), target) {
                    Some(location) => (location.parent_id, Some(location.index + 1)),
                    None => {
                        log::debug!("paste: no target {target}");
                        return None;
                    }
                },
                AddPosition::AsChild => {
                    log::debug!("paste: no target {target}");
                    return None;
                }
            },
        };

        let node = self.clipboard.paste(self.ids.as_mut())?;
        let id = node.id.clone();
        let next = tree::insert_subtree(self.forest(), node, parent_id.as_deref(), index);
        self.record(next);
        Some(id)
    }

    // ── history ─────────────────────────────────────────────────

    /// Steps back one edit.
    ///
    /// An uncommitted content draft counts as the most recent edit: it is
    /// recorded and then stepped over, so redo can bring it back. A draft
    /// that only toggles collapse or note visibility is dropped instead and
    /// leaves the redo branch alone.
    pub fn undo(&mut self) -> bool {
        match self.working.take() {
            Some(draft) if !same_outline(&draft, self.history.current()) => {
                self.history.push(draft);
            }
            Some(draft) if !self.history.can_undo() => {
                self.working = Some(draft);
                return false;
            }
            _ => {}
        }
        let moved = self.history.undo().is_some();
        if moved {
            self.schedule_save();
        }
        moved
    }

    /// Steps forward one edit, discarding any uncommitted working draft.
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.working = None;
        self.history.redo();
        self.schedule_save();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
            || self
                .working
                .as_deref()
                .is_some_and(|draft| !same_outline(draft, self.history.current()))
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── dispatch ────────────────────────────────────────────────

    /// Applies one [`Edit`].
    pub fn apply(&mut self, edit: Edit) -> EditOutcome {
        log::debug!("apply {edit:?}");
        let commit = edit.records_history();
        match edit {
            Edit::AddNode { parent_id, index } => {
                EditOutcome::created(self.add_node(parent_id.as_deref(), index))
            }
            Edit::DeleteNode { node_id, strategy } => {
                EditOutcome::changed(self.delete_node(&node_id, strategy).deleted_count > 0)
            }
            Edit::MoveNode { dragged_id, target_id, position } => {
                EditOutcome::changed(self.move_node(&dragged_id, &target_id, position))
            }
            Edit::UpdateNode { node_id, update, .. } => {
                EditOutcome::changed(self.update_node(&node_id, &update, commit))
            }
            Edit::ToggleCollapse { node_id } => EditOutcome::changed(self.toggle_collapse(&node_id)),
            Edit::ToggleNote { node_id } => EditOutcome::changed(self.toggle_note(&node_id)),
            Edit::Copy { node_id } => EditOutcome::changed(self.copy(&node_id)),
            Edit::Cut { node_id } => EditOutcome::changed(self.cut(&node_id)),
            Edit::Paste { target_id, position } => {
                EditOutcome::created(self.paste(target_id.as_deref(), position))
            }
            Edit::Undo => EditOutcome::changed(self.undo()),
            Edit::Redo => EditOutcome::changed(self.redo()),
            Edit::Zoom { node_id } => EditOutcome::changed(self.zoom_toggle(node_id.as_deref())),
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Writes the pending save to `store` if its debounce deadline passed.
    /// Returns whether a save happened.
    ///
    /// # Errors
    ///
    /// Propagates the store's error; the failed save is dropped.
    pub fn tick(&mut self, store: &mut dyn DocumentStore) -> Result<bool> {
        match self.autosave.take_due(self.clock.now_millis()) {
            Some(save) => Self::write(store, save),
            None => Ok(false),
        }
    }

    /// Writes any pending save immediately.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub fn flush(&mut self, store: &mut dyn DocumentStore) -> Result<bool> {
        match self.autosave.flush() {
            Some(save) => Self::write(store, save),
            None => Ok(false),
        }
    }

    fn write(store: &mut dyn DocumentStore, save: PendingSave) -> Result<bool> {
        if let Err(e) = store.save_document_text(&save.document_id, &save.text) {
            log::error!("failed to save document {}: {e}", save.document_id);
            return Err(e);
        }
        log::debug!("saved document {}", save.document_id);
        Ok(true)
    }

    /// Flushes the current document and opens `document_id` in its place.
    /// History, working draft and zoom are reset; the clipboard is kept.
    ///
    /// # Errors
    ///
    /// Propagates the store's error from either the flush or the load. On a
    /// load failure the current document stays open.
    pub fn switch_document(&mut self, store: &mut dyn DocumentStore, document_id: &str) -> Result<()> {
        self.flush(store)?;
        let text = store.load_document_text(document_id)?;
        let forest = parse_at(&text, self.clock.now_millis());
        log::info!("switched from document {} to {document_id}", self.document_id);
        self.document_id = document_id.to_string();
        self.history.reset(forest);
        self.working = None;
        self.zoom.clear();
        self.autosave.cancel();
        Ok(())
    }

    // ── internals ───────────────────────────────────────────────

    /// Records `next` as an undo step if it differs from the current forest.
    fn record(&mut self, next: Vec<Node>) -> bool {
        if next.as_slice() == self.forest() {
            return false;
        }
        self.working = None;
        self.history.push(next);
        self.schedule_save();
        true
    }

    /// Ends the working draft with `next`, recording it unless it matches
    /// the last snapshot.
    fn commit(&mut self, next: Vec<Node>) -> bool {
        if self.working.take().is_none() {
            return self.record(next);
        }
        if next.as_slice() != self.history.current() {
            self.history.push(next);
        }
        self.schedule_save();
        true
    }

    /// Keeps `next` as the uncommitted working draft. A draft that returns
    /// to the last snapshot is dropped.
    fn stage(&mut self, next: Vec<Node>) -> bool {
        if next.as_slice() == self.forest() {
            return false;
        }
        self.working = (next.as_slice() != self.history.current()).then_some(next);
        self.schedule_save();
        true
    }

    fn schedule_save(&mut self) {
        let text = self.text();
        let now = self.clock.now_millis();
        self.autosave.schedule(&self.document_id, text, now);
    }

    /// A document always keeps one editable node.
    fn ensure_insertion_point(&mut self, mut forest: Vec<Node>) -> Vec<Node> {
        if forest.is_empty() {
            let now = self.clock.now_millis();
            forest.push(Node::empty(self.ids.next_id(), 0, None, now));
        }
        forest
    }
}

/// Whether `a` and `b` hold the same outline, ignoring collapse state, note
/// visibility and `updated_at`.
fn same_outline(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.id == y.id
                && x.content == y.content
                && x.note == y.note
                && x.level == y.level
                && x.parent_id == y.parent_id
                && same_outline(&x.children, &y.children)
        })
}

impl std::fmt::Debug for DocumentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSession")
            .field("document_id", &self.document_id)
            .field("history_len", &self.history.len())
            .field("uncommitted", &self.working.is_some())
            .field("zoomed_id", &self.zoom.zoomed_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collect_ids, count_nodes, serialize, validate_forest, FixedClock, MemoryStore,
        SequentialIds, WikiError,
    };

    const DOC: &str = "• a\n  - b\n    - c\n  - d\n• e";

    fn session_with(text: &str) -> (DocumentSession, FixedClock) {
        let clock = FixedClock::at(1_000);
        let session = DocumentSession::with_collaborators(
            "doc",
            text,
            OutlineConfig::default(),
            Box::new(SequentialIds::new("n")),
            Box::new(clock.clone()),
        );
        (session, clock)
    }

    fn setup() -> (DocumentSession, FixedClock) {
        let (mut session, clock) = session_with(DOC);
        session.update_node("line-0", &NodeUpdate::collapsed(false), true);
        session.update_node("line-1", &NodeUpdate::collapsed(false), true);
        (session, clock)
    }

    fn contents(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.content.as_str()).collect()
    }

    #[test]
    fn test_open_parses_collapsed() {
        let (session, _) = session_with(DOC);
        assert!(session.forest()[0].is_collapsed);
        assert_eq!(session.forest()[0].created_at, 1_000);
        assert!(!session.can_undo());
        assert!(session.pending_save().is_none());
    }

    #[test]
    fn test_open_from_store() {
        let mut store = MemoryStore::new();
        store.insert("doc", "• hello");
        let session = DocumentSession::open(&store, "doc", OutlineConfig::default()).unwrap();
        assert_eq!(session.forest()[0].content, "hello");
        assert!(matches!(
            DocumentSession::open(&store, "ghost", OutlineConfig::default()),
            Err(WikiError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_add_node_records_history_and_returns_id() {
        let (mut session, _) = setup();
        let before = session.history().len();
        let id = session.add_node(Some("line-1"), None).unwrap();
        assert_eq!(session.history().len(), before + 1);
        let b = find_node(session.forest(), "line-1").unwrap();
        assert_eq!(b.children.last().unwrap().id, id);
        assert!(session.add_node(Some("ghost"), None).is_none());
        assert_eq!(session.history().len(), before + 1);
    }

    #[test]
    fn test_delete_with_children_reports_subtree() {
        let (mut session, _) = setup();
        let result = session.delete_node("line-1", DeleteStrategy::DeleteAll);
        assert_eq!(result.deleted_count, 2);
        assert_eq!(result.affected_ids, vec!["line-1", "line-2"]);
        assert_eq!(count_nodes(session.forest()), 3);
    }

    #[test]
    fn test_delete_promote_reports_promoted_children() {
        let (mut session, _) = setup();
        let result = session.delete_node("line-1", DeleteStrategy::PromoteChildren);
        assert_eq!(result.deleted_count, 1);
        assert_eq!(result.affected_ids, vec!["line-1", "line-2"]);
        assert_eq!(contents(&session.forest()[0].children), ["c", "d"]);
    }

    #[test]
    fn test_delete_stale_id_is_noop() {
        let (mut session, _) = setup();
        let before = session.history().len();
        assert_eq!(session.delete_node("ghost", DeleteStrategy::DeleteAll), DeleteResult::default());
        assert_eq!(session.history().len(), before);
    }

    #[test]
    fn test_deleting_last_node_leaves_empty_root() {
        let (mut session, _) = session_with("• only");
        session.delete_node("line-0", DeleteStrategy::DeleteAll);
        let forest = session.forest();
        assert_eq!(forest.len(), 1);
        assert!(forest[0].content.is_empty());
        assert_eq!(forest[0].id, "n-1");
    }

    #[test]
    fn test_rejected_move_does_not_record() {
        let (mut session, _) = setup();
        let before = session.history().len();
        assert!(!session.move_node("line-0", "line-2", DropPosition::Inside));
        assert_eq!(session.history().len(), before);
        assert!(session.move_node("line-4", "line-0", DropPosition::Before));
        assert_eq!(contents(session.forest()), ["e", "a"]);
    }

    #[test]
    fn test_typing_is_drafted_until_commit() {
        let (mut session, clock) = setup();
        let before = session.history().len();

        clock.advance(10);
        assert!(session.update_node("line-4", &NodeUpdate::content("e1"), false));
        assert!(session.update_node("line-4", &NodeUpdate::content("e12"), false));
        assert_eq!(session.history().len(), before, "keystrokes do not spam history");
        assert!(session.has_uncommitted_changes());
        assert_eq!(find_node(session.forest(), "line-4").unwrap().content, "e12");

        assert!(session.update_node("line-4", &NodeUpdate::content("e123"), true));
        assert_eq!(session.history().len(), before + 1);
        assert!(!session.has_uncommitted_changes());

        session.undo();
        assert_eq!(find_node(session.forest(), "line-4").unwrap().content, "e");
    }

    #[test]
    fn test_toggles_stay_out_of_history() {
        let (mut session, _) = setup();
        let before = session.history().len();
        assert!(session.toggle_collapse("line-1"));
        assert!(find_node(session.forest(), "line-1").unwrap().is_collapsed);
        assert!(session.toggle_note("line-2"));
        assert!(find_node(session.forest(), "line-2").unwrap().is_note_visible);
        assert_eq!(session.history().len(), before);
        assert!(!session.toggle_collapse("ghost"));
    }

    #[test]
    fn test_undo_steps_over_draft_and_redo_restores_it() {
        let (mut session, _) = setup();
        session.update_node("line-4", &NodeUpdate::content("half typed"), false);
        let drafted = session.forest().to_vec();
        assert!(session.can_undo());

        assert!(session.undo());
        assert_eq!(find_node(session.forest(), "line-4").unwrap().content, "e");
        assert!(session.redo());
        assert_eq!(session.forest(), drafted.as_slice());
    }

    #[test]
    fn test_commit_matching_draft_records_step() {
        let (mut session, _) = session_with(DOC);
        assert!(session.update_node("line-1", &NodeUpdate::content("typed"), false));
        assert!(session.update_node("line-1", &NodeUpdate::content("typed"), true));
        assert_eq!(session.history().len(), 2);
        assert!(!session.has_uncommitted_changes());

        session.add_node(None, None);
        assert!(session.undo());
        assert_eq!(find_node(session.forest(), "line-1").unwrap().content, "typed");
        assert!(session.undo());
        assert_eq!(find_node(session.forest(), "line-1").unwrap().content, "b");
    }

    #[test]
    fn test_toggle_back_drops_draft() {
        let (mut session, _) = session_with(DOC);
        session.add_node(None, None);
        session.undo();

        assert!(session.toggle_collapse("line-0"));
        assert!(session.toggle_collapse("line-0"));
        assert!(!session.has_uncommitted_changes());
        assert!(!session.undo());
        assert!(session.redo());
        assert_eq!(session.forest().len(), 3);
    }

    #[test]
    fn test_toggle_draft_keeps_redo_branch() {
        let (mut session, _) = setup();
        session.add_node(None, None);
        session.undo();
        session.toggle_note("line-4");

        assert!(session.undo());
        assert!(!session.has_uncommitted_changes());
        assert!(session.redo());
        assert!(session.redo());
        assert_eq!(session.forest().len(), 3);
    }

    #[test]
    fn test_toggle_only_draft_is_not_undoable() {
        let (mut session, _) = session_with(DOC);
        session.toggle_collapse("line-0");
        assert!(!session.can_undo());
        assert!(!session.undo());
        assert!(!find_node(session.forest(), "line-0").unwrap().is_collapsed);
    }

    #[test]
    fn test_undo_redo_inverse() {
        let (mut session, _) = setup();
        session.add_node(None, None);
        session.move_node("line-4", "line-0", DropPosition::Inside);
        let before = session.forest().to_vec();
        assert!(session.undo());
        assert!(session.redo());
        assert_eq!(session.forest(), before.as_slice());
        assert!(!session.redo());
    }

    #[test]
    fn test_push_after_undo_disables_redo() {
        let (mut session, _) = setup();
        session.add_node(None, None);
        session.undo();
        assert!(session.can_redo());
        session.add_node(None, Some(0));
        assert!(!session.can_redo());
    }

    #[test]
    fn test_cut_then_paste_moves_subtree_once() {
        let (mut session, _) = setup();
        assert!(session.cut("line-1"));
        assert!(find_node(session.forest(), "line-1").is_none());

        let pasted = session.paste(Some("line-4"), AddPosition::AsChild).unwrap();
        let e = find_node(session.forest(), "line-4").unwrap();
        assert_eq!(e.children[0].id, pasted);
        assert_eq!(e.children[0].content, "b");
        assert_eq!(e.children[0].level, 1);
        assert_eq!(e.children[0].children[0].level, 2);
        assert!(validate_forest(session.forest()).is_ok());

        assert!(session.paste(Some("line-4"), AddPosition::AsChild).is_none());
    }

    #[test]
    fn test_copy_paste_repeatable_with_unique_ids() {
        let (mut session, _) = setup();
        assert!(session.copy("line-1"));
        let first = session.paste(Some("line-0"), AddPosition::AsSibling).unwrap();
        let second = session.paste(None, AddPosition::AsSibling).unwrap();
        assert_ne!(first, second);

        let roots = session.forest();
        assert_eq!(roots[1].id, first);
        assert_eq!(roots.last().unwrap().id, second);
        assert_eq!(roots[1].level, 0);
        assert!(validate_forest(roots).is_ok());
        assert_eq!(collect_ids(roots).len(), count_nodes(roots));
    }

    #[test]
    fn test_paste_to_missing_target_keeps_cut_entry() {
        let (mut session, _) = setup();
        session.cut("line-4");
        assert!(session.paste(Some("ghost"), AddPosition::AsSibling).is_none());
        assert!(session.clipboard().can_paste());
    }

    #[test]
    fn test_zoom_narrows_display_only() {
        let (mut session, _) = setup();
        assert!(session.zoom_toggle(Some("line-1")));
        assert_eq!(session.display_forest().len(), 1);
        assert_eq!(session.display_forest()[0].content, "b");
        assert_eq!(session.forest().len(), 2);
        assert!(session.zoom_toggle(Some("line-1")));
        assert_eq!(session.display_forest().len(), 2);
    }

    #[test]
    fn test_zoom_reports_visible_change_only() {
        let (mut session, _) = setup();
        assert!(!session.zoom_toggle(None));
        assert!(!session.apply(Edit::Zoom { node_id: Some("ghost".into()) }).changed);
        assert!(session.zoomed_id().is_none());

        assert!(session.apply(Edit::Zoom { node_id: Some("line-4".into()) }).changed);
        session.delete_node("line-4", DeleteStrategy::DeleteAll);
        assert_eq!(session.display_forest().len(), 1);
        assert!(!session.zoom_toggle(None), "zoom on a deleted node was already showing everything");
    }

    #[test]
    fn test_autosave_debounces_and_supersedes() {
        let (mut session, clock) = setup();
        let mut store = MemoryStore::new();
        session.flush(&mut store).unwrap();
        let baseline = store.save_count();

        clock.set(10_000);
        session.update_node("line-4", &NodeUpdate::content("draft"), false);
        clock.advance(1_000);
        session.update_node("line-4", &NodeUpdate::content("final"), true);
        clock.advance(1_500);
        assert!(!session.tick(&mut store).unwrap(), "newer edit pushed the deadline");

        clock.advance(500);
        assert!(session.tick(&mut store).unwrap());
        assert_eq!(store.save_count(), baseline + 1);
        assert!(store.get("doc").unwrap().ends_with("• final"));
        assert!(!session.tick(&mut store).unwrap());
    }

    #[test]
    fn test_saved_text_drops_collapsed_children_by_default() {
        let (mut session, _) = setup();
        session.toggle_collapse("line-0");
        assert_eq!(session.text(), "• a\n• e");

        let config = OutlineConfig { persist_collapsed_children: true, ..OutlineConfig::default() };
        let session = DocumentSession::new("doc", DOC, config);
        assert_eq!(session.text(), DOC);
    }

    #[test]
    fn test_switch_document_resets_history_and_keeps_clipboard() {
        let (mut session, _) = setup();
        let mut store = MemoryStore::new();
        store.insert("doc", DOC);
        store.insert("other", "• other root");

        session.copy("line-4");
        session.add_node(None, None);
        session.zoom_toggle(Some("line-0"));
        session.switch_document(&mut store, "other").unwrap();

        assert_eq!(session.document_id(), "other");
        assert_eq!(contents(session.forest()), ["other root"]);
        assert!(!session.can_undo());
        assert!(session.zoomed_id().is_none());
        assert!(session.clipboard().can_paste());
        assert_eq!(store.get("doc").unwrap().lines().count(), 6, "pending edit was flushed");

        assert!(session.switch_document(&mut store, "ghost").is_err());
        assert_eq!(session.document_id(), "other");
    }

    #[test]
    fn test_apply_dispatches_edits() {
        let (mut session, _) = setup();
        let outcome = session.apply(Edit::AddNode { parent_id: Some("line-0".into()), index: Some(0) });
        let id = outcome.created_id.clone().unwrap();
        assert!(outcome.changed);

        let outcome = session.apply(Edit::UpdateNode {
            node_id: id.clone(),
            update: NodeUpdate::content("new first child"),
            commit: true,
        });
        assert!(outcome.changed);
        assert_eq!(session.forest()[0].children[0].content, "new first child");

        assert!(session.apply(Edit::Undo).changed);
        assert_eq!(session.forest()[0].children[0].content, "");
        assert!(session.apply(Edit::Redo).changed);
        assert!(!session.apply(Edit::DeleteNode { node_id: "ghost".into(), strategy: DeleteStrategy::DeleteAll }).changed);
        assert!(session.apply(Edit::Zoom { node_id: Some(id) }).changed);
        assert_eq!(session.display_forest()[0].content, "new first child");
    }

    #[test]
    fn test_text_reflects_current_forest() {
        let (session, _) = setup();
        assert_eq!(session.text(), serialize(session.forest()));
    }
}
