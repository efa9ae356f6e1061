//! Debounced, supersedable persistence of document text.
//!
//! The scheduler holds at most one pending save. Scheduling again replaces
//! the text and pushes the deadline out, so a stale body is never written
//! after a newer edit. Nothing here blocks: the host polls with
//! [`AutosaveScheduler::take_due`] from its event loop.

/// Inactivity delay before a pending save becomes due.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2_000;

/// A save waiting for its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub document_id: String,
    pub text: String,
    pub due_at: i64,
}

#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay_ms: u64,
    pending: Option<PendingSave>,
}

impl AutosaveScheduler {
    pub fn new(delay_ms: u64) -> Self {
        Self { delay_ms, pending: None }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Queues `text` for `document_id`, superseding any pending save.
    pub fn schedule(&mut self, document_id: &str, text: String, now: i64) {
        if let Some(previous) = &self.pending {
            if previous.document_id != document_id {
                log::warn!(
                    "autosave: dropping pending save of {} in favour of {document_id}",
                    previous.document_id
                );
            }
        }
        let delay = i64::try_from(self.delay_ms).unwrap_or(i64::MAX);
        self.pending = Some(PendingSave {
            document_id: document_id.to_string(),
            text,
            due_at: now.saturating_add(delay),
        });
    }

    /// Takes the pending save if its deadline has passed.
    pub fn take_due(&mut self, now: i64) -> Option<PendingSave> {
        if self.pending.as_ref()?.due_at <= now {
            self.pending.take()
        } else {
            None
        }
    }

    /// Takes the pending save regardless of its deadline.
    pub fn flush(&mut self) -> Option<PendingSave> {
        self.pending.take()
    }

    /// Drops the pending save without writing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingSave> {
        self.pending.as_ref()
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY_MS)
    }
}
