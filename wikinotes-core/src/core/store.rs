//! The persistence collaborator a session loads from and saves to.

use crate::{Result, WikiError};
use std::collections::HashMap;

/// Loads and saves the serialized body of a document by id.
pub trait DocumentStore {
    /// # Errors
    ///
    /// Returns [`WikiError::DocumentNotFound`] if no document has `document_id`,
    /// or a backend-specific error.
    fn load_document_text(&self, document_id: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns a backend-specific error if the write fails.
    fn save_document_text(&mut self, document_id: &str, text: &str) -> Result<()>;
}

/// A `HashMap`-backed store. Saving to an unknown id creates it.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document_id: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(document_id.into(), text.into());
    }

    pub fn get(&self, document_id: &str) -> Option<&str> {
        self.documents.get(document_id).map(String::as_str)
    }

    /// Number of successful `save_document_text` calls.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl DocumentStore for MemoryStore {
    fn load_document_text(&self, document_id: &str) -> Result<String> {
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| WikiError::DocumentNotFound(document_id.to_string()))
    }

    fn save_document_text(&mut self, document_id: &str, text: &str) -> Result<()> {
        self.documents.insert(document_id.to_string(), text.to_string());
        self.save_count += 1;
        Ok(())
    }
}
