//! SQLite-backed [`DocumentStore`].

use crate::{DocumentStore, Result, WikiError};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Listing entry for a stored document; the body is not loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub created_at: i64,
    pub modified_at: i64,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Validate database structure
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type='table'
             AND name IN ('documents', 'workspace_meta')",
            [],
            |row| row.get(0),
        )?;

        if table_count != 2 {
            return Err(WikiError::InvalidDocument(
                "Not a valid Wikinotes database".to_string(),
            ));
        }

        Ok(Self { conn })
    }

    /// Opens `path` if it holds a Wikinotes database, creating it otherwise.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Inserts a new document and returns its generated id.
    pub fn create_document(&mut self, title: &str, body: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();
        self.conn.execute(
            "INSERT INTO documents (id, title, body, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            rusqlite::params![id, title, body, now],
        )?;
        log::info!("created document {id} ({title})");
        Ok(id)
    }

    /// All documents ordered by title.
    pub fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at, modified_at FROM documents ORDER BY title, id",
        )?;
        let documents = stmt
            .query_map([], |row| {
                Ok(DocumentSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                    modified_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(documents)
    }

    /// Removes a document.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::DocumentNotFound`] if nothing was deleted.
    pub fn delete_document(&mut self, document_id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", [document_id])?;
        if deleted == 0 {
            return Err(WikiError::DocumentNotFound(document_id.to_string()));
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DocumentStore for Storage {
    fn load_document_text(&self, document_id: &str) -> Result<String> {
        self.conn
            .query_row(
                "SELECT body FROM documents WHERE id = ?1",
                [document_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| WikiError::DocumentNotFound(document_id.to_string()))
    }

    fn save_document_text(&mut self, document_id: &str, text: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let updated = self.conn.execute(
            "UPDATE documents SET body = ?1, modified_at = ?2 WHERE id = ?3",
            rusqlite::params![text, now, document_id],
        )?;
        if updated == 0 {
            return Err(WikiError::DocumentNotFound(document_id.to_string()));
        }
        log::debug!("saved document {document_id} ({} bytes)", text.len());
        Ok(())
    }
}
