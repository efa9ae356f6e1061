//! Tunables for a document session.

use crate::core::autosave::DEFAULT_AUTOSAVE_DELAY_MS;
use crate::core::history::DEFAULT_HISTORY_LIMIT;
use crate::SerializeOptions;
use serde::{Deserialize, Serialize};

/// Per-session settings. Missing keys fall back to their defaults so older
/// settings files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlineConfig {
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Inactivity delay before the document body is saved.
    pub autosave_delay_ms: u64,
    /// Keep children of collapsed nodes when saving the document body.
    /// Off by default: collapsed subtrees are left out of the saved text.
    pub persist_collapsed_children: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            persist_collapsed_children: false,
        }
    }
}

impl OutlineConfig {
    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions { include_collapsed: self.persist_collapsed_children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutlineConfig::default();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.autosave_delay_ms, 2_000);
        assert!(!config.serialize_options().include_collapsed);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: OutlineConfig = serde_json::from_str(r#"{"historyLimit": 5}"#).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.autosave_delay_ms, 2_000);
    }
}
