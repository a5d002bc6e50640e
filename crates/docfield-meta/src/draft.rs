//! Draft persistence seam.
//!
//! Unsaved settings live in a host-provided key/value store (browser local
//! storage, a file, a test map). Keys are `field_{form_id}_{TYPE}`.

use ahash::AHashMap;
use docfield_core::field::{FieldType, FormId};

use crate::error::{MetaError, Result};

/// Draft key for one field.
#[must_use]
pub fn draft_key(form_id: &FormId, field_type: FieldType) -> String {
    format!("field_{form_id}_{}", field_type.as_str())
}

/// Host key/value storage for metadata drafts.
pub trait DraftStore {
    /// Raw JSON stored under `key`, if any.
    fn load(&self, key: &str) -> Option<String>;

    /// Store raw JSON under `key`, replacing any previous draft.
    fn save(&mut self, key: &str, json: String) -> Result<()>;
}

/// In-memory draft store.
///
/// An optional entry limit makes writes of new keys fail once reached,
/// the way a full browser storage quota does.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    entries: AHashMap<String, String>,
    limit: Option<usize>,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: AHashMap::new(),
            limit: Some(limit),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, json: String) -> Result<()> {
        let full = self
            .limit
            .is_some_and(|limit| self.entries.len() >= limit && !self.entries.contains_key(key));
        if full {
            return Err(MetaError::DraftRejected {
                key: key.to_owned(),
                reason: "storage full".to_owned(),
            });
        }
        self.entries.insert(key.to_owned(), json);
        Ok(())
    }
}
