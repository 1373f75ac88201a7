// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::model::{SavedCode, SavedCodeId, SavedCodeList};

use super::{StoragePort, WriteBehind};

/// Record name for the serialized saved-diagrams list.
pub const SAVED_RECORD: &str = "proteus-saved.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSavedCode {
    id: String,
    name: String,
    code: String,
}

impl From<&SavedCode> for PersistedSavedCode {
    fn from(code: &SavedCode) -> Self {
        Self {
            id: code.id().as_str().to_owned(),
            name: code.name().to_owned(),
            code: code.code().to_owned(),
        }
    }
}

/// Owns the ordered [`SavedCodeList`] and mirrors every mutation into the
/// storage port through the shared write-behind worker.
pub struct SavedCodeStore {
    codes: SavedCodeList,
    writer: WriteBehind,
}

impl SavedCodeStore {
    /// Loads the list from `port`; absent or malformed content yields an
    /// empty list. Entries with unusable ids are skipped.
    pub fn load(port: &dyn StoragePort, writer: WriteBehind) -> Self {
        let codes = port
            .get(SAVED_RECORD)
            .and_then(|raw| serde_json::from_str::<Vec<PersistedSavedCode>>(&raw).ok())
            .map(|persisted| {
                let codes = persisted
                    .into_iter()
                    .filter_map(|entry| {
                        let id = SavedCodeId::new(entry.id).ok()?;
                        Some(SavedCode::new(id, entry.name, entry.code))
                    })
                    .collect();
                SavedCodeList::new(codes)
            })
            .unwrap_or_default();

        Self { codes, writer }
    }

    pub fn codes(&self) -> &SavedCodeList {
        &self.codes
    }

    /// Appends and persists; returns false (no mutation, no write) when the
    /// name trims to empty.
    pub fn save(&mut self, name: &str, code: impl Into<String>) -> bool {
        if self.codes.save(name, code).is_none() {
            return false;
        }
        self.persist();
        true
    }

    pub fn delete_at(&mut self, index: usize) -> Option<SavedCode> {
        let removed = self.codes.delete_at(index)?;
        self.persist();
        Some(removed)
    }

    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        if !self.codes.reorder(old_index, new_index) {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&self) {
        let persisted: Vec<PersistedSavedCode> =
            self.codes.iter().map(PersistedSavedCode::from).collect();
        if let Ok(raw) = serde_json::to_string(&persisted) {
            self.writer.enqueue(SAVED_RECORD, raw);
        }
    }
}
