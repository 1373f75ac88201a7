// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{mint_saved_code_id, SavedCodeId};

/// One named diagram snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCode {
    id: SavedCodeId,
    name: String,
    code: String,
}

impl SavedCode {
    pub fn new(id: SavedCodeId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn id(&self) -> &SavedCodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

/// The ordered collection behind the saved-diagrams panel.
///
/// Records are addressed by position; ids stay stable across reorders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedCodeList {
    codes: Vec<SavedCode>,
}

impl SavedCodeList {
    pub fn new(codes: Vec<SavedCode>) -> Self {
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SavedCode> {
        self.codes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedCode> {
        self.codes.iter()
    }

    /// Appends a new record with a freshly minted id. Returns `None` without
    /// mutating when `name` trims to empty.
    pub fn save(&mut self, name: &str, code: impl Into<String>) -> Option<&SavedCode> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        self.codes.push(SavedCode::new(mint_saved_code_id(), name, code));
        self.codes.last()
    }

    /// Removes the record at `index`; safe no-op (returns `None`) out of range.
    pub fn delete_at(&mut self, index: usize) -> Option<SavedCode> {
        if index >= self.codes.len() {
            return None;
        }
        Some(self.codes.remove(index))
    }

    /// Moves the record at `old_index` to `new_index`, preserving the relative
    /// order of everything else. Returns false (no-op) when either index is
    /// out of range or they are equal.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        let len = self.codes.len();
        if old_index >= len || new_index >= len || old_index == new_index {
            return false;
        }

        let moved = self.codes.remove(old_index);
        self.codes.insert(new_index, moved);
        true
    }
}
