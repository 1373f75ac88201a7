// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Diagram source shown when no generation or load has happened yet.
pub const DEFAULT_DIAGRAM: &str = "graph TD\n    A[Start] --> B{Is it working?}\n    B -->|Yes| C[Great!]\n    B -->|No| D[Debug]\n    D --> B";

/// The single current diagram source plus the most recent render error.
///
/// In-memory only; both fields are replaced wholesale on every edit or
/// generation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDraft {
    code: String,
    error: Option<String>,
}

impl Default for DiagramDraft {
    fn default() -> Self {
        Self {
            code: DEFAULT_DIAGRAM.to_owned(),
            error: None,
        }
    }
}

impl DiagramDraft {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}
