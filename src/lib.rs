// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus — terminal-first Mermaid studio.
//!
//! Prompts become Mermaid source via an OpenAI-compatible chat endpoint, the
//! source renders live into a pannable/zoomable preview, and named snippets
//! persist to a state folder.

pub mod engine;
pub mod llm;
pub mod model;
pub mod preview;
pub mod store;
pub mod tui;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
