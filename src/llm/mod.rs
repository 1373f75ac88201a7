// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Prompt-to-diagram generation against OpenAI-compatible chat endpoints.

mod client;
mod extract;
mod generator;
mod prompt;
mod provider;

pub use client::{ChatClient, UpstreamError};
pub use extract::extract_diagram_source;
pub use generator::{GenerateError, Generator};
pub use prompt::{user_message, SYSTEM_PROMPT};
pub use provider::{
    resolve, ConfigError, ProviderConfig, COMPATIBLE_DEFAULT_MODEL, FREE_TIER_BASE_URL,
    FREE_TIER_KEY_ENV, OPENAI_BASE_URL,
};

#[cfg(test)]
mod tests;
