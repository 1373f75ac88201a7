// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Static LLM model catalog and provider classification.
//!
//! The catalog ships with the binary and is never mutated at runtime; settings
//! only ever reference entries by id.

use std::fmt;

/// Vendor tag shown in the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderTag {
    OpenAi,
    Gemini,
    Groq,
    OpenAiCompatible,
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("openai"),
            Self::Gemini => f.write_str("gemini"),
            Self::Groq => f.write_str("groq"),
            Self::OpenAiCompatible => f.write_str("openai-compatible"),
        }
    }
}

/// A read-only catalog entry describing one selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmModel {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: ProviderTag,
    pub requires_auth: bool,
    pub requires_base_url: bool,
    pub description: &'static str,
}

/// Model id prefix that routes to the stock OpenAI endpoint.
pub const OPENAI_MODEL_PREFIX: &str = "gpt-";
/// Sentinel id for user-supplied OpenAI-compatible endpoints.
pub const COMPATIBLE_MODEL_ID: &str = "openai-compatible";
/// Sentinel id for the no-auth free-tier backend.
pub const FREE_TIER_MODEL_ID: &str = "llama-3.1-70b-versatile";
/// Selected on first use and whenever persisted settings are unusable.
pub const DEFAULT_MODEL_ID: &str = FREE_TIER_MODEL_ID;

pub const MODEL_CATALOG: [LlmModel; 5] = [
    LlmModel {
        id: "gpt-4",
        name: "GPT-4",
        provider: ProviderTag::OpenAi,
        requires_auth: true,
        requires_base_url: false,
        description: "Most capable OpenAI model for complex tasks",
    },
    LlmModel {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        provider: ProviderTag::OpenAi,
        requires_auth: true,
        requires_base_url: false,
        description: "Fast and efficient OpenAI model",
    },
    LlmModel {
        id: "gemini-pro",
        name: "Gemini Pro",
        provider: ProviderTag::Gemini,
        requires_auth: true,
        requires_base_url: false,
        description: "Google's advanced language model",
    },
    LlmModel {
        id: COMPATIBLE_MODEL_ID,
        name: "OpenAI Compatible API",
        provider: ProviderTag::OpenAiCompatible,
        requires_auth: true,
        requires_base_url: true,
        description: "Use any OpenAI-compatible API endpoint",
    },
    LlmModel {
        id: FREE_TIER_MODEL_ID,
        name: "Llama 3.1 70B (Free Trial)",
        provider: ProviderTag::Groq,
        requires_auth: false,
        requires_base_url: false,
        description: "High-performance open source model",
    },
];

pub fn find_model(id: &str) -> Option<&'static LlmModel> {
    MODEL_CATALOG.iter().find(|model| model.id == id)
}

/// Closed classification of a selected model id into the provider path the
/// generator takes. One function decides; call sites match on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Compatible,
    FreeTier,
    Unsupported,
}

pub fn classify_model(model_id: &str) -> Provider {
    if model_id.starts_with(OPENAI_MODEL_PREFIX) {
        return Provider::OpenAi;
    }
    if model_id == COMPATIBLE_MODEL_ID {
        return Provider::Compatible;
    }
    if model_id == FREE_TIER_MODEL_ID {
        return Provider::FreeTier;
    }
    Provider::Unsupported
}
