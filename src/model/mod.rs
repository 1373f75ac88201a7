// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Domain model: model catalog, LLM settings, saved snippets, draft state.

mod catalog;
mod draft;
mod ids;
mod saved;
mod settings;

pub use catalog::{
    classify_model, find_model, LlmModel, Provider, ProviderTag, COMPATIBLE_MODEL_ID,
    DEFAULT_MODEL_ID, FREE_TIER_MODEL_ID, MODEL_CATALOG, OPENAI_MODEL_PREFIX,
};
pub use draft::{DiagramDraft, DEFAULT_DIAGRAM};
pub use ids::{mint_saved_code_id, Id, IdError, SavedCodeId, SavedCodeIdTag};
pub use saved::{SavedCode, SavedCodeList};
pub use settings::{LlmSettings, LlmSettingsPatch};
