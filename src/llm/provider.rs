// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::fmt;

use crate::model::{classify_model, LlmSettings, Provider};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const FREE_TIER_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Environment variable holding the provisioned free-tier key.
pub const FREE_TIER_KEY_ENV: &str = "PROTEUS_GROQ_API_KEY";
/// Upstream model id sent when the compatible entry has no model name set.
pub const COMPATIBLE_DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// A fully resolved endpoint: where to send the request and as whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    base_url: String,
    api_key: String,
    model: String,
}

impl ProviderConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Rejections raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Incomplete { model: String },
    MissingOpenAiKey,
    MissingCompatibleBaseUrl,
    MissingCompatibleApiKey,
    MissingFreeTierKey,
    UnsupportedModel { model: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { model } => {
                write!(f, "please configure {model} in settings before generating")
            }
            Self::MissingOpenAiKey => f.write_str("OpenAI API key is required"),
            Self::MissingCompatibleBaseUrl => {
                f.write_str("base URL is required for OpenAI-compatible APIs")
            }
            Self::MissingCompatibleApiKey => {
                f.write_str("API key is required for OpenAI-compatible APIs")
            }
            Self::MissingFreeTierKey => write!(
                f,
                "free-tier API key not found in the environment ({FREE_TIER_KEY_ENV})"
            ),
            Self::UnsupportedModel { model } => write!(f, "unsupported model selected: {model}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolves the active settings into a concrete endpoint configuration, or a
/// [`ConfigError`] without touching the network.
pub fn resolve(settings: &LlmSettings) -> Result<ProviderConfig, ConfigError> {
    resolve_with_free_tier_key(settings, env::var(FREE_TIER_KEY_ENV).ok())
}

pub(crate) fn resolve_with_free_tier_key(
    settings: &LlmSettings,
    free_tier_key: Option<String>,
) -> Result<ProviderConfig, ConfigError> {
    let model_id = settings.selected_model();

    match classify_model(model_id) {
        Provider::OpenAi => {
            let api_key = non_blank(settings.api_key()).ok_or(ConfigError::MissingOpenAiKey)?;
            Ok(ProviderConfig {
                base_url: OPENAI_BASE_URL.to_owned(),
                api_key,
                model: model_id.to_owned(),
            })
        }
        Provider::Compatible => {
            let base_url =
                non_blank(settings.base_url()).ok_or(ConfigError::MissingCompatibleBaseUrl)?;
            let api_key =
                non_blank(settings.api_key()).ok_or(ConfigError::MissingCompatibleApiKey)?;
            let model = non_blank(settings.model_name())
                .unwrap_or_else(|| COMPATIBLE_DEFAULT_MODEL.to_owned());
            Ok(ProviderConfig {
                base_url,
                api_key,
                model,
            })
        }
        Provider::FreeTier => {
            let api_key = free_tier_key
                .filter(|key| !key.trim().is_empty())
                .ok_or(ConfigError::MissingFreeTierKey)?;
            Ok(ProviderConfig {
                base_url: FREE_TIER_BASE_URL.to_owned(),
                api_key,
                model: model_id.to_owned(),
            })
        }
        Provider::Unsupported => Err(ConfigError::UnsupportedModel {
            model: model_id.to_owned(),
        }),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|value| !value.is_empty()).map(ToOwned::to_owned)
}
