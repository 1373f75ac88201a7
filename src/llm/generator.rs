// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::LlmSettings;

use super::client::{ChatClient, UpstreamError};
use super::extract::extract_diagram_source;
use super::prompt::{user_message, SYSTEM_PROMPT};
use super::provider::{resolve, ConfigError};

/// Everything a generation attempt can fail with. Validation and
/// configuration rejections happen before any network activity.
#[derive(Debug)]
pub enum GenerateError {
    EmptyPrompt,
    Config(ConfigError),
    Upstream(UpstreamError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPrompt => f.write_str("describe the diagram you want before generating"),
            Self::Config(source) => source.fmt(f),
            Self::Upstream(source) => source.fmt(f),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyPrompt => None,
            Self::Config(source) => Some(source),
            Self::Upstream(source) => Some(source),
        }
    }
}

impl From<ConfigError> for GenerateError {
    fn from(source: ConfigError) -> Self {
        Self::Config(source)
    }
}

impl From<UpstreamError> for GenerateError {
    fn from(source: UpstreamError) -> Self {
        Self::Upstream(source)
    }
}

/// Turns a free-text prompt into diagram source via the configured endpoint.
#[derive(Debug, Clone)]
pub struct Generator {
    client: ChatClient,
}

impl Generator {
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: ChatClient::new()?,
        })
    }

    /// Validates, resolves the provider, sends one request, and extracts
    /// diagram source from the completion.
    pub async fn generate(
        &self,
        prompt: &str,
        settings: &LlmSettings,
    ) -> Result<String, GenerateError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        if !settings.is_configured() {
            return Err(GenerateError::Config(ConfigError::Incomplete {
                model: settings.selected_model().to_owned(),
            }));
        }

        let config = resolve(settings)?;
        let completion =
            self.client.complete(&config, SYSTEM_PROMPT, &user_message(prompt)).await?;
        Ok(extract_diagram_source(&completion))
    }
}
