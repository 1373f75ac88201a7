// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::provider::ProviderConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// Fixed decoding parameters, biased toward syntactically consistent output.
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;
const TOP_P: f32 = 0.8;
const FREQUENCY_PENALTY: f32 = 0.0;
const PRESENCE_PENALTY: f32 = 0.0;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Network/auth/upstream failures, surfaced verbatim to the user. No retry.
#[derive(Debug)]
pub enum UpstreamError {
    Timeout,
    Request(reqwest::Error),
    Status { status: u16, message: String },
    EmptyCompletion,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request to the model provider timed out"),
            Self::Request(source) => write!(f, "request to the model provider failed: {source}"),
            Self::Status { status, message } => {
                write!(f, "model provider returned HTTP {status}: {message}")
            }
            Self::EmptyCompletion => f.write_str("no content generated"),
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(source) => Some(source),
            _ => None,
        }
    }
}

/// One chat-completions call per generation; bearer auth, 60 s timeout.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// Sends one request and returns the first choice's message content.
    pub async fn complete(
        &self,
        config: &ProviderConfig,
        system: &str,
        user: &str,
    ) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", config.base_url().trim_end_matches('/'));
        let request = ChatRequest {
            model: config.model(),
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        let completion: ChatResponse =
            response.json().await.map_err(classify_request_error)?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(UpstreamError::EmptyCompletion)
    }
}

fn classify_request_error(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else {
        UpstreamError::Request(err)
    }
}

/// Prefers the provider's own error message when the body carries one.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "no further detail".to_owned()
            } else {
                trimmed.to_owned()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::provider_message;

    #[test]
    fn provider_message_prefers_the_structured_error() {
        let body = "{\"error\":{\"message\":\"invalid api key\"}}";
        assert_eq!(provider_message(body), "invalid api key");
    }

    #[test]
    fn provider_message_falls_back_to_the_raw_body() {
        assert_eq!(provider_message("  upstream exploded  "), "upstream exploded");
        assert_eq!(provider_message(""), "no further detail");
    }
}
