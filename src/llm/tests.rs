// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::generator::{GenerateError, Generator};
use super::provider::{resolve_with_free_tier_key, ConfigError, COMPATIBLE_DEFAULT_MODEL};
use crate::model::LlmSettings;

fn settings(
    model: &str,
    api_key: Option<&str>,
    base_url: Option<&str>,
    model_name: Option<&str>,
) -> LlmSettings {
    LlmSettings::new(
        model,
        api_key.map(ToOwned::to_owned),
        base_url.map(ToOwned::to_owned),
        model_name.map(ToOwned::to_owned),
    )
}

#[test]
fn openai_path_requires_an_api_key_and_uses_the_stock_endpoint() {
    let err = resolve_with_free_tier_key(&settings("gpt-4", None, None, None), None)
        .expect_err("missing key");
    assert_eq!(err, ConfigError::MissingOpenAiKey);

    let config =
        resolve_with_free_tier_key(&settings("gpt-4", Some("sk-test"), None, None), None)
            .expect("resolve");
    assert_eq!(config.base_url(), "https://api.openai.com/v1");
    assert_eq!(config.api_key(), "sk-test");
    assert_eq!(config.model(), "gpt-4");
}

#[test]
fn compatible_path_requires_base_url_and_key_and_substitutes_the_model_name() {
    let err = resolve_with_free_tier_key(
        &settings("openai-compatible", Some("sk-test"), None, None),
        None,
    )
    .expect_err("missing base url");
    assert_eq!(err, ConfigError::MissingCompatibleBaseUrl);

    let err = resolve_with_free_tier_key(
        &settings("openai-compatible", None, Some("https://llm.internal/v1"), None),
        None,
    )
    .expect_err("missing key");
    assert_eq!(err, ConfigError::MissingCompatibleApiKey);

    let config = resolve_with_free_tier_key(
        &settings(
            "openai-compatible",
            Some("sk-test"),
            Some("https://llm.internal/v1"),
            Some("local-llama"),
        ),
        None,
    )
    .expect("resolve");
    assert_eq!(config.base_url(), "https://llm.internal/v1");
    assert_eq!(config.model(), "local-llama");

    let config = resolve_with_free_tier_key(
        &settings("openai-compatible", Some("sk-test"), Some("https://llm.internal/v1"), None),
        None,
    )
    .expect("resolve");
    assert_eq!(config.model(), COMPATIBLE_DEFAULT_MODEL);
}

#[test]
fn free_tier_path_uses_the_provisioned_key_and_fails_fatally_without_it() {
    let err = resolve_with_free_tier_key(
        &settings("llama-3.1-70b-versatile", None, None, None),
        None,
    )
    .expect_err("missing provisioned key");
    assert_eq!(err, ConfigError::MissingFreeTierKey);

    let config = resolve_with_free_tier_key(
        &settings("llama-3.1-70b-versatile", None, None, None),
        Some("gsk-test".to_owned()),
    )
    .expect("resolve");
    assert_eq!(config.base_url(), "https://api.groq.com/openai/v1");
    assert_eq!(config.api_key(), "gsk-test");
    assert_eq!(config.model(), "llama-3.1-70b-versatile");
}

#[test]
fn unknown_models_are_rejected_as_unsupported() {
    let err = resolve_with_free_tier_key(&settings("gemini-pro", Some("key"), None, None), None)
        .expect_err("unsupported");
    assert_eq!(
        err,
        ConfigError::UnsupportedModel {
            model: "gemini-pro".to_owned()
        }
    );
}

#[tokio::test]
async fn generate_rejects_blank_prompts_before_anything_else() {
    let generator = Generator::new().expect("client");
    let err = generator
        .generate("   \n", &LlmSettings::default())
        .await
        .expect_err("blank prompt");
    assert!(matches!(err, GenerateError::EmptyPrompt));
}

#[tokio::test]
async fn generate_rejects_unconfigured_settings_without_a_network_call() {
    let generator = Generator::new().expect("client");

    // openai-compatible with api key but no base url is not configured.
    let unconfigured = settings("openai-compatible", Some("sk-test"), None, None);
    let err = generator
        .generate("a login flow", &unconfigured)
        .await
        .expect_err("not configured");
    assert!(matches!(
        err,
        GenerateError::Config(ConfigError::Incomplete { .. })
    ));

    // gpt-4 without a key fails the same way.
    let unconfigured = settings("gpt-4", None, None, None);
    let err = generator
        .generate("a login flow", &unconfigured)
        .await
        .expect_err("not configured");
    assert!(matches!(err, GenerateError::Config(_)));
}
