// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::catalog::{find_model, DEFAULT_MODEL_ID};

/// The active LLM configuration.
///
/// `selected_model` always names a catalog entry once loaded through the
/// settings store; the optional fields are only meaningful for models whose
/// descriptor requires them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    selected_model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    model_name: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            selected_model: DEFAULT_MODEL_ID.to_owned(),
            api_key: None,
            base_url: None,
            model_name: None,
        }
    }
}

impl LlmSettings {
    pub fn new(
        selected_model: impl Into<String>,
        api_key: Option<String>,
        base_url: Option<String>,
        model_name: Option<String>,
    ) -> Self {
        Self {
            selected_model: selected_model.into(),
            api_key,
            base_url,
            model_name,
        }
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// Merges `patch` into `self`; `Some` fields replace, `None` fields keep.
    pub fn merge(&mut self, patch: LlmSettingsPatch) {
        if let Some(selected_model) = patch.selected_model {
            self.selected_model = selected_model;
        }
        if let Some(api_key) = patch.api_key {
            self.api_key = none_if_blank(api_key);
        }
        if let Some(base_url) = patch.base_url {
            self.base_url = none_if_blank(base_url);
        }
        if let Some(model_name) = patch.model_name {
            self.model_name = none_if_blank(model_name);
        }
    }

    /// True iff the selected catalog entry's auth/base-URL requirements are
    /// met. Unknown model ids are never configured.
    pub fn is_configured(&self) -> bool {
        let Some(model) = find_model(&self.selected_model) else {
            return false;
        };

        if model.requires_auth && self.api_key().map_or(true, |key| key.trim().is_empty()) {
            return false;
        }
        if model.requires_base_url && self.base_url().map_or(true, |url| url.trim().is_empty()) {
            return false;
        }

        true
    }
}

fn none_if_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Partial update applied by the settings dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LlmSettingsPatch {
    pub selected_model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{LlmSettings, LlmSettingsPatch};

    #[test]
    fn default_settings_select_the_free_tier_and_are_configured() {
        let settings = LlmSettings::default();
        assert_eq!(settings.selected_model(), "llama-3.1-70b-versatile");
        assert!(settings.is_configured());
    }

    #[test]
    fn openai_models_require_an_api_key() {
        let mut settings = LlmSettings::new("gpt-4", None, None, None);
        assert!(!settings.is_configured());

        settings.merge(LlmSettingsPatch {
            api_key: Some("sk-test".to_owned()),
            ..LlmSettingsPatch::default()
        });
        assert!(settings.is_configured());
    }

    #[test]
    fn compatible_model_requires_base_url_even_with_api_key() {
        let settings =
            LlmSettings::new("openai-compatible", Some("sk-test".to_owned()), None, None);
        assert!(!settings.is_configured());

        let settings = LlmSettings::new(
            "openai-compatible",
            Some("sk-test".to_owned()),
            Some("https://llm.internal/v1".to_owned()),
            None,
        );
        assert!(settings.is_configured());
    }

    #[test]
    fn blank_strings_do_not_satisfy_requirements() {
        let settings = LlmSettings::new("gpt-4", Some("   ".to_owned()), None, None);
        assert!(!settings.is_configured());
    }

    #[test]
    fn unknown_model_is_never_configured() {
        let settings = LlmSettings::new("mystery-9000", Some("sk-test".to_owned()), None, None);
        assert!(!settings.is_configured());
    }

    #[test]
    fn merge_keeps_unpatched_fields_and_drops_blanked_ones() {
        let mut settings = LlmSettings::new(
            "gpt-4",
            Some("sk-test".to_owned()),
            Some("https://a".to_owned()),
            None,
        );

        settings.merge(LlmSettingsPatch {
            base_url: Some(String::new()),
            model_name: Some("local-llama".to_owned()),
            ..LlmSettingsPatch::default()
        });

        assert_eq!(settings.selected_model(), "gpt-4");
        assert_eq!(settings.api_key(), Some("sk-test"));
        assert_eq!(settings.base_url(), None);
        assert_eq!(settings.model_name(), Some("local-llama"));
    }
}
