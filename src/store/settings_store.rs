// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use crate::model::{find_model, LlmSettings, LlmSettingsPatch};

use super::{StoragePort, WriteBehind};

/// Record name for the serialized settings blob.
pub const SETTINGS_RECORD: &str = "proteus-settings.json";

/// On-disk shape of the settings record. Field names keep the camelCase
/// spelling the record has always used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSettings {
    selected_model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model_name: Option<String>,
}

impl From<&LlmSettings> for PersistedSettings {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            selected_model: settings.selected_model().to_owned(),
            api_key: settings.api_key().map(ToOwned::to_owned),
            base_url: settings.base_url().map(ToOwned::to_owned),
            model_name: settings.model_name().map(ToOwned::to_owned),
        }
    }
}

impl From<PersistedSettings> for LlmSettings {
    fn from(persisted: PersistedSettings) -> Self {
        LlmSettings::new(
            persisted.selected_model,
            persisted.api_key,
            persisted.base_url,
            persisted.model_name,
        )
    }
}

/// Owns the active [`LlmSettings`] and mirrors every mutation into the
/// storage port through the shared write-behind worker.
pub struct SettingsStore {
    settings: LlmSettings,
    writer: WriteBehind,
}

impl SettingsStore {
    /// Loads settings from `port`. Absent, malformed, or unknown-model
    /// content falls back to the hardcoded default; this never fails.
    pub fn load(port: &dyn StoragePort, writer: WriteBehind) -> Self {
        let settings = port
            .get(SETTINGS_RECORD)
            .and_then(|raw| serde_json::from_str::<PersistedSettings>(&raw).ok())
            .map(LlmSettings::from)
            .filter(|settings| find_model(settings.selected_model()).is_some())
            .unwrap_or_default();

        Self { settings, writer }
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Merges `patch` and schedules a debounced write-back.
    pub fn update(&mut self, patch: LlmSettingsPatch) {
        self.settings.merge(patch);
        self.persist();
    }

    fn persist(&self) {
        if let Ok(raw) = serde_json::to_string(&PersistedSettings::from(&self.settings)) {
            self.writer.enqueue(SETTINGS_RECORD, raw);
        }
    }
}
