// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end flows that stay off the network: persistence round trips
//! through a real state folder, source-to-preview rendering, and the
//! generator's pre-network rejections.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use proteus::engine::{EngineConfig, FlowchartEngine};
use proteus::llm::{extract_diagram_source, ConfigError, GenerateError, Generator};
use proteus::model::{LlmSettings, LlmSettingsPatch};
use proteus::preview::RenderPipeline;
use proteus::store::{FolderStore, SavedCodeStore, SettingsStore, WriteBehind};

const DEMO: &str = "graph TD\n    A[Start] --> B{Is it working?}\n    B -->|Yes| C[Great!]\n    B -->|No| D[Debug]\n    D --> B";

struct TempStateDir {
    path: PathBuf,
}

impl TempStateDir {
    fn new(tag: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let path = std::env::temp_dir().join(format!(
            "proteus-it-{tag}-{}-{nanos}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempStateDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn fast_writer(port: Arc<FolderStore>) -> WriteBehind {
    WriteBehind::with_delay(port, Duration::from_millis(20))
}

#[test]
fn settings_and_saved_diagrams_survive_a_restart() {
    let state = TempStateDir::new("restart");
    let port = Arc::new(FolderStore::new(&state.path));

    {
        let writer = fast_writer(port.clone());
        let mut settings = SettingsStore::load(port.as_ref(), writer.clone());
        let mut saved = SavedCodeStore::load(port.as_ref(), writer.clone());

        settings.update(LlmSettingsPatch {
            selected_model: Some("openai-compatible".to_owned()),
            api_key: Some("sk-local".to_owned()),
            base_url: Some("https://llm.internal/v1".to_owned()),
            model_name: Some("qwen-vl".to_owned()),
        });
        assert!(saved.save("pipeline", DEMO));
        assert!(saved.save("scratch", "graph LR\n    X --> Y"));
        assert!(saved.reorder(0, 1));
        writer.flush();
    }

    // Fresh stores over the same folder see the persisted state.
    let writer = fast_writer(port.clone());
    let settings = SettingsStore::load(port.as_ref(), writer.clone());
    assert_eq!(settings.settings().selected_model(), "openai-compatible");
    assert_eq!(settings.settings().model_name(), Some("qwen-vl"));
    assert!(settings.is_configured());

    let saved = SavedCodeStore::load(port.as_ref(), writer);
    let names: Vec<_> = saved.codes().iter().map(|code| code.name().to_owned()).collect();
    assert_eq!(names, vec!["scratch", "pipeline"]);
    assert_eq!(saved.codes().get(1).unwrap().code(), DEMO);
}

#[test]
fn source_renders_to_markup_and_bad_edits_keep_the_last_good_preview() {
    let debounce = Duration::from_millis(50);
    let mut pipeline = RenderPipeline::with_debounce(
        Box::new(FlowchartEngine::new(EngineConfig::default())),
        debounce,
    );
    let t0 = Instant::now();

    pipeline.set_source(DEMO, t0);
    assert!(pipeline.tick(t0 + debounce));
    let rendered = pipeline.rendered().expect("rendered");
    assert!(rendered.svg().contains("Is it working?"));
    let good_svg = rendered.svg().to_owned();

    let t1 = t0 + Duration::from_secs(1);
    pipeline.set_source("graph TD\n    A[Start] --> B{oops", t1);
    assert!(pipeline.tick(t1 + debounce));
    assert!(pipeline.error().is_some());
    assert_eq!(pipeline.rendered().expect("stale markup").svg(), good_svg);
}

#[test]
fn fenced_completions_extract_to_bare_diagram_source() {
    let completion = "Sure!\n```mermaid\ngraph TD\n A-->B\n```\nAnything else?";
    assert_eq!(extract_diagram_source(completion), "graph TD\n A-->B");
}

#[tokio::test]
async fn generation_rejections_happen_before_any_network_activity() {
    let generator = Generator::new().expect("generator");

    let err = generator
        .generate("   ", &LlmSettings::default())
        .await
        .expect_err("blank prompt");
    assert!(matches!(err, GenerateError::EmptyPrompt));

    // openai-compatible without a base URL is rejected as unconfigured even
    // though an api key is present.
    let settings = LlmSettings::new(
        "openai-compatible",
        Some("sk-test".to_owned()),
        None,
        None,
    );
    let err = generator
        .generate("a login flow", &settings)
        .await
        .expect_err("missing base url");
    assert!(matches!(
        err,
        GenerateError::Config(ConfigError::Incomplete { .. })
    ));
}
