// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{
    is_subsequence, mask, ranked_saved_indices, visible_settings_fields, App, AppContext, Focus,
    GenerationReply, Overlay, SettingsField,
};
use crate::engine::{EngineConfig, FlowchartEngine};
use crate::llm::Generator;
use crate::model::{find_model, DiagramDraft};
use crate::preview::{PipelinePhase, RenderPipeline};
use crate::store::{MemoryStore, SavedCodeStore, SettingsStore, WriteBehind};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn test_app() -> (App, tokio::runtime::Runtime) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");

    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = WriteBehind::with_delay(port.clone(), Duration::from_millis(10));
    let ctx = AppContext {
        settings: SettingsStore::load(port.as_ref(), writer.clone()),
        saved: SavedCodeStore::load(port.as_ref(), writer.clone()),
        draft: DiagramDraft::default(),
        pipeline: RenderPipeline::with_debounce(
            Box::new(FlowchartEngine::new(EngineConfig::default())),
            Duration::from_millis(50),
        ),
        generator: Generator::new().expect("generator"),
        writer,
        export_dir: std::env::temp_dir(),
        runtime: runtime.handle().clone(),
    };

    (App::new(ctx), runtime)
}

#[test]
fn editor_keystrokes_replace_the_draft_and_schedule_a_render() {
    let (mut app, _runtime) = test_app();
    app.focus = Focus::Editor;
    let before = app.draft.code().to_owned();

    app.handle_key(key(KeyCode::Char('x')));

    assert_ne!(app.draft.code(), before);
    assert!(app.draft.code().starts_with('x'));
    assert_eq!(app.pipeline.phase(), PipelinePhase::Pending);
}

#[test]
fn the_render_error_lands_on_the_draft_after_the_debounce_window() {
    let (mut app, _runtime) = test_app();
    app.replace_draft("graph TD\n    A{oops".to_owned(), Instant::now());

    app.pump(Instant::now() + Duration::from_millis(60));

    let error = app.draft.error().expect("render error");
    assert!(error.contains("unmatched"), "got: {error}");
}

#[test]
fn save_dialog_saves_named_diagrams_and_rejects_blank_names() {
    let (mut app, _runtime) = test_app();

    app.handle_key(ctrl('s'));
    assert_eq!(app.overlay, Overlay::SaveDialog);

    // A blank name is rejected and the dialog stays open.
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.overlay, Overlay::SaveDialog);
    assert_eq!(app.saved.codes().len(), 0);

    for ch in "demo".chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(app.saved.codes().len(), 1);
    assert_eq!(app.saved.codes().get(0).expect("entry").name(), "demo");
    assert_eq!(app.saved.codes().get(0).expect("entry").code(), app.draft.code());
}

#[test]
fn saved_panel_reorders_with_shift_j_and_k() {
    let (mut app, _runtime) = test_app();
    assert!(app.saved.save("first", "graph TD\n    A"));
    assert!(app.saved.save("second", "graph TD\n    B"));

    app.handle_key(ctrl('b'));
    assert_eq!(app.focus, Focus::Saved);
    app.saved_panel.list_state.select(Some(0));

    app.handle_key(key(KeyCode::Char('J')));
    let names: Vec<_> = app.saved.codes().iter().map(|code| code.name().to_owned()).collect();
    assert_eq!(names, vec!["second", "first"]);
    assert_eq!(app.saved_panel.list_state.selected(), Some(1));

    app.handle_key(key(KeyCode::Char('K')));
    let names: Vec<_> = app.saved.codes().iter().map(|code| code.name().to_owned()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn loading_a_saved_diagram_replaces_the_draft() {
    let (mut app, _runtime) = test_app();
    assert!(app.saved.save("tiny", "graph LR\n    X --> Y"));

    app.handle_key(ctrl('b'));
    app.saved_panel.list_state.select(Some(0));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.draft.code(), "graph LR\n    X --> Y");
}

#[test]
fn generate_rejects_a_blank_prompt_with_a_toast_and_no_pending_work() {
    let (mut app, _runtime) = test_app();

    app.handle_key(ctrl('g'));

    assert!(!app.generation.pending);
    let toast = app.toast.as_ref().expect("toast");
    assert!(toast.message.contains("describe"), "got: {}", toast.message);
}

#[test]
fn stale_generation_replies_are_discarded() {
    let (mut app, _runtime) = test_app();
    let before = app.draft.code().to_owned();
    app.generation.seq = 2;
    app.generation.pending = true;

    app.generation_tx
        .send(GenerationReply {
            seq: 1,
            result: Ok("graph LR\n    STALE".to_owned()),
        })
        .expect("send");
    app.pump(Instant::now());

    assert_eq!(app.draft.code(), before);
    assert!(app.generation.pending);

    app.generation_tx
        .send(GenerationReply {
            seq: 2,
            result: Ok("graph LR\n    FRESH".to_owned()),
        })
        .expect("send");
    app.pump(Instant::now());

    assert_eq!(app.draft.code(), "graph LR\n    FRESH");
    assert!(!app.generation.pending);
}

#[test]
fn preview_zoom_keys_respect_the_step_clamp() {
    let (mut app, _runtime) = test_app();
    app.focus = Focus::Preview;

    for _ in 0..40 {
        app.handle_key(key(KeyCode::Char('+')));
    }
    assert!(app.viewport.scale() <= 2.0);

    app.handle_key(key(KeyCode::Char('0')));
    assert_eq!(app.viewport.scale(), 1.0);
    assert_eq!(app.viewport.offset(), (0, 0));
}

#[test]
fn tab_cycles_focus_and_includes_the_saved_panel_only_when_visible() {
    let (mut app, _runtime) = test_app();
    assert_eq!(app.focus, Focus::Prompt);

    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Editor);
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Preview);
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Prompt);

    app.handle_key(ctrl('b'));
    app.focus = Focus::Preview;
    app.handle_key(key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Saved);
}

#[test]
fn ranked_indices_filter_and_prefer_prefix_matches() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = WriteBehind::with_delay(port.clone(), Duration::from_millis(10));
    let mut saved = SavedCodeStore::load(port.as_ref(), writer);
    assert!(saved.save("auth flow", "graph TD\n    A"));
    assert!(saved.save("checkout", "graph TD\n    B"));
    assert!(saved.save("flowchart basics", "graph TD\n    C"));

    assert_eq!(ranked_saved_indices(&saved, ""), vec![0, 1, 2]);

    let ranked = ranked_saved_indices(&saved, "flow");
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0], 2, "prefix match should rank first");
    assert_eq!(ranked[1], 0);

    assert!(ranked_saved_indices(&saved, "zzz").is_empty());
}

#[test]
fn subsequence_matching_is_ordered_and_complete() {
    assert!(is_subsequence("af", "auth flow"));
    assert!(is_subsequence("", "anything"));
    assert!(!is_subsequence("fa", "flow"));
    assert!(!is_subsequence("abc", "ab"));
}

#[test]
fn settings_fields_follow_the_model_requirements() {
    let free = find_model("llama-3.1-70b-versatile").expect("model");
    assert_eq!(visible_settings_fields(free), vec![SettingsField::Model]);

    let openai = find_model("gpt-4").expect("model");
    assert_eq!(
        visible_settings_fields(openai),
        vec![SettingsField::Model, SettingsField::ApiKey]
    );

    let compatible = find_model("openai-compatible").expect("model");
    assert_eq!(
        visible_settings_fields(compatible),
        vec![
            SettingsField::Model,
            SettingsField::ApiKey,
            SettingsField::BaseUrl,
            SettingsField::ModelName
        ]
    );
}

#[test]
fn settings_dialog_round_trips_into_the_store() {
    let (mut app, _runtime) = test_app();

    app.handle_key(ctrl('o'));
    assert_eq!(app.overlay, Overlay::Settings);

    // Walk the model picker from the default (last entry) to gpt-4 (first).
    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Down));
    for ch in "sk-test".chars() {
        app.handle_key(key(KeyCode::Char(ch)));
    }
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.overlay, Overlay::None);
    assert_eq!(app.settings.settings().selected_model(), "gpt-4");
    assert_eq!(app.settings.settings().api_key(), Some("sk-test"));
    assert!(app.settings.is_configured());
}

#[test]
fn masked_secrets_never_echo_their_contents() {
    assert_eq!(mask(""), "");
    assert_eq!(mask("abc"), "•••");
    assert!(!mask("sk-secret").contains("sk"));
}
