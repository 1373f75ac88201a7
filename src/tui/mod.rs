// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI shell.
//!
//! Composes the prompt input, source editor, live preview, saved-diagrams
//! panel, and the settings/save dialogs over the injected stores, generator,
//! and render pipeline. Purely composition and event wiring; the business
//! rules live in the modules this one is handed.

use std::env;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::llm::{ConfigError, GenerateError, Generator};
use crate::model::{DiagramDraft, LlmModel, LlmSettingsPatch, COMPATIBLE_MODEL_ID, MODEL_CATALOG};
use crate::preview::{project_canvas, PipelinePhase, RenderPipeline, Viewport};
use crate::store::{SavedCodeStore, SettingsStore, WriteBehind};

mod chrome;
mod theme;

use chrome::{centered_rect, footer_line, view_title, FooterHint};
use theme::TuiTheme;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const TOAST_TTL: Duration = Duration::from_millis(2500);
const PAN_STEP_X: i32 = 2;
const PAN_STEP_Y: i32 = 1;
const WHEEL_ZOOM_IN: f32 = 1.1;
const WHEEL_ZOOM_OUT: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Prompt,
    Editor,
    Preview,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Settings,
    SaveDialog,
    Help,
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExternalAction {
    EditDraft,
}

#[derive(Debug, Default, Clone)]
struct PromptState {
    text: String,
    cursor: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct EditorState {
    cursor_row: usize,
    cursor_col: usize,
}

#[derive(Debug, Default)]
struct SavedPanelState {
    visible: bool,
    list_state: ListState,
    filter: String,
    filtering: bool,
}

#[derive(Debug, Clone)]
struct SettingsDialogState {
    field_idx: usize,
    model_idx: usize,
    api_key: String,
    base_url: String,
    model_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsField {
    Model,
    ApiKey,
    BaseUrl,
    ModelName,
}

#[derive(Debug, Default, Clone)]
struct SaveDialogState {
    name: String,
}

#[derive(Debug, Default)]
struct GenerationState {
    seq: u64,
    pending: bool,
}

#[derive(Debug)]
struct GenerationReply {
    seq: u64,
    result: Result<String, GenerateError>,
}

/// Everything the shell needs, constructed by the caller and passed in.
pub struct AppContext {
    pub settings: SettingsStore,
    pub saved: SavedCodeStore,
    pub draft: DiagramDraft,
    pub pipeline: RenderPipeline,
    pub generator: Generator,
    pub writer: WriteBehind,
    pub export_dir: PathBuf,
    pub runtime: tokio::runtime::Handle,
}

/// Runs the interactive terminal UI until the user quits, then flushes any
/// pending persistence.
pub fn run(ctx: AppContext) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(ctx);

    while !app.should_quit {
        app.pump(Instant::now());
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key);
                    if let Some(action) = app.take_external_action() {
                        let result =
                            terminal.run_external_action(|| app.execute_external_action(action));
                        if let Err(err) = result {
                            app.set_toast(format!("External action failed: {err}"));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    app.writer.flush();
    Ok(())
}

struct App {
    settings: SettingsStore,
    saved: SavedCodeStore,
    draft: DiagramDraft,
    pipeline: RenderPipeline,
    viewport: Viewport,
    generator: Generator,
    writer: WriteBehind,
    export_dir: PathBuf,
    runtime: tokio::runtime::Handle,
    theme: TuiTheme,
    focus: Focus,
    overlay: Overlay,
    fullscreen: bool,
    prompt: PromptState,
    editor: EditorState,
    saved_panel: SavedPanelState,
    settings_dialog: Option<SettingsDialogState>,
    save_dialog: SaveDialogState,
    generation: GenerationState,
    generation_tx: UnboundedSender<GenerationReply>,
    generation_rx: UnboundedReceiver<GenerationReply>,
    toast: Option<Toast>,
    pending_external_action: Option<ExternalAction>,
    should_quit: bool,
}

impl App {
    fn new(ctx: AppContext) -> Self {
        let (generation_tx, generation_rx) = unbounded_channel();

        let mut pipeline = ctx.pipeline;
        pipeline.set_source(ctx.draft.code().to_owned(), Instant::now());

        Self {
            settings: ctx.settings,
            saved: ctx.saved,
            draft: ctx.draft,
            pipeline,
            viewport: Viewport::default(),
            generator: ctx.generator,
            writer: ctx.writer,
            export_dir: ctx.export_dir,
            runtime: ctx.runtime,
            theme: TuiTheme::from_env(),
            focus: Focus::Prompt,
            overlay: Overlay::None,
            fullscreen: false,
            prompt: PromptState::default(),
            editor: EditorState::default(),
            saved_panel: SavedPanelState::default(),
            settings_dialog: None,
            save_dialog: SaveDialogState::default(),
            generation: GenerationState::default(),
            generation_tx,
            generation_rx,
            toast: None,
            pending_external_action: None,
            should_quit: false,
        }
    }

    /// Per-iteration housekeeping: generation replies, due renders, toasts.
    fn pump(&mut self, now: Instant) {
        while let Ok(reply) = self.generation_rx.try_recv() {
            if reply.seq != self.generation.seq {
                // A newer generation superseded this reply; discard it.
                continue;
            }
            self.generation.pending = false;
            match reply.result {
                Ok(code) => {
                    self.replace_draft(code, now);
                    self.set_toast("Diagram generated".to_owned());
                }
                Err(err) => self.set_toast(err.to_string()),
            }
        }

        if self.pipeline.tick(now) {
            self.draft.set_error(self.pipeline.error().map(ToOwned::to_owned));
        }

        if let Some(err) = self.writer.take_last_error() {
            self.set_toast(format!("Persistence error: {err}"));
        }

        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    fn replace_draft(&mut self, code: String, now: Instant) {
        self.draft.set_code(code.clone());
        self.pipeline.set_source(code, now);
        self.editor = EditorState::default();
    }

    fn set_toast(&mut self, message: String) {
        self.toast = Some(Toast {
            message,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn take_external_action(&mut self) -> Option<ExternalAction> {
        self.pending_external_action.take()
    }

    fn execute_external_action(&mut self, action: ExternalAction) -> Result<(), String> {
        match action {
            ExternalAction::EditDraft => self.edit_draft_in_editor(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.overlay {
            Overlay::Settings => {
                self.handle_settings_key(key);
                return;
            }
            Overlay::SaveDialog => {
                self.handle_save_dialog_key(key);
                return;
            }
            Overlay::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q')) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::None => {}
        }

        if self.handle_global_key(key) {
            return;
        }

        if self.fullscreen {
            self.handle_preview_key(key);
            return;
        }

        match self.focus {
            Focus::Prompt => self.handle_prompt_key(key),
            Focus::Editor => self.handle_editor_key(key),
            Focus::Preview => self.handle_preview_key(key),
            Focus::Saved => self.handle_saved_key(key),
        }
    }

    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('g') if ctrl => {
                self.generate();
                true
            }
            KeyCode::Char('s') if ctrl => {
                self.open_save_dialog();
                true
            }
            KeyCode::Char('o') if ctrl => {
                self.open_settings_dialog();
                true
            }
            KeyCode::Char('b') if ctrl => {
                self.toggle_saved_panel();
                true
            }
            KeyCode::Char('e') if ctrl => {
                self.pending_external_action = Some(ExternalAction::EditDraft);
                true
            }
            KeyCode::F(1) => {
                self.overlay = Overlay::Help;
                true
            }
            KeyCode::Tab if !self.fullscreen => {
                self.cycle_focus(1);
                true
            }
            KeyCode::BackTab if !self.fullscreen => {
                self.cycle_focus(-1);
                true
            }
            KeyCode::Esc if self.fullscreen => {
                self.fullscreen = false;
                true
            }
            _ => false,
        }
    }

    fn cycle_focus(&mut self, step: i32) {
        let order = self.focus_order();
        let current = order.iter().position(|&focus| focus == self.focus).unwrap_or(0);
        let len = order.len() as i32;
        let next = (current as i32 + step).rem_euclid(len) as usize;
        self.focus = order[next];
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Prompt, Focus::Editor, Focus::Preview];
        if self.saved_panel.visible {
            order.push(Focus::Saved);
        }
        order
    }

    // ---- generation ----

    fn generate(&mut self) {
        if self.generation.pending {
            self.set_toast("Generation already in progress".to_owned());
            return;
        }

        // Reject validation/configuration problems before spawning anything.
        if self.prompt.text.trim().is_empty() {
            self.set_toast(GenerateError::EmptyPrompt.to_string());
            return;
        }
        if !self.settings.is_configured() {
            let err = GenerateError::Config(ConfigError::Incomplete {
                model: self.settings.settings().selected_model().to_owned(),
            });
            self.set_toast(err.to_string());
            return;
        }

        self.generation.seq += 1;
        self.generation.pending = true;

        let seq = self.generation.seq;
        let generator = self.generator.clone();
        let settings = self.settings.settings().clone();
        let prompt = self.prompt.text.clone();
        let tx = self.generation_tx.clone();

        self.runtime.spawn(async move {
            let result = generator.generate(&prompt, &settings).await;
            let _ = tx.send(GenerationReply { seq, result });
        });
    }

    // ---- prompt ----

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.generate(),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let idx = byte_index(&self.prompt.text, self.prompt.cursor);
                self.prompt.text.insert(idx, ch);
                self.prompt.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.prompt.cursor > 0 {
                    self.prompt.cursor -= 1;
                    let idx = byte_index(&self.prompt.text, self.prompt.cursor);
                    self.prompt.text.remove(idx);
                }
            }
            KeyCode::Delete => {
                if self.prompt.cursor < self.prompt.text.chars().count() {
                    let idx = byte_index(&self.prompt.text, self.prompt.cursor);
                    self.prompt.text.remove(idx);
                }
            }
            KeyCode::Left => self.prompt.cursor = self.prompt.cursor.saturating_sub(1),
            KeyCode::Right => {
                self.prompt.cursor = (self.prompt.cursor + 1).min(self.prompt.text.chars().count())
            }
            KeyCode::Home => self.prompt.cursor = 0,
            KeyCode::End => self.prompt.cursor = self.prompt.text.chars().count(),
            _ => {}
        }
    }

    // ---- editor ----

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let mut lines: Vec<String> = self.draft.code().split('\n').map(ToOwned::to_owned).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let row = self.editor.cursor_row.min(lines.len() - 1);
        let col = self.editor.cursor_col.min(lines[row].chars().count());
        let mut changed = false;

        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let idx = byte_index(&lines[row], col);
                lines[row].insert(idx, ch);
                self.editor.cursor_col = col + 1;
                changed = true;
            }
            KeyCode::Enter => {
                let idx = byte_index(&lines[row], col);
                let tail = lines[row].split_off(idx);
                lines.insert(row + 1, tail);
                self.editor.cursor_row = row + 1;
                self.editor.cursor_col = 0;
                changed = true;
            }
            KeyCode::Backspace => {
                if col > 0 {
                    let idx = byte_index(&lines[row], col - 1);
                    lines[row].remove(idx);
                    self.editor.cursor_col = col - 1;
                    changed = true;
                } else if row > 0 {
                    let tail = lines.remove(row);
                    let prev_len = lines[row - 1].chars().count();
                    lines[row - 1].push_str(&tail);
                    self.editor.cursor_row = row - 1;
                    self.editor.cursor_col = prev_len;
                    changed = true;
                }
            }
            KeyCode::Delete => {
                if col < lines[row].chars().count() {
                    let idx = byte_index(&lines[row], col);
                    lines[row].remove(idx);
                    changed = true;
                } else if row + 1 < lines.len() {
                    let tail = lines.remove(row + 1);
                    lines[row].push_str(&tail);
                    changed = true;
                }
            }
            KeyCode::Up => {
                self.editor.cursor_row = row.saturating_sub(1);
                self.clamp_editor_col(&lines);
            }
            KeyCode::Down => {
                self.editor.cursor_row = (row + 1).min(lines.len() - 1);
                self.clamp_editor_col(&lines);
            }
            KeyCode::Left => self.editor.cursor_col = col.saturating_sub(1),
            KeyCode::Right => {
                self.editor.cursor_col = (col + 1).min(lines[row].chars().count())
            }
            KeyCode::Home => self.editor.cursor_col = 0,
            KeyCode::End => self.editor.cursor_col = lines[row].chars().count(),
            _ => {}
        }

        if changed {
            let code = lines.join("\n");
            self.draft.set_code(code.clone());
            self.pipeline.set_source(code, Instant::now());
        }
    }

    fn clamp_editor_col(&mut self, lines: &[String]) {
        let row = self.editor.cursor_row.min(lines.len().saturating_sub(1));
        let width = lines.get(row).map(|line| line.chars().count()).unwrap_or(0);
        self.editor.cursor_col = self.editor.cursor_col.min(width);
    }

    // ---- preview ----

    fn handle_preview_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.viewport.pan(-PAN_STEP_X, 0),
            KeyCode::Right | KeyCode::Char('l') => self.viewport.pan(PAN_STEP_X, 0),
            KeyCode::Up | KeyCode::Char('k') => self.viewport.pan(0, -PAN_STEP_Y),
            KeyCode::Down | KeyCode::Char('j') => self.viewport.pan(0, PAN_STEP_Y),
            KeyCode::Char('+') | KeyCode::Char('=') => self.viewport.zoom_in(),
            KeyCode::Char('-') => self.viewport.zoom_out(),
            KeyCode::Char('>') => self.viewport.zoom_by(WHEEL_ZOOM_IN),
            KeyCode::Char('<') => self.viewport.zoom_by(WHEEL_ZOOM_OUT),
            KeyCode::Char('0') => self.viewport.reset(),
            KeyCode::Char('f') => self.fullscreen = !self.fullscreen,
            KeyCode::Char('s') => self.export_svg(),
            KeyCode::Char('m') => self.export_source(),
            _ => {}
        }
    }

    // ---- saved panel ----

    fn toggle_saved_panel(&mut self) {
        self.saved_panel.visible = !self.saved_panel.visible;
        if self.saved_panel.visible {
            self.focus = Focus::Saved;
            self.sync_saved_selection();
        } else if self.focus == Focus::Saved {
            self.focus = Focus::Editor;
        }
    }

    fn visible_saved_indices(&self) -> Vec<usize> {
        ranked_saved_indices(&self.saved, &self.saved_panel.filter)
    }

    fn sync_saved_selection(&mut self) {
        let len = self.visible_saved_indices().len();
        let selected = self.saved_panel.list_state.selected();
        if len == 0 {
            self.saved_panel.list_state.select(None);
        } else {
            let clamped = selected.unwrap_or(0).min(len - 1);
            self.saved_panel.list_state.select(Some(clamped));
        }
    }

    fn selected_saved_index(&self) -> Option<usize> {
        let visible = self.visible_saved_indices();
        let cursor = self.saved_panel.list_state.selected()?;
        visible.get(cursor).copied()
    }

    fn handle_saved_key(&mut self, key: KeyEvent) {
        if self.saved_panel.filtering {
            match key.code {
                KeyCode::Esc => {
                    self.saved_panel.filtering = false;
                    self.saved_panel.filter.clear();
                    self.sync_saved_selection();
                }
                KeyCode::Enter => self.saved_panel.filtering = false,
                KeyCode::Backspace => {
                    self.saved_panel.filter.pop();
                    self.sync_saved_selection();
                }
                KeyCode::Char(ch) => {
                    self.saved_panel.filter.push(ch);
                    self.sync_saved_selection();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => {
                self.saved_panel.filtering = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_saved_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_saved_cursor(1),
            KeyCode::Enter => self.load_selected_saved(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected_saved(),
            KeyCode::Char('K') => self.reorder_selected_saved(-1),
            KeyCode::Char('J') => self.reorder_selected_saved(1),
            KeyCode::Esc => {
                if !self.saved_panel.filter.is_empty() {
                    self.saved_panel.filter.clear();
                    self.sync_saved_selection();
                }
            }
            _ => {}
        }
    }

    fn move_saved_cursor(&mut self, step: i32) {
        let len = self.visible_saved_indices().len();
        if len == 0 {
            return;
        }
        let current = self.saved_panel.list_state.selected().unwrap_or(0) as i32;
        let next = (current + step).rem_euclid(len as i32) as usize;
        self.saved_panel.list_state.select(Some(next));
    }

    fn load_selected_saved(&mut self) {
        let Some(index) = self.selected_saved_index() else {
            return;
        };
        let Some(code) = self.saved.codes().get(index) else {
            return;
        };
        let name = code.name().to_owned();
        let source = code.code().to_owned();
        self.replace_draft(source, Instant::now());
        self.set_toast(format!("Loaded '{name}'"));
    }

    fn delete_selected_saved(&mut self) {
        let Some(index) = self.selected_saved_index() else {
            return;
        };
        if let Some(removed) = self.saved.delete_at(index) {
            self.set_toast(format!("Deleted '{}'", removed.name()));
        }
        self.sync_saved_selection();
    }

    fn reorder_selected_saved(&mut self, step: i32) {
        if !self.saved_panel.filter.is_empty() {
            self.set_toast("Clear the filter to reorder".to_owned());
            return;
        }
        let Some(index) = self.selected_saved_index() else {
            return;
        };
        let target = index as i32 + step;
        if target < 0 {
            return;
        }
        if self.saved.reorder(index, target as usize) {
            self.saved_panel.list_state.select(Some(target as usize));
        }
    }

    // ---- dialogs ----

    fn open_settings_dialog(&mut self) {
        let settings = self.settings.settings();
        let model_idx = MODEL_CATALOG
            .iter()
            .position(|model| model.id == settings.selected_model())
            .unwrap_or(0);
        self.settings_dialog = Some(SettingsDialogState {
            field_idx: 0,
            model_idx,
            api_key: settings.api_key().unwrap_or_default().to_owned(),
            base_url: settings.base_url().unwrap_or_default().to_owned(),
            model_name: settings.model_name().unwrap_or_default().to_owned(),
        });
        self.overlay = Overlay::Settings;
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let Some(mut dialog) = self.settings_dialog.take() else {
            self.overlay = Overlay::None;
            return;
        };

        let model = &MODEL_CATALOG[dialog.model_idx];
        let fields = visible_settings_fields(model);
        let field = fields[dialog.field_idx.min(fields.len() - 1)];

        match key.code {
            KeyCode::Esc => {
                self.overlay = Overlay::None;
                self.set_toast("Settings unchanged".to_owned());
                return;
            }
            KeyCode::Enter => {
                self.apply_settings_dialog(&dialog);
                self.overlay = Overlay::None;
                return;
            }
            KeyCode::Up => {
                dialog.field_idx = (dialog.field_idx + fields.len() - 1) % fields.len();
            }
            KeyCode::Down => {
                dialog.field_idx = (dialog.field_idx + 1) % fields.len();
            }
            KeyCode::Left if field == SettingsField::Model => {
                dialog.model_idx = (dialog.model_idx + MODEL_CATALOG.len() - 1) % MODEL_CATALOG.len();
                dialog.field_idx = 0;
            }
            KeyCode::Right if field == SettingsField::Model => {
                dialog.model_idx = (dialog.model_idx + 1) % MODEL_CATALOG.len();
                dialog.field_idx = 0;
            }
            KeyCode::Char(ch) if field != SettingsField::Model => {
                settings_field_buffer(&mut dialog, field).push(ch);
            }
            KeyCode::Backspace if field != SettingsField::Model => {
                settings_field_buffer(&mut dialog, field).pop();
            }
            _ => {}
        }

        self.settings_dialog = Some(dialog);
    }

    fn apply_settings_dialog(&mut self, dialog: &SettingsDialogState) {
        self.settings.update(LlmSettingsPatch {
            selected_model: Some(MODEL_CATALOG[dialog.model_idx].id.to_owned()),
            api_key: Some(dialog.api_key.clone()),
            base_url: Some(dialog.base_url.clone()),
            model_name: Some(dialog.model_name.clone()),
        });
        let status = if self.settings.is_configured() {
            "Settings saved"
        } else {
            "Settings saved (incomplete configuration)"
        };
        self.set_toast(status.to_owned());
    }

    fn open_save_dialog(&mut self) {
        self.save_dialog = SaveDialogState::default();
        self.overlay = Overlay::SaveDialog;
    }

    fn handle_save_dialog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Enter => {
                let name = self.save_dialog.name.clone();
                if self.saved.save(&name, self.draft.code()) {
                    self.set_toast(format!("Saved '{}'", name.trim()));
                    self.overlay = Overlay::None;
                    self.sync_saved_selection();
                } else {
                    self.set_toast("Enter a name for the diagram first".to_owned());
                }
            }
            KeyCode::Backspace => {
                self.save_dialog.name.pop();
            }
            KeyCode::Char(ch) => self.save_dialog.name.push(ch),
            _ => {}
        }
    }

    // ---- exports / external editor ----

    fn export_svg(&mut self) {
        let Some(rendered) = self.pipeline.rendered() else {
            self.set_toast("Nothing rendered to export yet".to_owned());
            return;
        };
        let path = self.export_dir.join(format!("proteus-export-{}.svg", timestamp_nanos()));
        match fs::write(&path, rendered.svg()) {
            Ok(()) => self.set_toast(format!("Exported {}", path.display())),
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn export_source(&mut self) {
        let path = self.export_dir.join(format!("proteus-export-{}.mmd", timestamp_nanos()));
        let mut contents = self.draft.code().to_owned();
        if !contents.ends_with('\n') {
            contents.push('\n');
        }
        match fs::write(&path, contents) {
            Ok(()) => self.set_toast(format!("Exported {}", path.display())),
            Err(err) => self.set_toast(format!("Export failed: {err}")),
        }
    }

    fn edit_draft_in_editor(&mut self) -> Result<(), String> {
        let temp_path = write_temp_mermaid_file(self.draft.code())?;
        let editor = resolve_editor_command();
        let launch_result = launch_editor_command(&editor, &temp_path);

        let edited = match launch_result {
            Ok(()) => fs::read_to_string(&temp_path)
                .map_err(|err| format!("failed to read edited file back: {err}")),
            Err(err) => Err(err),
        };
        let _ = fs::remove_file(&temp_path);

        let edited = edited?;
        let edited = edited.strip_suffix('\n').unwrap_or(&edited).to_owned();
        self.replace_draft(edited, Instant::now());
        Ok(())
    }
}

// ---- drawing ----

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = layout[0];
    let footer_area = layout[1];

    if app.fullscreen {
        draw_preview(frame, app, main_area, true);
    } else {
        let (left_area, saved_area) = if app.saved_panel.visible {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
                .split(main_area);
            (panes[0], Some(panes[1]))
        } else {
            (main_area, None)
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(left_area);
        draw_prompt(frame, app, rows[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        draw_editor(frame, app, body[0]);
        draw_preview(frame, app, body[1], false);

        if let Some(saved_area) = saved_area {
            draw_saved_panel(frame, app, saved_area);
        }
    }

    draw_footer(frame, app, footer_area);

    match app.overlay {
        Overlay::Settings => draw_settings_dialog(frame, app, main_area),
        Overlay::SaveDialog => draw_save_dialog(frame, app, main_area),
        Overlay::Help => draw_help(frame, app, main_area),
        Overlay::None => {}
    }

    if let Some(toast) = app.toast.clone() {
        draw_toast(frame, app, main_area, &toast.message);
    }
}

fn draw_prompt(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Prompt;
    let suffix = if app.generation.pending {
        Some("generating…")
    } else {
        None
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Prompt", suffix))
        .border_style(app.theme.panel_border_style(focused));

    let cursor = focused.then_some(app.prompt.cursor);
    let line = line_with_cursor(&app.prompt.text, cursor, &app.theme);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_editor(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let has_error = app.draft.error().is_some();

    let (editor_area, error_area) = if has_error && area.height > 5 {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Editor", None))
        .border_style(app.theme.panel_border_style(focused));

    let viewport_height = editor_area.height.saturating_sub(2) as usize;
    let scroll_y = app.editor.cursor_row.saturating_sub(viewport_height.saturating_sub(1)) as u16;

    let lines: Vec<Line<'static>> = app
        .draft
        .code()
        .split('\n')
        .enumerate()
        .map(|(row, line)| {
            let cursor = (focused && row == app.editor.cursor_row).then_some(app.editor.cursor_col);
            line_with_cursor(line, cursor, &app.theme)
        })
        .collect();

    let editor = Paragraph::new(Text::from(lines)).block(block).scroll((scroll_y, 0));
    frame.render_widget(editor, editor_area);

    if let (Some(error_area), Some(error)) = (error_area, app.draft.error()) {
        let alert = Paragraph::new(error.to_owned())
            .style(app.theme.error_style())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(view_title("Render error", None)));
        frame.render_widget(alert, error_area);
    }
}

fn draw_preview(frame: &mut Frame<'_>, app: &App, area: Rect, fullscreen: bool) {
    let focused = fullscreen || app.focus == Focus::Preview;
    let zoom = format!("{:.0}%", app.viewport.scale() * 100.0);
    let suffix = match app.pipeline.phase() {
        PipelinePhase::Pending => format!("{zoom} · rendering…"),
        PipelinePhase::Error => format!("{zoom} · error"),
        _ => zoom,
    };
    let title_label = if fullscreen { "Preview (fullscreen)" } else { "Preview" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title(title_label, Some(suffix.as_str())))
        .border_style(app.theme.panel_border_style(focused));

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let content = match app.pipeline.rendered() {
        Some(rendered) => {
            let lines = project_canvas(rendered.canvas(), inner_width, inner_height, &app.viewport);
            Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>())
        }
        None => Text::from("Nothing rendered yet — edit the source or generate a diagram."),
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_saved_panel(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Saved;
    let suffix = if app.saved_panel.filtering || !app.saved_panel.filter.is_empty() {
        Some(format!("/{}", app.saved_panel.filter))
    } else {
        None
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Saved", suffix.as_deref()))
        .border_style(app.theme.panel_border_style(focused));

    let visible = app.visible_saved_indices();
    let items: Vec<ListItem> = visible
        .iter()
        .filter_map(|&index| app.saved.codes().get(index))
        .map(|code| ListItem::new(code.name().to_owned()))
        .collect();

    let list = List::new(items).block(block).highlight_style(app.theme.selection_style());
    frame.render_stateful_widget(list, area, &mut app.saved_panel.list_state);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints = footer_hints(app);
    frame.render_widget(Paragraph::new(footer_line(&hints, &app.theme)), area);
}

fn footer_hints(app: &App) -> Vec<FooterHint> {
    if app.fullscreen {
        return vec![
            FooterHint { key: "←↓↑→", label: "pan" },
            FooterHint { key: "+/-", label: "zoom" },
            FooterHint { key: "0", label: "reset" },
            FooterHint { key: "s", label: "svg" },
            FooterHint { key: "Esc", label: "back" },
        ];
    }

    let mut hints = vec![
        FooterHint { key: "Tab", label: "panes" },
        FooterHint { key: "^G", label: "generate" },
        FooterHint { key: "^S", label: "save" },
        FooterHint { key: "^B", label: "saved" },
        FooterHint { key: "^O", label: "settings" },
        FooterHint { key: "^E", label: "$EDITOR" },
    ];
    match app.focus {
        Focus::Preview => {
            hints.push(FooterHint { key: "f", label: "fullscreen" });
            hints.push(FooterHint { key: "0", label: "reset" });
        }
        Focus::Saved => {
            hints.push(FooterHint { key: "J/K", label: "reorder" });
            hints.push(FooterHint { key: "/", label: "filter" });
        }
        _ => {}
    }
    hints.push(FooterHint { key: "F1", label: "help" });
    hints.push(FooterHint { key: "^Q", label: "quit" });
    hints
}

fn draw_settings_dialog(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(dialog) = &app.settings_dialog else {
        return;
    };
    let model = &MODEL_CATALOG[dialog.model_idx];
    let fields = visible_settings_fields(model);
    let active = fields[dialog.field_idx.min(fields.len() - 1)];

    let rect = centered_rect(64, (fields.len() as u16) + 7, area);
    frame.render_widget(Clear, rect);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for field in &fields {
        let selected = *field == active;
        let label = match field {
            SettingsField::Model => format!("Model       ‹ {} ›", model.name),
            SettingsField::ApiKey => format!("API key     {}", mask(&dialog.api_key)),
            SettingsField::BaseUrl => format!("Base URL    {}", dialog.base_url),
            SettingsField::ModelName => format!("Model name  {}", dialog.model_name),
        };
        let style = if selected {
            app.theme.selection_style()
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(label, style)));
    }
    lines.push(Line::from(String::new()));
    lines.push(Line::from(model.description.to_owned()));
    lines.push(Line::from(String::new()));
    lines.push(Line::from("↑↓ field · ←→ model · Enter save · Esc cancel"));

    let dialog_widget = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(view_title("LLM settings", None)));
    frame.render_widget(dialog_widget, rect);
}

fn draw_save_dialog(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rect = centered_rect(50, 7, area);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from("Enter a name for your diagram:"),
        line_with_cursor(&app.save_dialog.name, Some(app.save_dialog.name.chars().count()), &app.theme),
        Line::from(String::new()),
        Line::from("Enter save · Esc cancel"),
    ];
    let dialog = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(view_title("Save diagram", None)));
    frame.render_widget(dialog, rect);
}

fn draw_help(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rect = centered_rect(58, 16, area);
    frame.render_widget(Clear, rect);

    let text = Text::from(vec![
        Line::from("Tab / Shift-Tab   cycle panes"),
        Line::from("Enter (prompt)    generate a diagram"),
        Line::from("Ctrl-G            generate from anywhere"),
        Line::from("Ctrl-S            save current diagram"),
        Line::from("Ctrl-B            toggle saved panel"),
        Line::from("Ctrl-O            LLM settings"),
        Line::from("Ctrl-E            edit source in $EDITOR"),
        Line::from("Preview: ←↓↑→ pan · +/- zoom · </> fine zoom"),
        Line::from("Preview: 0 reset · f fullscreen · s svg · m mmd"),
        Line::from("Saved: Enter load · d delete · J/K reorder · / filter"),
        Line::from("Ctrl-Q            quit"),
        Line::from(String::new()),
        Line::from("Esc closes this help."),
    ]);
    let help = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title("Help", None))
            .border_style(app.theme.panel_border_style(true)),
    );
    frame.render_widget(help, rect);
}

fn draw_toast(frame: &mut Frame<'_>, app: &App, area: Rect, message: &str) {
    let width = (message.chars().count() as u16 + 2).min(area.width);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width),
        area.y + area.height.saturating_sub(1),
        width,
        1,
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(format!(" {message} ")).style(app.theme.toast_style()),
        rect,
    );
}

fn line_with_cursor(line: &str, cursor_col: Option<usize>, theme: &TuiTheme) -> Line<'static> {
    match cursor_col {
        None => Line::from(line.to_owned()),
        Some(col) => {
            let chars: Vec<char> = line.chars().collect();
            let before: String = chars.iter().take(col).collect();
            let at: String = chars
                .get(col)
                .map(|ch| ch.to_string())
                .unwrap_or_else(|| " ".to_owned());
            let after: String = chars.iter().skip(col + 1).collect();
            Line::from(vec![
                Span::raw(before),
                Span::styled(at, theme.selection_style()),
                Span::raw(after),
            ])
        }
    }
}

// ---- settings dialog helpers ----

fn visible_settings_fields(model: &LlmModel) -> Vec<SettingsField> {
    let mut fields = vec![SettingsField::Model];
    if model.requires_auth {
        fields.push(SettingsField::ApiKey);
    }
    if model.requires_base_url {
        fields.push(SettingsField::BaseUrl);
    }
    if model.id == COMPATIBLE_MODEL_ID {
        fields.push(SettingsField::ModelName);
    }
    fields
}

fn settings_field_buffer<'a>(
    dialog: &'a mut SettingsDialogState,
    field: SettingsField,
) -> &'a mut String {
    match field {
        SettingsField::ApiKey => &mut dialog.api_key,
        SettingsField::BaseUrl => &mut dialog.base_url,
        SettingsField::ModelName => &mut dialog.model_name,
        SettingsField::Model => &mut dialog.model_name,
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "•".repeat(secret.chars().count().min(24))
    }
}

// ---- saved panel ranking ----

fn ranked_saved_indices(saved: &SavedCodeStore, filter: &str) -> Vec<usize> {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return (0..saved.codes().len()).collect();
    }

    let mut scored: Vec<(i64, usize)> = saved
        .codes()
        .iter()
        .enumerate()
        .filter_map(|(index, code)| {
            let haystack = code.name().to_lowercase();
            fuzzy_score(&needle, &haystack).map(|score| (score, index))
        })
        .collect();

    scored.sort_by(|(score_a, index_a), (score_b, index_b)| {
        score_b.cmp(score_a).then_with(|| index_a.cmp(index_b))
    });
    scored.into_iter().map(|(_, index)| index).collect()
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    if needle.is_empty() || !is_subsequence(needle, haystack) {
        return None;
    }

    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let mut score = (ratio * 1000.0).round() as i64;
    if haystack.contains(needle) {
        score += 2000;
    }
    if haystack.starts_with(needle) {
        score += 1000;
    }
    Some(score)
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut needle_iter = needle.chars().peekable();
    for ch in haystack.chars() {
        let Some(&want) = needle_iter.peek() else {
            return true;
        };
        if ch == want {
            needle_iter.next();
        }
    }
    needle_iter.peek().is_none()
}

// ---- misc helpers ----

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map(|(idx, _)| idx).unwrap_or(line.len())
}

fn timestamp_nanos() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|duration| duration.as_nanos()).unwrap_or(0)
}

fn resolve_editor_command() -> String {
    env::var("VISUAL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env::var("EDITOR").ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_owned())
}

fn write_temp_mermaid_file(content: &str) -> Result<PathBuf, String> {
    let mut temp_path = env::temp_dir();
    temp_path.push(format!("proteus-draft-{}.mmd", timestamp_nanos()));
    let mut contents = content.to_owned();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(&temp_path, contents).map_err(|err| {
        format!("failed to create temporary Mermaid file {}: {err}", temp_path.display())
    })?;
    Ok(temp_path)
}

fn launch_editor_command(command: &str, path: &Path) -> Result<(), String> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err("invalid editor temp path".to_owned());
    }

    let status = Command::new("sh")
        .arg("-lc")
        .arg(format!("{command} {}", shell_single_quote(path_text.as_ref())))
        .status()
        .map_err(|err| format!("failed to run editor command `{command}`: {err}"))?;
    if !status.success() {
        return Err(format!("editor command failed with status {status}"));
    }
    Ok(())
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

// ---- terminal plumbing ----

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    fn run_external_action(
        &mut self,
        action: impl FnOnce() -> Result<(), String>,
    ) -> Result<(), String> {
        let _suspend = TerminalSuspendGuard::new(&mut self.terminal)
            .map_err(|err| format!("terminal suspend failed: {err}"))?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            let _ = enable_raw_mode();
            let _ = execute!(terminal.backend_mut(), EnterAlternateScreen);
            let _ = terminal.hide_cursor();
            let _ = ratatui::backend::Backend::flush(terminal.backend_mut());
            return Err(err);
        }

        ratatui::backend::Backend::flush(terminal.backend_mut())?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        let _ = enable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), EnterAlternateScreen);
        let _ = self.terminal.clear();
        let _ = self.terminal.hide_cursor();
        let _ = ratatui::backend::Backend::flush(self.terminal.backend_mut());
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
