// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{
    FolderStore, MemoryStore, SavedCodeStore, SettingsStore, StoragePort, WriteBehind,
    WriteDurability, SAVED_RECORD, SETTINGS_RECORD,
};
use crate::model::LlmSettingsPatch;

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("proteus-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[fixture]
fn tmp() -> TempDir {
    TempDir::new("store")
}

fn fast_writer(port: Arc<dyn StoragePort>) -> WriteBehind {
    WriteBehind::with_delay(port, Duration::from_millis(20))
}

#[rstest]
fn folder_store_round_trips_a_record(tmp: TempDir) {
    let store = FolderStore::new(tmp.path());
    assert_eq!(store.get("missing.json"), None);

    store.set("record.json", "{\"a\":1}").unwrap();
    assert_eq!(store.get("record.json").as_deref(), Some("{\"a\":1}"));

    store.set("record.json", "{\"a\":2}").unwrap();
    assert_eq!(store.get("record.json").as_deref(), Some("{\"a\":2}"));
}

#[rstest]
fn folder_store_durable_writes_also_round_trip(tmp: TempDir) {
    let store = FolderStore::new(tmp.path()).with_durability(WriteDurability::Durable);
    store.set("record.json", "payload").unwrap();
    assert_eq!(store.get("record.json").as_deref(), Some("payload"));
}

#[rstest]
fn folder_store_leaves_no_temp_files_behind(tmp: TempDir) {
    let store = FolderStore::new(tmp.path());
    store.set("record.json", "payload").unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".proteus.tmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn memory_store_round_trips_a_record() {
    let store = MemoryStore::new();
    assert_eq!(store.get("k"), None);
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("v"));
}

#[test]
fn write_behind_coalesces_bursts_into_the_latest_snapshot() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = fast_writer(port.clone());

    writer.enqueue("record.json", "one".to_owned());
    writer.enqueue("record.json", "two".to_owned());
    writer.enqueue("record.json", "three".to_owned());
    writer.flush();

    assert_eq!(port.get("record.json").as_deref(), Some("three"));
}

#[test]
fn write_behind_cancel_drops_the_pending_snapshot() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = fast_writer(port.clone());

    writer.enqueue("record.json", "one".to_owned());
    writer.cancel("record.json");
    writer.flush();

    assert_eq!(port.get("record.json"), None);
}

#[test]
fn write_behind_eventually_writes_without_an_explicit_flush() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = WriteBehind::with_delay(port.clone(), Duration::from_millis(10));

    writer.enqueue("record.json", "one".to_owned());
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while port.get("record.json").is_none() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(port.get("record.json").as_deref(), Some("one"));
    drop(writer);
}

#[test]
fn settings_store_defaults_on_absent_malformed_or_unknown_model() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    let store = SettingsStore::load(port.as_ref(), fast_writer(port.clone()));
    assert_eq!(store.settings().selected_model(), "llama-3.1-70b-versatile");

    port.set(SETTINGS_RECORD, "not json at all").unwrap();
    let store = SettingsStore::load(port.as_ref(), fast_writer(port.clone()));
    assert_eq!(store.settings().selected_model(), "llama-3.1-70b-versatile");

    port.set(SETTINGS_RECORD, "{\"selectedModel\":\"mystery-9000\"}").unwrap();
    let store = SettingsStore::load(port.as_ref(), fast_writer(port.clone()));
    assert_eq!(store.settings().selected_model(), "llama-3.1-70b-versatile");
}

#[test]
fn settings_store_update_persists_the_merged_record() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = fast_writer(port.clone());
    let mut store = SettingsStore::load(port.as_ref(), writer.clone());

    store.update(LlmSettingsPatch {
        selected_model: Some("gpt-4".to_owned()),
        api_key: Some("sk-test".to_owned()),
        ..LlmSettingsPatch::default()
    });
    writer.flush();

    let raw = port.get(SETTINGS_RECORD).expect("settings record written");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["selectedModel"], "gpt-4");
    assert_eq!(value["apiKey"], "sk-test");
    assert!(value.get("baseUrl").is_none());

    let reloaded = SettingsStore::load(port.as_ref(), fast_writer(port.clone()));
    assert_eq!(reloaded.settings().selected_model(), "gpt-4");
    assert_eq!(reloaded.settings().api_key(), Some("sk-test"));
    assert!(reloaded.is_configured());
}

#[test]
fn saved_store_defaults_to_empty_and_skips_unusable_ids() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());

    let store = SavedCodeStore::load(port.as_ref(), fast_writer(port.clone()));
    assert!(store.codes().is_empty());

    port.set(
        SAVED_RECORD,
        "[{\"id\":\"\",\"name\":\"bad\",\"code\":\"graph TD\"},{\"id\":\"ok\",\"name\":\"good\",\"code\":\"graph TD\"}]",
    )
    .unwrap();
    let store = SavedCodeStore::load(port.as_ref(), fast_writer(port.clone()));
    assert_eq!(store.codes().len(), 1);
    assert_eq!(store.codes().get(0).unwrap().name(), "good");
}

#[test]
fn saved_store_mutations_persist_and_reload_in_order() {
    let port: Arc<MemoryStore> = Arc::new(MemoryStore::new());
    let writer = fast_writer(port.clone());
    let mut store = SavedCodeStore::load(port.as_ref(), writer.clone());

    assert!(store.save("first", "graph TD\n    A-->B"));
    assert!(store.save("second", "graph TD\n    B-->C"));
    assert!(store.save("third", "graph TD\n    C-->D"));
    assert!(!store.save("   ", "graph TD"));
    assert!(store.reorder(0, 2));
    assert!(store.delete_at(0).is_some());
    writer.flush();

    let reloaded = SavedCodeStore::load(port.as_ref(), fast_writer(port.clone()));
    let names: Vec<_> = reloaded.codes().iter().map(|code| code.name().to_owned()).collect();
    assert_eq!(names, vec!["third", "first"]);
}
