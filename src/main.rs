// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Proteus CLI entrypoint.
//!
//! Runs the interactive TUI against a state directory (settings + saved
//! diagrams live there as JSON records; exports land there too).

use std::error::Error;
use std::sync::Arc;

use proteus::engine::{EngineConfig, FlowchartEngine};
use proteus::llm::Generator;
use proteus::model::DiagramDraft;
use proteus::preview::RenderPipeline;
use proteus::store::{FolderStore, SavedCodeStore, SettingsStore, WriteBehind, WriteDurability};
use proteus::tui::{run, AppContext};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<state-dir>] [--durable-writes]\n  {program} --demo\n\nIf state-dir is omitted, the current working directory is used; settings and\nsaved diagrams persist there as JSON records and exports are written next to\nthem.\n\n--demo uses a throwaway state directory under the system temp dir and cannot\nbe combined with state-dir.\n\n--durable-writes opts into slower, best-effort durable persistence\n(fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    state_dir: Option<String>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.state_dir.is_some() {
                    return Err(());
                }
                options.state_dir = Some(arg);
            }
        }
    }

    if options.demo && options.state_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "proteus".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let state_dir = if options.demo {
            let now_millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            std::env::temp_dir()
                .join(format!("proteus-demo-{}-{now_millis}", std::process::id()))
        } else {
            options.state_dir.unwrap_or_else(|| ".".to_owned()).into()
        };

        let store = if options.durable_writes {
            FolderStore::new(&state_dir).with_durability(WriteDurability::Durable)
        } else {
            FolderStore::new(&state_dir)
        };
        let port: Arc<FolderStore> = Arc::new(store);
        let writer = WriteBehind::new(port.clone());

        let settings = SettingsStore::load(port.as_ref(), writer.clone());
        let saved = SavedCodeStore::load(port.as_ref(), writer.clone());
        let pipeline = RenderPipeline::new(Box::new(FlowchartEngine::new(EngineConfig::default())));
        let generator = Generator::new()?;

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let handle = runtime.handle().clone();

        let ctx = AppContext {
            settings,
            saved,
            draft: DiagramDraft::default(),
            pipeline,
            generator,
            writer,
            export_dir: state_dir,
            runtime: handle,
        };

        runtime.block_on(async move {
            tokio::task::spawn_blocking(move || run(ctx).map_err(|err| err.to_string()))
                .await
                .map_err(|err| Box::new(err) as Box<dyn Error>)?
                .map_err(|err| {
                    Box::new(std::io::Error::new(std::io::ErrorKind::Other, err))
                        as Box<dyn Error>
                })
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("proteus: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_demo_flag() {
        let options = parse_options(["--demo".to_owned()].into_iter()).expect("parse options");
        assert!(options.demo);
        assert!(options.state_dir.is_none());
    }

    #[test]
    fn parses_positional_state_dir_with_durable_writes() {
        let options =
            parse_options(["some/dir".to_owned(), "--durable-writes".to_owned()].into_iter())
                .expect("parse options");
        assert_eq!(options.state_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
        assert!(!options.demo);
    }

    #[test]
    fn rejects_demo_with_state_dir() {
        parse_options(["--demo".to_owned(), "some/dir".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_flags_and_duplicates() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
        parse_options(["--demo".to_owned(), "--demo".to_owned()].into_iter()).unwrap_err();
        parse_options(
            ["--durable-writes".to_owned(), "--durable-writes".to_owned()].into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_state_dirs() {
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
    }
}
