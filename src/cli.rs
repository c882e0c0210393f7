//! Command-line front end.
//!
//! Loads the config, starts logging, and runs one subcommand against a fresh
//! [`AppState`]. Results go to stdout as JSON; failures are printed as toasts.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::commands;
use crate::config;
use crate::editor::Debouncer;
use crate::error::AppError;
use crate::gallery::{GalleryClient, Toast};
use crate::logging;
use crate::models::MediaFile;
use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
    name = "mediagallery",
    version,
    about = "Media gallery client and headless image-edit session"
)]
struct Cli {
    /// Config file; defaults to the OS config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lists the files and subfolders of a gallery folder.
    List {
        folder: String,
    },
    /// Deletes media files. Each argument is a JSON file holding one file
    /// descriptor or an array of them.
    Delete {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    Prefs {
        #[command(subcommand)]
        command: PrefsCommand,
    },
    /// Runs a scripted edit session on an in-memory scene and prints its
    /// history as JSON.
    Demo,
}

#[derive(Debug, Subcommand)]
enum PrefsCommand {
    Show,
    /// Stores a `view/grid/table` value, e.g. `table/medium/small`.
    Set {
        value: String,
    },
}

pub async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(config::default_path);
    let cfg = config::load(&config_path)?;
    let _log_guard = logging::init(&cfg.logging)?;
    tracing::info!(config = %config_path.display(), "mediagallery starting");

    let state = AppState::new(cfg);

    match cli.command {
        Commands::List { folder } => {
            let client = GalleryClient::new(&state.config.api)?;
            let contents =
                commands::gallery::list_folder(&client, &state.folder_loads, &folder, true).await;
            match contents {
                Ok(Some(contents)) => print_json(&contents)?,
                Ok(None) => {}
                Err(e) => return Err(report(e)),
            }
        }
        Commands::Delete { files } => {
            let media = read_descriptors(&files)?;
            let client = GalleryClient::new(&state.config.api)?;
            let outcome = commands::gallery::delete_files(&client, &state.folder_loads, &media)
                .await
                .map_err(report)?;
            print_json(&outcome)?;
            eprintln!("{}", outcome.toast());
        }
        Commands::Prefs { command } => match command {
            PrefsCommand::Show => {
                let prefs = commands::preferences::load_preferences(&state)?;
                println!("{prefs}");
            }
            PrefsCommand::Set { value } => {
                let prefs = commands::preferences::set_preferences(&value, &state)?;
                println!("{prefs}");
            }
        },
        Commands::Demo => {
            let summary = run_demo(&state).await?;
            print_json(&summary)?;
        }
    }

    Ok(())
}

/// Print the toast for `e` and hand the error back.
fn report(e: AppError) -> AppError {
    eprintln!("{}", Toast::from(&e));
    e
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn read_descriptors(paths: &[PathBuf]) -> Result<Vec<MediaFile>, AppError> {
    let mut media = Vec::new();
    for path in paths {
        media.extend(read_descriptor_file(path)?);
    }
    Ok(media)
}

fn read_descriptor_file(path: &Path) -> Result<Vec<MediaFile>, AppError> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| AppError::InvalidInput(format!("{}: {e}", path.display())))?;
    let parsed = if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|one| vec![one])
    };
    parsed.map_err(|e| AppError::InvalidInput(format!("{}: {e}", path.display())))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoSummary {
    session: commands::session::SessionView,
    cache_refreshes: usize,
    scene: serde_json::Value,
}

/// Scripted session: crop (applied), annotate (cancelled), one attribute
/// edit undone on the action track, one snapshot undo, and a burst of drag
/// events collapsed by the debouncer.
async fn run_demo(state: &AppState) -> Result<DemoSummary, AppError> {
    use commands::session as s;

    let file: MediaFile = serde_json::from_value(json!({
        "id": "demo",
        "filename": "harbor.jpg",
        "mimeType": "image/jpeg",
        "width": 1600,
        "height": 900
    }))
    .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let view = s::open_session(s::OpenSessionInput { file, scene: None }, state)?;
    let id = view.id;

    s::set_active_tool(&id, "crop", state)?;
    s::add_node(&id, "cropOverlay", "Rect", state)?;
    s::add_node(&id, "croppedImage", "Image", state)?;
    s::apply_active_tool(&id, state)?;

    s::set_active_tool(&id, "annotate", state)?;
    s::add_node(&id, "annotationDraft", "Line", state)?;
    s::cancel_active_tool(&id, state)?;

    let arrow = s::add_node(&id, "annotation", "Arrow", state)?;
    s::set_node_attr(&id, arrow, "x", json!(120), state)?;
    s::set_node_attr(&id, arrow, "x", json!(240), state)?;
    s::undo(&id, state)?;
    s::take_snapshot(&id, state)?;
    s::undo_state(&id, false, state)?;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(state.config.editor.debounce());
    for _ in 0..5 {
        let refreshes = Arc::clone(&refreshes);
        debouncer.trigger(move || {
            refreshes.fetch_add(1, Ordering::SeqCst);
        });
    }
    tokio::time::sleep(debouncer.delay() * 2).await;

    let scene_json = s::export_scene(&id, state)?;
    let scene: serde_json::Value =
        serde_json::from_str(&scene_json).map_err(|e| AppError::Scene(e.to_string()))?;
    let session = s::get_session_snapshot(&id, state)?;
    s::close_session(&id, state)?;

    Ok(DemoSummary {
        session,
        cache_refreshes: refreshes.load(Ordering::SeqCst),
        scene,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["mediagallery", "prefs", "set", "table/large/tiny"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Prefs { command: PrefsCommand::Set { ref value } } if value == "table/large/tiny"
        ));

        let cli = Cli::try_parse_from(["mediagallery", "--config", "/tmp/c.toml", "list", "root"])
            .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::List { ref folder } if folder == "root"));
    }

    #[test]
    fn delete_requires_files() {
        assert!(Cli::try_parse_from(["mediagallery", "delete"]).is_err());
    }

    #[test]
    fn descriptor_files_accept_object_or_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let one = dir.path().join("one.json");
        let many = dir.path().join("many.json");
        std::fs::write(&one, r#"{ "_id": "a", "name": "a.jpg" }"#).expect("write");
        std::fs::write(
            &many,
            r#"[{ "id": "b", "filename": "b.jpg" }, { "id": "c", "filename": "c.png" }]"#,
        )
        .expect("write");

        let media = read_descriptors(&[one, many]).expect("read");
        let ids: Vec<&str> = media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn bad_descriptor_is_invalid_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "nope": true }"#).expect("write");
        assert!(matches!(
            read_descriptors(&[path]),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn demo_runs_end_to_end() {
        let summary = run_demo(&AppState::default()).await.expect("demo");
        assert_eq!(summary.cache_refreshes, 1);
        assert!(summary.session.active_tool.is_none());
        // base, crop applied, manual snapshot; cursor moved back once
        assert_eq!(summary.session.state_count, 3);
        assert_eq!(summary.session.state_cursor, 1);
        assert_eq!(summary.session.actions.len(), 2);
        assert!(summary.session.can_redo);
        assert!(summary.scene.get("nodes").is_some());
    }
}
