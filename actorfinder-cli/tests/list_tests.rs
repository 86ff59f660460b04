//! Integration tests for the one-shot `list` selection
//!
//! Tests cover:
//! - Repeated scene/tag flags select the item once
//! - Flags naming items the preset already selected keep them selected
//! - Unknown preset is an error

use actorfinder_cli::list::apply_filters;
use actorfinder_cli::render::render_list;
use actorfinder_common::{BrowseSession, DataLoader, DocumentSource};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const ACTORS_JSON: &str = r#"{
    "actors": [
        {"name": "A", "nat": "KR", "sex": "M"},
        {"name": "B", "nat": "JP", "sex": "F"}
    ]
}"#;

const ASSOCIATIONS_JSON: &str = r#"{
    "actorscenes": {"A": ["x", "범죄물"], "B": ["y"]},
    "actorstags": {"A": ["격투"]}
}"#;

async fn loaded_session(dir: &Path) -> BrowseSession {
    let actors_path = dir.join("actors.json");
    let associations_path = dir.join("scenesAndTags.json");
    std::fs::write(&actors_path, ACTORS_JSON).unwrap();
    std::fs::write(&associations_path, ASSOCIATIONS_JSON).unwrap();

    let loader = DataLoader::new(
        DocumentSource::File(actors_path),
        DocumentSource::File(associations_path),
        Duration::from_secs(5),
    )
    .unwrap();

    let session = BrowseSession::new();
    session.load(&loader).await;
    session
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_repeated_scene_flag_selects_once() {
    let dir = TempDir::new().unwrap();
    let session = loaded_session(dir.path()).await;

    apply_filters(&session, None, &strings(&["x", "x"]), &[])
        .await
        .unwrap();

    let view = session.ranked_view().await.unwrap();
    assert!(view.selection().scenes.contains("x"));
    assert_eq!(render_list(&view), "Filtered Actors (1)\n  [1] A  KR / M\n");
}

#[tokio::test]
async fn test_repeated_tag_flag_selects_once() {
    let dir = TempDir::new().unwrap();
    let session = loaded_session(dir.path()).await;

    apply_filters(&session, None, &[], &strings(&["격투", "격투", "격투"]))
        .await
        .unwrap();

    assert!(session.selection().await.tags.contains("격투"));
    assert_eq!(session.ranked_view().await.unwrap().rows().len(), 1);
}

#[tokio::test]
async fn test_flags_add_to_preset_without_toggling_off() {
    let dir = TempDir::new().unwrap();
    let session = loaded_session(dir.path()).await;

    apply_filters(
        &session,
        Some("Action Master"),
        &strings(&["범죄물", "y"]),
        &strings(&["격투"]),
    )
    .await
    .unwrap();

    let selection = session.selection().await;
    assert!(selection.scenes.contains("범죄물"));
    assert!(selection.scenes.contains("총격전"));
    assert!(selection.scenes.contains("y"));
    assert!(selection.tags.contains("격투"));

    let view = session.ranked_view().await.unwrap();
    let rows = view.rows();
    assert_eq!(rows[0].actor.name(), "A");
    assert_eq!(rows[0].score, 2);
    assert_eq!(rows[1].actor.name(), "B");
    assert_eq!(rows[1].score, 1);
}

#[tokio::test]
async fn test_unknown_preset_is_an_error() {
    let dir = TempDir::new().unwrap();
    let session = loaded_session(dir.path()).await;

    let err = apply_filters(&session, Some("Nothing Like It"), &[], &[])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Unknown preset 'Nothing Like It'"));
    assert!(!session.selection().await.is_active());
}
