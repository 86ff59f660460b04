//! Selection building for the one-shot `list` command

use actorfinder_common::BrowseSession;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::warn;

/// Start from `preset` (if any), then add every requested scene and tag
///
/// Items are only ever added: repeating a flag, or naming an item the preset
/// already selected, leaves it selected.
pub async fn apply_filters(
    session: &BrowseSession,
    preset: Option<&str>,
    scenes: &[String],
    tags: &[String],
) -> Result<()> {
    if let Some(name) = preset {
        session
            .apply_preset_named(name)
            .await
            .with_context(|| format!("Unknown preset '{}'", name))?;
    }

    let known_scenes = session.scenes().await;
    let scenes: BTreeSet<&String> = scenes.iter().collect();
    for scene in scenes {
        if !known_scenes.contains(scene) {
            warn!("Scene '{}' does not occur in the catalog", scene);
        }
        if !session.selection().await.scenes.contains(scene) {
            session.toggle_scene(scene).await;
        }
    }

    let known_tags = session.tags().await;
    let tags: BTreeSet<&String> = tags.iter().collect();
    for tag in tags {
        if !known_tags.contains(tag) {
            warn!("Tag '{}' does not occur in the catalog", tag);
        }
        if !session.selection().await.tags.contains(tag) {
            session.toggle_tag(tag).await;
        }
    }

    Ok(())
}
