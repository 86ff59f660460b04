//! Selection state controller
//!
//! Holds the selected scenes/tags and the drill-down view. Every operation is
//! a plain state transition: none can fail, none touches the catalog.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::presets::PresetLabel;

/// Selected scenes and tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub scenes: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl Selection {
    /// True when at least one scene or tag is selected
    pub fn is_active(&self) -> bool {
        !self.scenes.is_empty() || !self.tags.is_empty()
    }
}

/// Which view presentation shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "actor")]
pub enum ViewMode {
    /// Ranked, filtered list
    #[default]
    List,
    /// Detail view of one actor, by name
    Detail(String),
}

/// Owns the selection and the current view
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
    view: ViewMode,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    /// Add the scene if absent, remove it if present
    ///
    /// Returns whether the scene is selected afterwards.
    pub fn toggle_scene(&mut self, scene: &str) -> bool {
        toggle(&mut self.selection.scenes, scene)
    }

    /// Add the tag if absent, remove it if present
    ///
    /// Returns whether the tag is selected afterwards.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        toggle(&mut self.selection.tags, tag)
    }

    /// Replace the selection with the preset's scenes and tags
    pub fn apply_preset(&mut self, label: &PresetLabel) {
        self.selection.scenes = label.scenes.clone();
        self.selection.tags = label.tags.clone();
    }

    /// Clear both selection sets; the view is left alone
    pub fn reset(&mut self) {
        self.selection.scenes.clear();
        self.selection.tags.clear();
    }

    /// Switch to the detail view for the named actor
    pub fn select_actor(&mut self, name: &str) {
        self.view = ViewMode::Detail(name.to_string());
    }

    /// Return to the list view
    pub fn clear_selected_actor(&mut self) {
        self.view = ViewMode::List;
    }

    /// Name of the actor in the detail view, if any
    pub fn selected_actor(&self) -> Option<&str> {
        match &self.view {
            ViewMode::Detail(name) => Some(name),
            ViewMode::List => None,
        }
    }
}

fn toggle(set: &mut BTreeSet<String>, item: &str) -> bool {
    if set.remove(item) {
        false
    } else {
        set.insert(item.to_string());
        true
    }
}
