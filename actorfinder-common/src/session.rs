//! Browse session store
//!
//! Ties the loader, the selection controller and the ranking engine
//! together. The session owns the load state and the selection; the ranked
//! view is never stored and is recomputed from both whenever it is read.
//!
//! Loads are serialized: a load requested while another is in flight is
//! ignored and reported as [`LoadOutcome::AlreadyLoading`].

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info};

use crate::events::{BrowseEvent, EventBus};
use crate::loader::{Catalog, DataLoader, LoadError};
use crate::model::Actor;
use crate::presets::{self, PresetLabel};
use crate::ranking::{rank, RankedActor};
use crate::selection::{Selection, SelectionController, ViewMode};
use crate::{Error, Result};

/// Catalog lifecycle
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// No load requested yet
    #[default]
    Idle,
    /// Fetch in flight; no catalog is exposed
    Loading,
    /// Catalog available
    Ready(Arc<Catalog>),
    /// Last load failed; holds the user-facing message
    Failed(String),
}

/// Result of a [`BrowseSession::load`] request
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded { actor_count: usize },
    Failed(LoadError),
    /// Another load was already running; nothing was fetched
    AlreadyLoading,
}

/// Ranked view over a catalog snapshot and a selection snapshot
#[derive(Debug, Clone)]
pub struct RankedView {
    catalog: Arc<Catalog>,
    selection: Selection,
}

impl RankedView {
    pub fn new(catalog: Arc<Catalog>, selection: Selection) -> Self {
        Self { catalog, selection }
    }

    /// Ranked rows for the snapshot
    pub fn rows(&self) -> Vec<RankedActor<'_>> {
        rank(
            self.catalog.actors(),
            &self.selection.scenes,
            &self.selection.tags,
        )
    }

    /// True when scores are meaningful (some scene or tag selected)
    pub fn filter_active(&self) -> bool {
        self.selection.is_active()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Clears the in-flight flag even if the load future is dropped
struct LoadGuard<'a>(&'a AtomicBool);

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session state shared with presentation
pub struct BrowseSession {
    load_state: RwLock<LoadState>,
    controller: RwLock<SelectionController>,
    loading: AtomicBool,
    events: EventBus,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::with_event_capacity(64)
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            load_state: RwLock::new(LoadState::Idle),
            controller: RwLock::new(SelectionController::new()),
            loading: AtomicBool::new(false),
            events: EventBus::new(capacity),
        }
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<BrowseEvent> {
        self.events.subscribe()
    }

    /// Load (or reload) the catalog
    ///
    /// On failure the previous catalog is dropped and the session enters
    /// [`LoadState::Failed`]; nothing partial is exposed.
    pub async fn load(&self, loader: &DataLoader) -> LoadOutcome {
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Load already in flight, ignoring request");
            return LoadOutcome::AlreadyLoading;
        }
        let _guard = LoadGuard(&self.loading);

        *self.load_state.write().await = LoadState::Loading;
        self.events.emit_lossy(BrowseEvent::LoadStarted {
            timestamp: Utc::now(),
        });

        match loader.load().await {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                let actor_count = catalog.len();

                {
                    let mut controller = self.controller.write().await;
                    let stale = controller
                        .selected_actor()
                        .is_some_and(|name| catalog.find(name).is_none());
                    if stale {
                        info!("Selected actor not in reloaded catalog, returning to list");
                        controller.clear_selected_actor();
                    }
                }

                let scene_count = catalog.scenes().len();
                let tag_count = catalog.tags().len();
                *self.load_state.write().await = LoadState::Ready(catalog);
                self.events.emit_lossy(BrowseEvent::CatalogLoaded {
                    actor_count,
                    scene_count,
                    tag_count,
                    timestamp: Utc::now(),
                });

                LoadOutcome::Loaded { actor_count }
            }
            Err(e) => {
                error!("Error loading actor data: {}", e);
                let message = e.user_message().to_string();
                *self.load_state.write().await = LoadState::Failed(message.clone());
                self.events.emit_lossy(BrowseEvent::LoadFailed {
                    message,
                    timestamp: Utc::now(),
                });

                LoadOutcome::Failed(e)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn load_state(&self) -> LoadState {
        self.load_state.read().await.clone()
    }

    /// Current catalog, if the last load succeeded
    pub async fn catalog(&self) -> Option<Arc<Catalog>> {
        match &*self.load_state.read().await {
            LoadState::Ready(catalog) => Some(Arc::clone(catalog)),
            _ => None,
        }
    }

    /// Scene vocabulary of the loaded catalog; empty when nothing is loaded
    pub async fn scenes(&self) -> Vec<String> {
        self.catalog()
            .await
            .map(|catalog| catalog.scenes().to_vec())
            .unwrap_or_default()
    }

    /// Tag vocabulary of the loaded catalog; empty when nothing is loaded
    pub async fn tags(&self) -> Vec<String> {
        self.catalog()
            .await
            .map(|catalog| catalog.tags().to_vec())
            .unwrap_or_default()
    }

    pub async fn selection(&self) -> Selection {
        self.controller.read().await.selection().clone()
    }

    pub async fn view(&self) -> ViewMode {
        self.controller.read().await.view().clone()
    }

    /// Ranked view for the current catalog and selection
    pub async fn ranked_view(&self) -> Option<RankedView> {
        let catalog = self.catalog().await?;
        let selection = self.selection().await;
        Some(RankedView::new(catalog, selection))
    }

    pub async fn toggle_scene(&self, scene: &str) -> bool {
        let selected = self.controller.write().await.toggle_scene(scene);
        debug!(scene = %scene, selected, "Scene toggled");
        self.emit_selection_changed().await;
        selected
    }

    pub async fn toggle_tag(&self, tag: &str) -> bool {
        let selected = self.controller.write().await.toggle_tag(tag);
        debug!(tag = %tag, selected, "Tag toggled");
        self.emit_selection_changed().await;
        selected
    }

    /// Replace the selection with a preset
    pub async fn apply_preset(&self, label: &PresetLabel) {
        self.controller.write().await.apply_preset(label);
        debug!(preset = %label.name, "Preset applied");
        self.emit_selection_changed().await;
    }

    /// Look a preset up by name and apply it
    pub async fn apply_preset_named(&self, name: &str) -> Result<&'static PresetLabel> {
        let label = presets::find(name)
            .ok_or_else(|| Error::NotFound(format!("preset '{}'", name)))?;
        self.apply_preset(label).await;
        Ok(label)
    }

    /// Clear scene and tag selections
    pub async fn reset(&self) {
        self.controller.write().await.reset();
        self.emit_selection_changed().await;
    }

    /// Open the detail view for the named actor
    pub async fn select_actor(&self, name: &str) -> Result<Actor> {
        let catalog = self
            .catalog()
            .await
            .ok_or_else(|| Error::NotFound("catalog not loaded".to_string()))?;
        let actor = catalog
            .find(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("actor '{}'", name)))?;

        self.controller.write().await.select_actor(actor.name());
        self.events.emit_lossy(BrowseEvent::ViewChanged {
            actor: Some(actor.name().to_string()),
            timestamp: Utc::now(),
        });
        Ok(actor)
    }

    /// Return to the list view
    pub async fn clear_selected_actor(&self) {
        self.controller.write().await.clear_selected_actor();
        self.events.emit_lossy(BrowseEvent::ViewChanged {
            actor: None,
            timestamp: Utc::now(),
        });
    }

    /// Actor shown in the detail view, if any
    pub async fn selected_actor(&self) -> Option<Actor> {
        let name = self.controller.read().await.selected_actor()?.to_string();
        self.catalog().await?.find(&name).cloned()
    }

    async fn emit_selection_changed(&self) {
        let selection = self.selection().await;
        let result_count = match self.catalog().await {
            Some(catalog) => rank(catalog.actors(), &selection.scenes, &selection.tags).len(),
            None => 0,
        };

        self.events.emit_lossy(BrowseEvent::SelectionChanged {
            scenes: selection.scenes.into_iter().collect(),
            tags: selection.tags.into_iter().collect(),
            result_count,
            timestamp: Utc::now(),
        });
    }
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActorProfile;

    fn actor(name: &str, scenes: &[&str], tags: &[&str]) -> Actor {
        Actor::new(
            ActorProfile::named(name),
            scenes.iter().map(|s| s.to_string()).collect(),
            tags.iter().map(|t| t.to_string()).collect(),
        )
    }

    async fn ready_session() -> BrowseSession {
        let session = BrowseSession::new();
        let catalog = Catalog::from_actors(vec![
            actor("A", &["x"], &[]),
            actor("B", &["x", "y"], &["brave"]),
            actor("C", &[], &[]),
        ]);
        *session.load_state.write().await = LoadState::Ready(Arc::new(catalog));
        session
    }

    fn names(view: &RankedView) -> Vec<String> {
        view.rows().iter().map(|r| r.actor.name().to_string()).collect()
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let session = BrowseSession::new();
        assert!(matches!(session.load_state().await, LoadState::Idle));
        assert!(session.catalog().await.is_none());
        assert!(session.ranked_view().await.is_none());
        assert_eq!(session.view().await, ViewMode::List);
        assert!(session.scenes().await.is_empty());
    }

    #[tokio::test]
    async fn test_vocabulary_accessors() {
        let session = ready_session().await;
        assert_eq!(session.scenes().await, vec!["x", "y"]);
        assert_eq!(session.tags().await, vec!["brave"]);
    }

    #[tokio::test]
    async fn test_ranked_view_follows_selection() {
        let session = ready_session().await;

        let view = session.ranked_view().await.unwrap();
        assert_eq!(names(&view), vec!["A", "B", "C"]);
        assert!(!view.filter_active());

        session.toggle_scene("x").await;
        assert_eq!(names(&session.ranked_view().await.unwrap()), vec!["A", "B"]);

        session.toggle_tag("brave").await;
        let view = session.ranked_view().await.unwrap();
        assert_eq!(names(&view), vec!["B", "A"]);
        assert!(view.filter_active());
    }

    #[tokio::test]
    async fn test_selection_changed_event_reports_result_count() {
        let session = ready_session().await;
        let mut rx = session.subscribe();

        session.toggle_scene("y").await;

        match rx.recv().await.unwrap() {
            BrowseEvent::SelectionChanged {
                scenes,
                result_count,
                ..
            } => {
                assert_eq!(scenes, vec!["y"]);
                assert_eq!(result_count, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_preset_then_reset() {
        let session = ready_session().await;
        session.toggle_scene("x").await;

        let label = session.apply_preset_named("Comedy King").await.unwrap();
        let selection = session.selection().await;
        assert_eq!(selection.scenes, label.scenes);
        assert_eq!(selection.tags, label.tags);
        assert!(session.ranked_view().await.unwrap().rows().is_empty());

        session.reset().await;
        assert!(!session.selection().await.is_active());
    }

    #[tokio::test]
    async fn test_unknown_preset_is_not_found() {
        let session = ready_session().await;
        let result = session.apply_preset_named("Nope").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_select_actor_switches_view() {
        let session = ready_session().await;
        session.toggle_scene("x").await;

        let actor = session.select_actor("B").await.unwrap();
        assert_eq!(actor.name(), "B");
        assert_eq!(session.view().await, ViewMode::Detail("B".to_string()));
        assert_eq!(session.selected_actor().await.unwrap().name(), "B");
        assert!(session.selection().await.scenes.contains("x"));

        session.clear_selected_actor().await;
        assert_eq!(session.view().await, ViewMode::List);
        assert!(session.selected_actor().await.is_none());
    }

    #[tokio::test]
    async fn test_select_unknown_actor_fails() {
        let session = ready_session().await;
        assert!(matches!(
            session.select_actor("Nobody").await,
            Err(Error::NotFound(_))
        ));
        assert_eq!(session.view().await, ViewMode::List);

        let empty = BrowseSession::new();
        assert!(empty.select_actor("A").await.is_err());
    }

    #[test]
    fn test_load_guard_clears_flag() {
        let flag = AtomicBool::new(true);
        {
            let _guard = LoadGuard(&flag);
        }
        assert!(!flag.load(Ordering::Acquire));
    }
}
