//! Browse events and the EventBus
//!
//! The session store emits a [`BrowseEvent`] after every load transition and
//! every selection or view change. Presentation subscribes and re-reads the
//! ranked view when notified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Browse session events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BrowseEvent {
    /// Catalog load began
    LoadStarted {
        timestamp: DateTime<Utc>,
    },

    /// Catalog load completed and the catalog replaced any previous one
    CatalogLoaded {
        actor_count: usize,
        scene_count: usize,
        tag_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Catalog load failed; `message` is the user-facing text
    LoadFailed {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Scene/tag selection changed
    SelectionChanged {
        scenes: Vec<String>,
        tags: Vec<String>,
        /// Length of the ranked view after the change
        result_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Switched between list and detail view
    ViewChanged {
        /// Actor shown in the detail view (None = list view)
        actor: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast channel for browse events
///
/// Events emitted before a subscription are not received by it.
pub struct EventBus {
    tx: broadcast::Sender<BrowseEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BrowseEvent> {
        self.tx.subscribe()
    }

    /// Emit an event; `Err` when nobody is subscribed
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: BrowseEvent,
    ) -> Result<usize, broadcast::error::SendError<BrowseEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring a missing audience
    pub fn emit_lossy(&self, event: BrowseEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
