//! # Actor Finder Common Library
//!
//! Shared code for the Actor Finder tools including:
//! - Actor model and raw document shapes
//! - Data loading and the name-keyed join
//! - Ranking of actors against a scene/tag selection
//! - Selection state, preset labels and the browse session store
//! - Event types (BrowseEvent enum)
//! - Configuration loading

pub mod config;
pub mod documents;
pub mod error;
pub mod events;
pub mod loader;
pub mod model;
pub mod presets;
pub mod ranking;
pub mod selection;
pub mod session;

pub use error::{Error, Result};
pub use loader::{Catalog, DataLoader, DocumentSource, LoadError};
pub use model::Actor;
pub use presets::PresetLabel;
pub use ranking::{rank, RankedActor};
pub use selection::{Selection, SelectionController, ViewMode};
pub use session::{BrowseSession, LoadOutcome, LoadState};
