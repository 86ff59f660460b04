//! Raw shapes of the two static catalog documents
//!
//! - Actor document: `{ "actors": [ <ActorProfile>, ... ] }`
//! - Association document:
//!   `{ "actorscenes": { <name>: [scene, ...] }, "actorstags": { <name>: [tag, ...] } }`
//!
//! Both top-level keys of each document are required; a document missing
//! them fails to parse and aborts the load.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ActorProfile;

/// Actor document (records without scenes/tags)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActorDocument {
    pub actors: Vec<ActorProfile>,
}

/// Association document: per-actor scene and tag lists keyed by actor name
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssociationDocument {
    /// Actor name → scene names
    pub actorscenes: HashMap<String, Vec<String>>,

    /// Actor name → tag names
    pub actorstags: HashMap<String, Vec<String>>,
}
