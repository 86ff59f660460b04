//! Data loader: fetch both catalog documents and join them
//!
//! The actor document and the association document are fetched concurrently.
//! Either fetch failing (transport error, non-success status, unreadable
//! file, timeout) or either body failing to parse aborts the whole load with
//! a single [`LoadError`]; there is no partial catalog and no retry.
//!
//! The join looks each actor name up in a name-keyed map built once from the
//! association document. Names without an entry get empty scene/tag lists,
//! and map entries without a matching actor are ignored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::documents::{ActorDocument, AssociationDocument};
use crate::model::Actor;
use crate::{Error, Result};

const USER_AGENT: &str = concat!("actorfinder/", env!("CARGO_PKG_VERSION"));

/// Default fetch timeout applied to each document
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Which of the two catalog documents an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Actors,
    Associations,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Actors => write!(f, "actor"),
            DocumentKind::Associations => write!(f, "association"),
        }
    }
}

/// Catalog load errors
///
/// Every variant is terminal for the load that produced it.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Network communication error
    #[error("Failed to fetch {document} document from {location}: {reason}")]
    Transport {
        document: DocumentKind,
        location: String,
        reason: String,
    },

    /// Server answered with a non-success status
    #[error("{document} document at {location} returned HTTP {status}")]
    Status {
        document: DocumentKind,
        location: String,
        status: u16,
    },

    /// Local document could not be read
    #[error("Failed to read {document} document {location}: {reason}")]
    Io {
        document: DocumentKind,
        location: String,
        reason: String,
    },

    /// Body is not valid JSON of the expected shape
    #[error("Failed to parse {document} document from {location}: {reason}")]
    Parse {
        document: DocumentKind,
        location: String,
        reason: String,
    },

    /// Fetch did not complete within the configured timeout
    #[error("Timed out fetching {document} document from {location}")]
    Timeout {
        document: DocumentKind,
        location: String,
    },
}

impl LoadError {
    /// Document the failure refers to
    pub fn document(&self) -> DocumentKind {
        match self {
            LoadError::Transport { document, .. }
            | LoadError::Status { document, .. }
            | LoadError::Io { document, .. }
            | LoadError::Parse { document, .. }
            | LoadError::Timeout { document, .. } => *document,
        }
    }

    /// Single message shown to the user for any load failure
    pub fn user_message(&self) -> &'static str {
        "Failed to load actor data. Please try refreshing."
    }
}

/// Location of one catalog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Fetched with HTTP(S) GET
    Http(String),
    /// Read from the local filesystem
    File(PathBuf),
}

impl FromStr for DocumentSource {
    type Err = Error;

    /// `http://` and `https://` select HTTP; `file://` or a bare path selects
    /// the filesystem.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidInput("empty document source".to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(DocumentSource::Http(s.to_string()));
        }

        if let Some(path) = s.strip_prefix("file://") {
            if path.is_empty() {
                return Err(Error::InvalidInput(format!("missing path in '{}'", s)));
            }
            return Ok(DocumentSource::File(PathBuf::from(path)));
        }

        if lower.contains("://") {
            return Err(Error::InvalidInput(format!(
                "unsupported document source scheme: {}",
                s
            )));
        }

        Ok(DocumentSource::File(PathBuf::from(s)))
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Http(url) => write!(f, "{}", url),
            DocumentSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Merged, read-only catalog: joined actors plus the derived vocabulary
#[derive(Debug, Clone)]
pub struct Catalog {
    actors: Vec<Actor>,
    index: HashMap<String, usize>,
    scenes: Vec<String>,
    tags: Vec<String>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Join the actor records with the association maps
    pub fn from_documents(actor_doc: ActorDocument, associations: AssociationDocument) -> Self {
        let AssociationDocument {
            actorscenes,
            actorstags,
        } = associations;

        let actors: Vec<Actor> = actor_doc
            .actors
            .into_iter()
            .map(|profile| {
                let scenes = actorscenes.get(&profile.name).cloned().unwrap_or_default();
                let tags = actorstags.get(&profile.name).cloned().unwrap_or_default();
                Actor::new(profile, scenes, tags)
            })
            .collect();

        let catalog = Self::from_actors(actors);

        for name in actorscenes.keys().chain(actorstags.keys()) {
            if catalog.find(name).is_none() {
                debug!(actor = %name, "Association entry has no matching actor record");
            }
        }

        catalog
    }

    /// Build a catalog from already-joined actors, deriving the vocabulary
    ///
    /// Names are the primary key: a later record repeating a name is dropped.
    pub fn from_actors(records: Vec<Actor>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        let mut actors = Vec::with_capacity(records.len());
        for actor in records {
            if index.contains_key(actor.name()) {
                warn!(actor = %actor.name(), "Duplicate actor name, keeping first record");
                continue;
            }
            index.insert(actor.name().to_string(), actors.len());
            actors.push(actor);
        }

        let (scenes, tags) = vocabulary(&actors);

        Self {
            actors,
            index,
            scenes,
            tags,
            loaded_at: Utc::now(),
        }
    }

    /// Joined actors in document order
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// All distinct scenes, sorted ascending
    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    /// All distinct tags, sorted ascending
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Look up an actor by name
    pub fn find(&self, name: &str) -> Option<&Actor> {
        self.index.get(name).map(|&i| &self.actors[i])
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// When the catalog was assembled
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Sorted, deduplicated union of every actor's scenes and tags
pub fn vocabulary(actors: &[Actor]) -> (Vec<String>, Vec<String>) {
    let mut scenes = BTreeSet::new();
    let mut tags = BTreeSet::new();

    for actor in actors {
        scenes.extend(actor.scenes.iter().cloned());
        tags.extend(actor.tags.iter().cloned());
    }

    (scenes.into_iter().collect(), tags.into_iter().collect())
}

/// Catalog loader for one pair of document sources
pub struct DataLoader {
    http_client: reqwest::Client,
    actors: DocumentSource,
    associations: DocumentSource,
    timeout: Duration,
}

impl DataLoader {
    /// Create a loader with the given sources and per-document timeout
    pub fn new(
        actors: DocumentSource,
        associations: DocumentSource,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            actors,
            associations,
            timeout,
        })
    }

    pub fn actors_source(&self) -> &DocumentSource {
        &self.actors
    }

    pub fn associations_source(&self) -> &DocumentSource {
        &self.associations
    }

    /// Fetch both documents concurrently and join them into a catalog
    ///
    /// Safe to call again after a failure; with unchanged documents the
    /// result is the same.
    pub async fn load(&self) -> std::result::Result<Catalog, LoadError> {
        debug!(
            actors = %self.actors,
            associations = %self.associations,
            "Loading catalog documents"
        );

        let (actor_doc, associations) = tokio::try_join!(
            self.fetch::<ActorDocument>(DocumentKind::Actors, &self.actors),
            self.fetch::<AssociationDocument>(DocumentKind::Associations, &self.associations),
        )?;

        let catalog = Catalog::from_documents(actor_doc, associations);

        info!(
            actors = catalog.len(),
            scenes = catalog.scenes().len(),
            tags = catalog.tags().len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        document: DocumentKind,
        source: &DocumentSource,
    ) -> std::result::Result<T, LoadError> {
        let location = source.to_string();

        let body = match source {
            DocumentSource::Http(url) => self.fetch_http(document, url).await?,
            DocumentSource::File(path) => {
                match tokio::time::timeout(self.timeout, tokio::fs::read(path)).await {
                    Ok(Ok(bytes)) => bytes,
                    Ok(Err(e)) => {
                        return Err(LoadError::Io {
                            document,
                            location,
                            reason: e.to_string(),
                        })
                    }
                    Err(_) => return Err(LoadError::Timeout { document, location }),
                }
            }
        };

        serde_json::from_slice(&body).map_err(|e| LoadError::Parse {
            document,
            location,
            reason: e.to_string(),
        })
    }

    async fn fetch_http(
        &self,
        document: DocumentKind,
        url: &str,
    ) -> std::result::Result<Vec<u8>, LoadError> {
        let transport_error = |e: reqwest::Error| {
            if e.is_timeout() {
                LoadError::Timeout {
                    document,
                    location: url.to_string(),
                }
            } else {
                LoadError::Transport {
                    document,
                    location: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        debug!(url = %url, document = %document, "Fetching document");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                document,
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActorProfile;

    fn association_doc(
        scenes: &[(&str, &[&str])],
        tags: &[(&str, &[&str])],
    ) -> AssociationDocument {
        let to_map = |entries: &[(&str, &[&str])]| {
            entries
                .iter()
                .map(|(name, items)| {
                    (
                        name.to_string(),
                        items.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect()
        };
        AssociationDocument {
            actorscenes: to_map(scenes),
            actorstags: to_map(tags),
        }
    }

    #[test]
    fn test_document_source_parsing() {
        assert_eq!(
            "https://example.com/data/actors.json".parse::<DocumentSource>().unwrap(),
            DocumentSource::Http("https://example.com/data/actors.json".to_string())
        );
        assert_eq!(
            "file:///srv/actors.json".parse::<DocumentSource>().unwrap(),
            DocumentSource::File(PathBuf::from("/srv/actors.json"))
        );
        assert_eq!(
            "data/actors.json".parse::<DocumentSource>().unwrap(),
            DocumentSource::File(PathBuf::from("data/actors.json"))
        );
        assert!("".parse::<DocumentSource>().is_err());
        assert!("ftp://host/actors.json".parse::<DocumentSource>().is_err());
        assert!("file://".parse::<DocumentSource>().is_err());
    }

    #[test]
    fn test_join_attaches_associations_or_empty() {
        let actor_doc = ActorDocument {
            actors: vec![ActorProfile::named("A"), ActorProfile::named("B")],
        };
        let associations = association_doc(&[("A", &["x", "y"])], &[("B", &["t"])]);

        let catalog = Catalog::from_documents(actor_doc, associations);

        let a = catalog.find("A").unwrap();
        assert_eq!(a.scenes, vec!["x", "y"]);
        assert!(a.tags.is_empty());

        let b = catalog.find("B").unwrap();
        assert!(b.scenes.is_empty());
        assert_eq!(b.tags, vec!["t"]);
    }

    #[test]
    fn test_join_ignores_orphaned_association_entries() {
        let actor_doc = ActorDocument {
            actors: vec![ActorProfile::named("A")],
        };
        let associations = association_doc(&[("Ghost", &["haunted"])], &[("Ghost", &["spooky"])]);

        let catalog = Catalog::from_documents(actor_doc, associations);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.scenes().is_empty());
        assert!(catalog.tags().is_empty());
        assert!(catalog.find("Ghost").is_none());
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let actors = vec![
            Actor::new(
                ActorProfile::named("A"),
                vec!["romance".into(), "action".into()],
                vec!["hero".into()],
            ),
            Actor::new(
                ActorProfile::named("B"),
                vec!["action".into(), "drama".into()],
                vec!["villain".into(), "hero".into()],
            ),
            Actor::new(ActorProfile::named("C"), vec![], vec![]),
        ];

        let (scenes, tags) = vocabulary(&actors);

        assert_eq!(scenes, vec!["action", "drama", "romance"]);
        assert_eq!(tags, vec!["hero", "villain"]);
    }

    #[test]
    fn test_catalog_keeps_document_order() {
        let catalog = Catalog::from_actors(vec![
            Actor::new(ActorProfile::named("Zed"), vec![], vec![]),
            Actor::new(ActorProfile::named("Amy"), vec![], vec![]),
        ]);

        let names: Vec<&str> = catalog.actors().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
        assert_eq!(catalog.find("Amy").unwrap().name(), "Amy");
    }

    #[test]
    fn test_duplicate_names_keep_first_record() {
        let mut first = ActorProfile::named("A");
        first.nat = Some("KR".to_string());
        let mut second = ActorProfile::named("A");
        second.nat = Some("JP".to_string());
        let actor_doc = ActorDocument {
            actors: vec![first, ActorProfile::named("B"), second],
        };
        let associations = association_doc(&[("A", &["x"]), ("B", &["x"])], &[]);

        let catalog = Catalog::from_documents(actor_doc, associations);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.find("A").unwrap().profile.nat.as_deref(), Some("KR"));
        assert_eq!(catalog.find("B").unwrap().name(), "B");

        let scenes: BTreeSet<String> = ["x".to_string()].into_iter().collect();
        let rows = crate::ranking::rank(catalog.actors(), &scenes, &BTreeSet::new());
        let names: Vec<&str> = rows.iter().map(|r| r.actor.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_load_error_user_message_is_uniform() {
        let status = LoadError::Status {
            document: DocumentKind::Associations,
            location: "http://localhost/x".to_string(),
            status: 404,
        };
        let parse = LoadError::Parse {
            document: DocumentKind::Actors,
            location: "a.json".to_string(),
            reason: "eof".to_string(),
        };

        assert_eq!(status.user_message(), parse.user_message());
        assert_eq!(status.document(), DocumentKind::Associations);
        assert!(status.to_string().contains("404"));
    }
}
