//! Actor model
//!
//! An actor is keyed by its `name`; there is no separate id. The raw record
//! ([`ActorProfile`]) comes from the actor document, while `scenes` and `tags`
//! are attached by the loader's join step and are never part of the record.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw actor record as stored in the actor document
///
/// Every attribute other than `name` is optional. Scalar fields accept either
/// JSON strings or numbers (ratings are published both ways) and are kept as
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorProfile {
    /// Unique actor name (primary key)
    pub name: String,

    /// Star rating, e.g. "3"
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub star: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,

    /// Nationality
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,

    /// First character field
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub char1: Option<String>,

    /// Second character field
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub char2: Option<String>,

    /// Stat line shown in the detail rows
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub stat1: Option<String>,

    /// Free-text stat headline shown under the name
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub stat: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill3: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill4: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill5: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill6: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill1_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill2_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill3_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill4_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill5_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub skill6_desc: Option<String>,

    /// Partner field
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub fair_total: Option<String>,
}

impl ActorProfile {
    /// Create a profile with only a name set
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One numbered skill slot of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill<'a> {
    /// Slot number (1-6)
    pub number: u8,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Actor after the join: profile plus derived scene and tag associations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    #[serde(flatten)]
    pub profile: ActorProfile,

    /// Scenes associated with this actor (empty if the name had no entry)
    pub scenes: Vec<String>,

    /// Tags associated with this actor (empty if the name had no entry)
    pub tags: Vec<String>,
}

impl Actor {
    pub fn new(profile: ActorProfile, scenes: Vec<String>, tags: Vec<String>) -> Self {
        Self {
            profile,
            scenes,
            tags,
        }
    }

    /// Actor name (primary key)
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn has_scene(&self, scene: &str) -> bool {
        self.scenes.iter().any(|s| s == scene)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Star rating as a count
    ///
    /// Reads the leading digits of `star` ("4", " 3 ", "2.5" → 2). Returns
    /// `None` when the field is missing or does not start with a digit.
    pub fn star_rating(&self) -> Option<u32> {
        let star = self.profile.star.as_deref()?.trim();
        let digits: String = star.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    /// Skill slots that carry a name or a description, in slot order
    pub fn skills(&self) -> Vec<Skill<'_>> {
        let p = &self.profile;
        let slots = [
            (&p.skill1, &p.skill1_desc),
            (&p.skill2, &p.skill2_desc),
            (&p.skill3, &p.skill3_desc),
            (&p.skill4, &p.skill4_desc),
            (&p.skill5, &p.skill5_desc),
            (&p.skill6, &p.skill6_desc),
        ];

        slots
            .into_iter()
            .zip(1u8..)
            .filter_map(|((name, desc), number)| {
                let name = non_empty(name);
                let description = non_empty(desc);
                if name.is_none() && description.is_none() {
                    None
                } else {
                    Some(Skill {
                        number,
                        name,
                        description,
                    })
                }
            })
            .collect()
    }
}

/// Borrow an optional field, treating blank strings as absent
pub fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, found {}",
            other
        ))),
    }
}
