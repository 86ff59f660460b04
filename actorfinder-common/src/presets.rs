//! Preset labels
//!
//! A fixed, compiled-in catalog of named scene/tag bundles. The first entry is
//! the "no preset chosen" placeholder with empty sets; it is a choice of its
//! own and not the same operation as resetting the filters.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeSet;

/// Named bundle of scenes and tags applied in one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetLabel {
    pub name: String,
    pub scenes: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl PresetLabel {
    pub fn new(name: &str, scenes: &[&str], tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            scenes: scenes.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// True for the "no preset chosen" sentinel
    pub fn is_placeholder(&self) -> bool {
        self.scenes.is_empty() && self.tags.is_empty()
    }
}

/// Name of the placeholder entry
pub const PLACEHOLDER_NAME: &str = "라벨 선택...";

static CATALOG: Lazy<Vec<PresetLabel>> = Lazy::new(|| {
    vec![
        PresetLabel::new(PLACEHOLDER_NAME, &[], &[]),
        PresetLabel::new(
            "액션 마스터 (Action Master)",
            &["범죄물", "총격전", "어드벤처물"],
            &["격투", "경찰", "터프가이", "군인"],
        ),
        PresetLabel::new(
            "로맨스 장인 (Romance Expert)",
            &["로맨스", "드라마물", "현대물"],
            &["일편단심", "비쥬얼", "청춘", "순수"],
        ),
        PresetLabel::new(
            "사극 전문가 (Historical Drama Expert)",
            &["사극물", "궁궐", "역사"],
            &["귀족", "협객", "리더"],
        ),
        PresetLabel::new(
            "코미디 킹 (Comedy King)",
            &["드라마물"],
            &["코믹", "입담", "몰상식"],
        ),
        PresetLabel::new(
            "SF/판타지 전문 (Sci-Fi/Fantasy Specialist)",
            &["SF물", "판타지물", "우주", "타임슬립"],
            &["초능력", "영웅", "천재"],
        ),
    ]
});

/// The full preset catalog, placeholder first
pub fn catalog() -> &'static [PresetLabel] {
    &CATALOG
}

/// The placeholder entry
pub fn placeholder() -> &'static PresetLabel {
    &CATALOG[0]
}

/// Find a preset by name
///
/// Matches the full label name exactly, or case-insensitively against the
/// label name or the parenthesized English alias ("action master").
pub fn find(name: &str) -> Option<&'static PresetLabel> {
    let wanted = name.trim();
    if let Some(label) = CATALOG.iter().find(|l| l.name == wanted) {
        return Some(label);
    }

    let wanted = wanted.to_lowercase();
    CATALOG.iter().find(|label| {
        label.name.to_lowercase() == wanted
            || english_alias(&label.name).is_some_and(|alias| alias.to_lowercase() == wanted)
    })
}

fn english_alias(name: &str) -> Option<&str> {
    let start = name.rfind('(')?;
    let end = name.rfind(')')?;
    (end > start + 1).then(|| &name[start + 1..end])
}
