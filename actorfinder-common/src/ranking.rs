//! Filter/scoring engine
//!
//! Pure ranking of actors against a scene/tag selection:
//!
//! - Empty selection: every actor, score 0, ordered by name.
//! - Otherwise: score = matched scenes + matched tags; actors scoring 0 are
//!   dropped; the rest ordered by score descending, then name ascending.
//!
//! Names compare case-insensitively first ("a" < "B" < "c"); names equal
//! up to case fall back to byte order, so the ordering stays total and the
//! output is identical for identical inputs.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::model::Actor;

/// One row of the ranked view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedActor<'a> {
    pub actor: &'a Actor,
    pub score: u32,
}

/// Number of selected scenes and tags the actor carries
///
/// Each selected item counts once, however many times the actor lists it.
pub fn score(actor: &Actor, scenes: &BTreeSet<String>, tags: &BTreeSet<String>) -> u32 {
    let scene_matches = scenes.iter().filter(|s| actor.has_scene(s)).count();
    let tag_matches = tags.iter().filter(|t| actor.has_tag(t)).count();
    (scene_matches + tag_matches) as u32
}

/// Rank actors against the selected scenes and tags
pub fn rank<'a>(
    actors: &'a [Actor],
    scenes: &BTreeSet<String>,
    tags: &BTreeSet<String>,
) -> Vec<RankedActor<'a>> {
    if scenes.is_empty() && tags.is_empty() {
        let mut all: Vec<RankedActor<'a>> = actors
            .iter()
            .map(|actor| RankedActor { actor, score: 0 })
            .collect();
        all.sort_by(|a, b| compare_names(a.actor.name(), b.actor.name()));
        return all;
    }

    let mut matched: Vec<RankedActor<'a>> = actors
        .iter()
        .map(|actor| RankedActor {
            actor,
            score: score(actor, scenes, tags),
        })
        .filter(|ranked| ranked.score > 0)
        .collect();

    matched.sort_by(by_score_then_name);
    matched
}

fn by_score_then_name(a: &RankedActor<'_>, b: &RankedActor<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| compare_names(a.actor.name(), b.actor.name()))
}

/// Case-folded name order with a byte-order tie-break
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
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

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names<'a>(ranked: &[RankedActor<'a>]) -> Vec<&'a str> {
        ranked.iter().map(|r| r.actor.name()).collect()
    }

    fn sample() -> Vec<Actor> {
        vec![
            actor("C", &[], &[]),
            actor("B", &["x", "y"], &["brave"]),
            actor("A", &["x"], &[]),
        ]
    }

    #[test]
    fn test_empty_selection_returns_everyone_by_name() {
        let actors = sample();
        let ranked = rank(&actors, &set(&[]), &set(&[]));

        assert_eq!(names(&ranked), vec!["A", "B", "C"]);
        assert!(ranked.iter().all(|r| r.score == 0));
    }

    #[test]
    fn test_single_scene_tie_breaks_by_name() {
        let actors = sample();
        let ranked = rank(&actors, &set(&["x"]), &set(&[]));

        assert_eq!(names(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[0].score, 1);
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn test_tag_match_adds_a_point() {
        let actors = sample();
        let ranked = rank(&actors, &set(&["x"]), &set(&["brave"]));

        assert_eq!(names(&ranked), vec!["B", "A"]);
        assert_eq!(ranked[0].score, 2);
        assert_eq!(ranked[1].score, 1);
    }

    #[test]
    fn test_zero_score_actors_are_dropped() {
        let actors = sample();
        let ranked = rank(&actors, &set(&["y"]), &set(&[]));

        assert_eq!(names(&ranked), vec!["B"]);
        assert!(ranked.iter().all(|r| r.score >= 1));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let actors = sample();
        let ranked = rank(&actors, &set(&["nowhere"]), &set(&["nobody"]));
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let ranked = rank(&[], &set(&["x"]), &set(&[]));
        assert!(ranked.is_empty());
        assert!(rank(&[], &set(&[]), &set(&[])).is_empty());
    }

    #[test]
    fn test_duplicate_associations_count_once() {
        let actors = vec![actor("Dup", &["x", "x"], &["t", "t"])];
        let ranked = rank(&actors, &set(&["x"]), &set(&["t"]));

        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn test_same_name_in_scene_and_tag_counts_per_dimension() {
        let actors = vec![actor("Both", &["hero"], &["hero"])];
        let ranked = rank(&actors, &set(&["hero"]), &set(&["hero"]));

        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let actors = vec![
            actor("delta", &["a", "b"], &["t"]),
            actor("alpha", &["a"], &["t"]),
            actor("charlie", &["b"], &[]),
            actor("bravo", &["a", "b"], &["t"]),
        ];
        let scenes = set(&["a", "b"]);
        let tags = set(&["t"]);

        let first = names(&rank(&actors, &scenes, &tags));
        let second = names(&rank(&actors, &scenes, &tags));

        assert_eq!(first, vec!["bravo", "delta", "alpha", "charlie"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_name_order_folds_case() {
        let actors = vec![actor("b", &[], &[]), actor("B", &[], &[]), actor("a", &[], &[])];
        let ranked = rank(&actors, &set(&[]), &set(&[]));

        assert_eq!(names(&ranked), vec!["a", "B", "b"]);
    }

    #[test]
    fn test_score_ties_use_folded_name_order() {
        let actors = vec![
            actor("bob", &["x"], &[]),
            actor("Carol", &["x"], &[]),
            actor("Alice", &["x"], &[]),
            actor("dave", &["x"], &["t"]),
        ];
        let ranked = rank(&actors, &set(&["x"]), &set(&["t"]));

        assert_eq!(names(&ranked), vec!["dave", "Alice", "bob", "Carol"]);
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("a", "B"), Ordering::Less);
        assert_eq!(compare_names("B", "b"), Ordering::Less);
        assert_eq!(compare_names("범죄물", "총격전"), Ordering::Less);
        assert_eq!(compare_names("Same", "Same"), Ordering::Equal);
    }
}
