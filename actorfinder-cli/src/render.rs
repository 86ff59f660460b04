//! Text rendering of the list, detail, vocabulary and preset views

use actorfinder_common::model::non_empty;
use actorfinder_common::presets;
use actorfinder_common::session::RankedView;
use actorfinder_common::{Actor, Catalog, RankedActor, Selection};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;

/// JSON shape of the list view
#[derive(Debug, Serialize)]
pub struct ListJson<'a> {
    pub filter_active: bool,
    pub count: usize,
    pub results: Vec<RankedActor<'a>>,
}

/// Ranked list view
///
/// Score badges are shown only while a filter is active.
pub fn render_list(view: &RankedView) -> String {
    let rows = view.rows();
    let show_scores = view.filter_active();
    let mut out = String::new();

    let _ = writeln!(out, "Filtered Actors ({})", rows.len());

    if rows.is_empty() {
        out.push_str("  No actors match the current filters.\n");
        out.push_str("  Try removing some filters or using a preset label.\n");
        return out;
    }

    for row in &rows {
        let actor = row.actor;
        out.push_str("  ");
        if show_scores {
            let _ = write!(out, "[{}] ", row.score);
        }
        out.push_str(actor.name());
        if let Some(origin) = origin(actor) {
            let _ = write!(out, "  {}", origin);
        }
        out.push('\n');
    }

    out
}

/// "nat / sex", or `None` when both are missing
fn origin(actor: &Actor) -> Option<String> {
    let nat = non_empty(&actor.profile.nat);
    let sex = non_empty(&actor.profile.sex);
    if nat.is_none() && sex.is_none() {
        return None;
    }
    Some(format!("{} / {}", nat.unwrap_or(""), sex.unwrap_or("")))
}

pub fn render_list_json(view: &RankedView) -> serde_json::Result<String> {
    let results = view.rows();
    serde_json::to_string_pretty(&ListJson {
        filter_active: view.filter_active(),
        count: results.len(),
        results,
    })
}

/// Detail view of one actor; empty fields are omitted
pub fn render_detail(actor: &Actor) -> String {
    let p = &actor.profile;
    let mut out = String::new();

    let _ = writeln!(out, "{}", actor.name());
    if let Some(stat) = non_empty(&p.stat) {
        let _ = writeln!(out, "  {}", stat);
    }

    out.push_str("\nActor Details\n");

    let stars = actor
        .star_rating()
        .map(|n| "★".repeat(n as usize))
        .unwrap_or_default();
    detail_row(&mut out, "Star", &stars);
    detail_row(&mut out, "Sex", non_empty(&p.sex).unwrap_or(""));
    detail_row(&mut out, "Nationality", non_empty(&p.nat).unwrap_or(""));

    let char1 = non_empty(&p.char1);
    let char2 = non_empty(&p.char2);
    if char1.is_some() || char2.is_some() {
        let character = format!("{} / {}", char1.unwrap_or(""), char2.unwrap_or(""));
        detail_row(&mut out, "Character", &character);
    }

    detail_row(&mut out, "Stat", non_empty(&p.stat1).unwrap_or(""));
    detail_row(&mut out, "Partner", non_empty(&p.fair_total).unwrap_or(""));
    detail_row(&mut out, "Scenes", &actor.scenes.join(", "));
    detail_row(&mut out, "Tags", &actor.tags.join(", "));

    let skills = actor.skills();
    if !skills.is_empty() {
        out.push_str("\nSkills\n");
        for skill in skills {
            let _ = writeln!(out, "  {}. {}", skill.number, skill.name.unwrap_or("N/A"));
            let _ = writeln!(
                out,
                "     {}",
                skill.description.unwrap_or("No description available.")
            );
        }
    }

    out
}

fn detail_row(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    let _ = writeln!(out, "  {:<12} {}", label, value);
}

pub fn render_detail_json(actor: &Actor) -> serde_json::Result<String> {
    serde_json::to_string_pretty(actor)
}

/// Every scene and tag, with `[x]` marking the selected ones
pub fn render_vocabulary(catalog: &Catalog, selection: &Selection) -> String {
    let mut out = String::new();

    out.push_str("Scenes\n");
    for scene in catalog.scenes() {
        let mark = if selection.scenes.contains(scene) { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {}", mark, scene);
    }

    out.push_str("Tags\n");
    for tag in catalog.tags() {
        let mark = if selection.tags.contains(tag) { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {}", mark, tag);
    }

    out
}

/// Preset catalog; the placeholder is listed as "(none)"
pub fn render_presets() -> String {
    let mut out = String::new();

    for label in presets::catalog() {
        if label.is_placeholder() {
            let _ = writeln!(out, "(none) {}", label.name);
            continue;
        }
        let _ = writeln!(out, "{}", label.name);
        let _ = writeln!(out, "  scenes: {}", join(&label.scenes));
        let _ = writeln!(out, "  tags:   {}", join(&label.tags));
    }

    out
}

fn join(items: &BTreeSet<String>) -> String {
    items
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One-line summary of the current selection
pub fn render_selection(selection: &Selection) -> String {
    if !selection.is_active() {
        return "No filters selected".to_string();
    }

    let scenes: Vec<&str> = selection.scenes.iter().map(String::as_str).collect();
    let tags: Vec<&str> = selection.tags.iter().map(String::as_str).collect();
    format!("Scenes: [{}]  Tags: [{}]", scenes.join(", "), tags.join(", "))
}
