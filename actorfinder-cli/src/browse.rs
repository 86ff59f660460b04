//! Interactive browse loop
//!
//! Reads one command per line, applies it to the session, and re-renders the
//! active view whenever the session reports a change. Rendering is driven by
//! the session's event stream rather than by the commands themselves.
//!
//! While no catalog is loaded (initial failure) only `reload`, `presets`,
//! `help` and `quit` are accepted.

use actorfinder_common::events::BrowseEvent;
use actorfinder_common::{BrowseSession, DataLoader, Error, ViewMode};
use anyhow::Result;
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::render;

const HELP: &str = "\
Commands:
  scene <name>    toggle a scene
  tag <name>      toggle a tag
  preset <name>   replace the selection with a preset label
  presets         list preset labels
  reset           clear all scene/tag selections
  list            show the ranked list
  show <name>     show one actor in detail
  back            return from the detail view to the list
  vocab           list all scenes and tags
  selection       show the current selection
  reload          load the catalog again
  help            show this help
  quit            leave
";

/// One line of browse input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Scene(String),
    Tag(String),
    Preset(String),
    Presets,
    Reset,
    List,
    Show(String),
    Back,
    Vocab,
    Selection,
    Reload,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Commands usable without a loaded catalog
    fn allowed_without_catalog(&self) -> bool {
        matches!(
            self,
            BrowseCommand::Reload | BrowseCommand::Presets | BrowseCommand::Help | BrowseCommand::Quit
        )
    }
}

impl FromStr for BrowseCommand {
    type Err = String;

    /// Names may contain spaces: everything after the keyword is the argument.
    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let argument = |name: &str| {
            if rest.is_empty() {
                Err(format!("Usage: {} <name>", name))
            } else {
                Ok(rest.to_string())
            }
        };

        match keyword.to_ascii_lowercase().as_str() {
            "scene" => argument("scene").map(BrowseCommand::Scene),
            "tag" => argument("tag").map(BrowseCommand::Tag),
            "preset" => argument("preset").map(BrowseCommand::Preset),
            "show" => argument("show").map(BrowseCommand::Show),
            "presets" => Ok(BrowseCommand::Presets),
            "reset" => Ok(BrowseCommand::Reset),
            "list" => Ok(BrowseCommand::List),
            "back" => Ok(BrowseCommand::Back),
            "vocab" => Ok(BrowseCommand::Vocab),
            "selection" => Ok(BrowseCommand::Selection),
            "reload" => Ok(BrowseCommand::Reload),
            "help" | "?" => Ok(BrowseCommand::Help),
            "quit" | "exit" => Ok(BrowseCommand::Quit),
            "" => Err("Empty command".to_string()),
            other => Err(format!("Unknown command '{}'. Type 'help' for commands.", other)),
        }
    }
}

/// Run the browse loop until `quit` or end of input
pub async fn run<R, W>(
    session: &BrowseSession,
    loader: &DataLoader,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut events = session.subscribe();

    session.load(loader).await;
    render_pending(&mut events, session, out).await?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };
        debug!(?command, "Browse command");

        if command == BrowseCommand::Quit {
            break;
        }

        if !command.allowed_without_catalog() && session.catalog().await.is_none() {
            writeln!(out, "Catalog not loaded. Type 'reload' to try again.")?;
            continue;
        }

        execute(session, loader, command, out).await?;
        render_pending(&mut events, session, out).await?;
    }

    Ok(())
}

async fn execute<W: Write>(
    session: &BrowseSession,
    loader: &DataLoader,
    command: BrowseCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        BrowseCommand::Scene(scene) => {
            if session.scenes().await.contains(&scene)
                || session.selection().await.scenes.contains(&scene)
            {
                session.toggle_scene(&scene).await;
            } else {
                writeln!(out, "Unknown scene '{}'. Type 'vocab' to list scenes.", scene)?;
            }
        }
        BrowseCommand::Tag(tag) => {
            if session.tags().await.contains(&tag)
                || session.selection().await.tags.contains(&tag)
            {
                session.toggle_tag(&tag).await;
            } else {
                writeln!(out, "Unknown tag '{}'. Type 'vocab' to list tags.", tag)?;
            }
        }
        BrowseCommand::Preset(name) => match session.apply_preset_named(&name).await {
            Ok(label) => writeln!(out, "Preset: {}", label.name)?,
            Err(Error::NotFound(_)) => {
                writeln!(out, "Unknown preset '{}'. Type 'presets' to list them.", name)?
            }
            Err(e) => return Err(e.into()),
        },
        BrowseCommand::Presets => write!(out, "{}", render::render_presets())?,
        BrowseCommand::Reset => session.reset().await,
        BrowseCommand::List => {
            if let Some(view) = session.ranked_view().await {
                write!(out, "{}", render::render_list(&view))?;
            }
        }
        BrowseCommand::Show(name) => match session.select_actor(&name).await {
            Ok(_) => {}
            Err(Error::NotFound(_)) => writeln!(out, "No actor named '{}'.", name)?,
            Err(e) => return Err(e.into()),
        },
        BrowseCommand::Back => {
            if session.view().await == ViewMode::List {
                writeln!(out, "Already at the list.")?;
            } else {
                session.clear_selected_actor().await;
            }
        }
        BrowseCommand::Vocab => {
            if let Some(catalog) = session.catalog().await {
                let selection = session.selection().await;
                write!(out, "{}", render::render_vocabulary(&catalog, &selection))?;
            }
        }
        BrowseCommand::Selection => {
            writeln!(out, "{}", render::render_selection(&session.selection().await))?;
        }
        BrowseCommand::Reload => {
            session.load(loader).await;
        }
        BrowseCommand::Help => write!(out, "{}", HELP)?,
        BrowseCommand::Quit => {}
    }

    Ok(())
}

/// Drain queued session events and re-render once if anything changed
async fn render_pending<W: Write>(
    events: &mut broadcast::Receiver<BrowseEvent>,
    session: &BrowseSession,
    out: &mut W,
) -> Result<()> {
    let mut needs_view = false;

    loop {
        match events.try_recv() {
            Ok(BrowseEvent::LoadStarted { .. }) => writeln!(out, "Loading Actor Data...")?,
            Ok(BrowseEvent::LoadFailed { message, .. }) => {
                writeln!(out, "{}", message)?;
                writeln!(out, "Type 'reload' to try again.")?;
                needs_view = false;
            }
            Ok(BrowseEvent::CatalogLoaded {
                actor_count,
                scene_count,
                tag_count,
                ..
            }) => {
                writeln!(
                    out,
                    "Loaded {} actors, {} scenes, {} tags.",
                    actor_count, scene_count, tag_count
                )?;
                needs_view = true;
            }
            Ok(BrowseEvent::SelectionChanged { .. }) | Ok(BrowseEvent::ViewChanged { .. }) => {
                needs_view = true;
            }
            Err(TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "Browse events lagged");
                needs_view = true;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    if needs_view {
        render_view(session, out).await?;
    }
    Ok(())
}

async fn render_view<W: Write>(session: &BrowseSession, out: &mut W) -> Result<()> {
    match session.view().await {
        ViewMode::Detail(_) => {
            if let Some(actor) = session.selected_actor().await {
                write!(out, "{}", render::render_detail(&actor))?;
                writeln!(out, "(type 'back' to return to the list)")?;
            }
        }
        ViewMode::List => {
            if let Some(view) = session.ranked_view().await {
                writeln!(out, "{}", render::render_selection(view.selection()))?;
                write!(out, "{}", render::render_list(&view))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_with_arguments() {
        assert_eq!(
            "scene 범죄물".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Scene("범죄물".to_string())
        );
        assert_eq!(
            "preset  Action Master ".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Preset("Action Master".to_string())
        );
        assert_eq!(
            "SHOW Mary Jane".parse::<BrowseCommand>().unwrap(),
            BrowseCommand::Show("Mary Jane".to_string())
        );
    }

    #[test]
    fn test_parse_commands_without_arguments() {
        assert_eq!("reset".parse::<BrowseCommand>().unwrap(), BrowseCommand::Reset);
        assert_eq!("?".parse::<BrowseCommand>().unwrap(), BrowseCommand::Help);
        assert_eq!("exit".parse::<BrowseCommand>().unwrap(), BrowseCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "tag".parse::<BrowseCommand>().unwrap_err(),
            "Usage: tag <name>"
        );
        assert!("dance"
            .parse::<BrowseCommand>()
            .unwrap_err()
            .starts_with("Unknown command 'dance'"));
    }

    #[test]
    fn test_commands_allowed_without_catalog() {
        assert!(BrowseCommand::Reload.allowed_without_catalog());
        assert!(BrowseCommand::Help.allowed_without_catalog());
        assert!(!BrowseCommand::List.allowed_without_catalog());
        assert!(!BrowseCommand::Scene("x".to_string()).allowed_without_catalog());
    }
}
