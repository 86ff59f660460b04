//! actorfinder - terminal browser for the actor catalog
//!
//! Loads the actor and scene/tag association documents, then either prints a
//! single view (`list`, `show`, `vocab`, `presets`) or runs an interactive
//! browse session on stdin/stdout.

use std::io::Write;

use actorfinder_cli::args::{Args, Command};
use actorfinder_cli::{browse, list, render};
use actorfinder_common::config::ResolvedConfig;
use actorfinder_common::{BrowseSession, DataLoader, LoadOutcome};
use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        ResolvedConfig::resolve(&args.overrides()).context("Failed to resolve configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("actorfinder v{}", env!("CARGO_PKG_VERSION"));
    info!("Actor document: {}", config.actors);
    info!("Association document: {}", config.associations);
    if let Some(path) = &config.config_file {
        info!("Config file: {}", path.display());
    }

    let loader = config.loader().context("Failed to create data loader")?;
    let session = BrowseSession::new();
    let mut stdout = std::io::stdout().lock();

    match args.command {
        Command::List {
            scenes,
            tags,
            preset,
            json,
        } => {
            load_or_bail(&session, &loader).await?;

            list::apply_filters(&session, preset.as_deref(), &scenes, &tags).await?;

            let view = session
                .ranked_view()
                .await
                .context("Catalog not available")?;
            if json {
                writeln!(stdout, "{}", render::render_list_json(&view)?)?;
            } else {
                writeln!(stdout, "{}", render::render_selection(view.selection()))?;
                write!(stdout, "{}", render::render_list(&view))?;
            }
        }

        Command::Show { name, json } => {
            load_or_bail(&session, &loader).await?;

            let actor = session.select_actor(&name).await?;
            if json {
                writeln!(stdout, "{}", render::render_detail_json(&actor)?)?;
            } else {
                write!(stdout, "{}", render::render_detail(&actor))?;
            }
        }

        Command::Vocab => {
            load_or_bail(&session, &loader).await?;

            let catalog = session.catalog().await.context("Catalog not available")?;
            write!(
                stdout,
                "{}",
                render::render_vocabulary(&catalog, &session.selection().await)
            )?;
        }

        Command::Presets => {
            write!(stdout, "{}", render::render_presets())?;
        }

        Command::Browse => {
            let input = BufReader::new(tokio::io::stdin());
            browse::run(&session, &loader, input, &mut stdout).await?;
        }
    }

    Ok(())
}

/// Load the catalog, turning a failure into the user-facing message
async fn load_or_bail(session: &BrowseSession, loader: &DataLoader) -> Result<()> {
    match session.load(loader).await {
        LoadOutcome::Loaded { actor_count } => {
            info!("Catalog ready with {} actors", actor_count);
            Ok(())
        }
        LoadOutcome::Failed(e) => {
            error!("Catalog load failed: {}", e);
            bail!("{}", e.user_message())
        }
        LoadOutcome::AlreadyLoading => bail!("A catalog load is already in progress"),
    }
}
