//! Command-line arguments

use actorfinder_common::config::CliOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for actorfinder
#[derive(Parser, Debug)]
#[command(name = "actorfinder")]
#[command(about = "Browse the actor catalog by scenes, tags and preset labels")]
#[command(version)]
pub struct Args {
    /// Config file (default: <config dir>/actorfinder/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Actor document: http(s) URL or file path
    #[arg(long, global = true)]
    pub actors: Option<String>,

    /// Scene/tag association document: http(s) URL or file path
    #[arg(long, global = true)]
    pub associations: Option<String>,

    /// Per-document fetch timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the ranked actor list for a selection
    List {
        /// Select a scene (repeatable)
        #[arg(short, long = "scene")]
        scenes: Vec<String>,

        /// Select a tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Start from a preset label (name or English alias)
        #[arg(short, long)]
        preset: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the detail view of one actor
    Show {
        /// Actor name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print every scene and tag in the catalog
    Vocab,

    /// Print the preset labels
    Presets,

    /// Interactive browsing on stdin/stdout
    Browse,
}

impl Args {
    /// Settings given on the command line, for config resolution
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_file: self.config.clone(),
            actors_source: self.actors.clone(),
            associations_source: self.associations.clone(),
            fetch_timeout_secs: self.timeout_secs,
        }
    }
}
