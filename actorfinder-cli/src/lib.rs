//! actorfinder-cli library - terminal front end for the actor catalog
//!
//! Argument definitions, text rendering of the list and detail views, and
//! the interactive browse loop. The binary in `main.rs` wires these to a
//! resolved configuration.

pub mod args;
pub mod browse;
pub mod list;
pub mod render;
