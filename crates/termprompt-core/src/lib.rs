//! Termprompt Core - Inline interactive prompts for terminal programs
//!
//! This library asks a sequence of questions in the terminal (free text,
//! yes/no, pick one, pick many) and collects the answers. Each prompt is
//! drawn inline below earlier output and redrawn in place as keys arrive.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Input** - [`key::KeyDecoder`] turns raw bytes into key events,
//!   [`action::action_for`] maps them to prompt actions
//! - **Layer 2: Prompts** - state machines in [`prompts`], one per kind, each
//!   rendering itself to a [`render::Frame`]
//! - **Layer 3: Runner** - [`run_prompts`] owns raw mode, the key reader and
//!   the renderer, and drives one prompt at a time;
//!   [`LoadingIndicator`] covers slow work between prompts
//!
//! # Example Usage
//!
//! ```ignore
//! use termprompt_core::{run_prompts, Choice, PromptSpec, RunOptions, Validator};
//!
//! let specs = vec![
//!     PromptSpec::text("dir", "Where should we create your new project?")
//!         .label("dir")
//!         .initial("./my-app")
//!         .validate(Validator::required("Please enter a directory")),
//!     PromptSpec::select("template", "Which template?")
//!         .label("tmpl")
//!         .choice(Choice::new("basic", "Basic").hint("recommended"))
//!         .choice(Choice::new("full", "Full stack")),
//! ];
//!
//! let answers = run_prompts(specs, RunOptions::stdio()).await?;
//! ```

pub mod action;
pub mod ansi;
pub mod error;
pub mod key;
pub mod loading;
pub mod print;
pub mod prompts;
pub mod render;
pub mod runner;
pub mod spec;
pub mod terminal;
pub mod theme;

// Re-export main types for convenience
pub use error::{PromptError, Result};
pub use loading::{Loaded, LoadingIndicator};
pub use prompts::{Outcome, Snapshot};
pub use runner::{run_prompts, Answers, Flow, RunOptions};
pub use spec::{Choice, PromptKind, PromptSpec, Validator, Value};
pub use terminal::KeyReader;
pub use theme::Theme;
