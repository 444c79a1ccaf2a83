//! Error types for the prompt engine

use thiserror::Error;

/// Errors that abort a prompt run
#[derive(Debug, Error)]
pub enum PromptError {
    /// Select and multiselect prompts need at least one choice
    #[error("prompt '{name}' must contain choices")]
    NoChoices { name: String },

    #[error("invalid prompt kind: {0}")]
    InvalidKind(String),

    /// Answer keys must be unique within one run
    #[error("duplicate prompt name: {0}")]
    DuplicateName(String),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PromptError>;
