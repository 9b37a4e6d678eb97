use pagecraft_blocks::{BlockError, Slug};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Content service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(Slug),

    #[error("A save for {0} is already in progress")]
    SaveAlreadyInFlight(String),

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("Corrupt page file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<BlockError> for GatewayError {
    fn from(e: BlockError) -> Self {
        match e {
            BlockError::InvalidSlug { slug, reason } => GatewayError::InvalidSlug { slug, reason },
            other => GatewayError::InvalidSlug {
                slug: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
