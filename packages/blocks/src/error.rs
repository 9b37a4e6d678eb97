use crate::{BlockId, BlockType};
use thiserror::Error;

/// Errors raised by the block model and registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlockError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block type already registered: {0}")]
    DuplicateBlockType(BlockType),

    #[error("Invalid property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),

    #[error("Blocks nested {depth} deep; the maximum is {max}")]
    NestingTooDeep { depth: usize, max: usize },
}

impl BlockError {
    pub(crate) fn invalid_property(key: impl Into<String>, reason: impl Into<String>) -> Self {
        BlockError::InvalidProperty {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias for block model operations
pub type BlockResult<T> = Result<T, BlockError>;
