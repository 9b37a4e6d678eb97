//! Error types for the editor

use pagecraft_blocks::{BlockError, BlockId, BlockType};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Cannot move block {id} into its own subtree ({target})")]
    CyclicMove { id: BlockId, target: BlockId },

    #[error("Block {0} cannot contain other blocks")]
    NotAContainer(BlockId),

    #[error("Invalid property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Invalid slug '{slug}': {reason}")]
    InvalidSlug { slug: String, reason: String },

    #[error("Duplicate block id: {0}")]
    DuplicateBlockId(BlockId),

    #[error("Blocks nested {depth} deep; the maximum is {max}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("Block type registered twice: {0}")]
    DuplicateBlockType(BlockType),
}

impl From<BlockError> for EditError {
    fn from(e: BlockError) -> Self {
        match e {
            BlockError::UnknownBlockType(tag) => EditError::UnknownBlockType(tag),
            BlockError::DuplicateBlockType(block_type) => EditError::DuplicateBlockType(block_type),
            BlockError::InvalidProperty { key, reason } => EditError::InvalidProperty { key, reason },
            BlockError::InvalidSlug { slug, reason } => EditError::InvalidSlug { slug, reason },
            BlockError::DuplicateBlockId(id) => EditError::DuplicateBlockId(id),
            BlockError::NestingTooDeep { depth, max } => EditError::NestingTooDeep { depth, max },
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DragError {
    #[error("A drag gesture is already in progress")]
    GestureAlreadyActive,

    #[error("No drag gesture in progress")]
    NoActiveGesture,

    #[error("Dragged block not found: {0}")]
    BlockNotFound(BlockId),

    #[error("Drop failed: {0}")]
    Edit(#[from] EditError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_errors_keep_their_meaning() {
        assert_eq!(
            EditError::from(BlockError::DuplicateBlockType(BlockType::Hero)),
            EditError::DuplicateBlockType(BlockType::Hero)
        );
        assert_eq!(
            EditError::from(BlockError::DuplicateBlockId("a".into())),
            EditError::DuplicateBlockId("a".into())
        );
        assert_eq!(
            EditError::from(BlockError::NestingTooDeep { depth: 33, max: 32 }),
            EditError::NestingTooDeep { depth: 33, max: 32 }
        );
    }
}
