//! # Edit Operations
//!
//! Semantic operations on a page document.
//!
//! ## Operation Semantics
//!
//! ### Insert
//! - Block is built from the registry defaults with a fresh id
//! - Index is clamped to the destination list
//! - Parent must exist and be a container
//!
//! ### Move
//! - Detach, then reinsert; `to_index` addresses the destination list
//!   after the block has been detached
//! - Fails if the target parent is the block itself or one of its descendants
//!
//! Insert and move also fail when the result would nest blocks deeper than
//! `MAX_NESTING_DEPTH`.
//!
//! ### Remove
//! - Removes the block and all descendants
//!
//! ### UpdateProperties
//! - Patch is merged key by key; `null` resets a key to its default
//! - Every key is validated against the block type's schema before anything
//!   is written
//!
//! Operations mutate the document they are given in place and may leave it
//! half-applied on error. Callers that need atomicity apply them to a copy
//! (see `BuilderStore::apply`).

use crate::errors::{EditError, EditResult};
use pagecraft_blocks::{
    Block, BlockId, BlockType, IdGenerator, PageDocument, PropertyMap, Registry, Slug,
    UntrustedMarkup, MAX_NESTING_DEPTH,
};
use serde::{Deserialize, Serialize};

/// Semantic edit operations on a page document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditOp {
    /// Insert a new block of `block_type` at `index` in `parent_id`'s
    /// children (top-level sections when `parent_id` is `None`)
    #[serde(rename_all = "camelCase")]
    InsertBlock {
        block_type: BlockType,
        index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<BlockId>,
    },

    /// Remove a block and its subtree
    RemoveBlock { id: BlockId },

    /// Move a block to a new parent and index
    #[serde(rename_all = "camelCase")]
    MoveBlock {
        id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to_parent_id: Option<BlockId>,
        to_index: usize,
    },

    /// Merge a property patch into a block
    UpdateProperties { id: BlockId, patch: PropertyMap },

    /// Insert a copy of a block (fresh ids throughout) right after it
    DuplicateBlock { id: BlockId },

    /// Change page-level fields
    UpdatePageSettings(PageSettingsPatch),
}

/// Page-level fields to change. `None` leaves a field alone; an empty value
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customCSS")]
    pub custom_css: Option<UntrustedMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customJS")]
    pub custom_js: Option<UntrustedMarkup>,
}

/// What an applied operation did beyond changing the document
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Applied {
    /// Block created by the operation (becomes the selection)
    pub created: Option<BlockId>,
}

impl EditOp {
    /// Short name for logs and history entries
    pub fn name(&self) -> &'static str {
        match self {
            EditOp::InsertBlock { .. } => "insert",
            EditOp::RemoveBlock { .. } => "remove",
            EditOp::MoveBlock { .. } => "move",
            EditOp::UpdateProperties { .. } => "update-properties",
            EditOp::DuplicateBlock { .. } => "duplicate",
            EditOp::UpdatePageSettings(_) => "update-page-settings",
        }
    }

    /// Apply the operation to `doc`
    pub(crate) fn apply(
        &self,
        doc: &mut PageDocument,
        registry: &Registry,
        ids: &mut IdGenerator,
    ) -> EditResult<Applied> {
        let applied = match self {
            EditOp::InsertBlock {
                block_type,
                index,
                parent_id,
            } => Self::apply_insert(doc, registry, ids, *block_type, *index, parent_id.as_ref()),

            EditOp::RemoveBlock { id } => Self::apply_remove(doc, id),

            EditOp::MoveBlock {
                id,
                to_parent_id,
                to_index,
            } => Self::apply_move(doc, id, to_parent_id.as_ref(), *to_index),

            EditOp::UpdateProperties { id, patch } => {
                Self::apply_update_properties(doc, registry, id, patch)
            }

            EditOp::DuplicateBlock { id } => Self::apply_duplicate(doc, ids, id),

            EditOp::UpdatePageSettings(patch) => Self::apply_page_settings(doc, patch),
        }?;

        if matches!(self, EditOp::InsertBlock { .. } | EditOp::MoveBlock { .. }) {
            let depth = doc.depth();
            if depth > MAX_NESTING_DEPTH {
                return Err(EditError::NestingTooDeep {
                    depth,
                    max: MAX_NESTING_DEPTH,
                });
            }
        }

        Ok(applied)
    }

    fn apply_insert(
        doc: &mut PageDocument,
        registry: &Registry,
        ids: &mut IdGenerator,
        block_type: BlockType,
        index: usize,
        parent_id: Option<&BlockId>,
    ) -> EditResult<Applied> {
        let id = ids.new_unused_id(|candidate| doc.contains(candidate));
        let block = registry.new_block(block_type, id.clone())?;

        let list = destination(doc, parent_id)?;
        let insert_index = index.min(list.len());
        list.insert(insert_index, block);

        Ok(Applied { created: Some(id) })
    }

    fn apply_remove(doc: &mut PageDocument, id: &BlockId) -> EditResult<Applied> {
        detach(doc, id)?;
        Ok(Applied::default())
    }

    fn apply_move(
        doc: &mut PageDocument,
        id: &BlockId,
        to_parent_id: Option<&BlockId>,
        to_index: usize,
    ) -> EditResult<Applied> {
        if !doc.contains(id) {
            return Err(EditError::BlockNotFound(id.clone()));
        }

        // Check for cycles before detaching
        if let Some(target) = to_parent_id {
            if doc.is_descendant(id, target) {
                return Err(EditError::CyclicMove {
                    id: id.clone(),
                    target: target.clone(),
                });
            }
        }

        let block = detach(doc, id)?;
        let list = destination(doc, to_parent_id)?;
        let insert_index = to_index.min(list.len());
        list.insert(insert_index, block);

        Ok(Applied::default())
    }

    fn apply_update_properties(
        doc: &mut PageDocument,
        registry: &Registry,
        id: &BlockId,
        patch: &PropertyMap,
    ) -> EditResult<Applied> {
        let block = doc
            .find_block_mut(id)
            .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;

        registry.apply_patch(block.block_type(), &mut block.properties, patch)?;
        Ok(Applied::default())
    }

    fn apply_duplicate(
        doc: &mut PageDocument,
        ids: &mut IdGenerator,
        id: &BlockId,
    ) -> EditResult<Applied> {
        let location = doc
            .locate(id)
            .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
        let original = doc
            .find_block(id)
            .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;

        let copy = {
            let doc_ref: &PageDocument = doc;
            original.deep_copy(&mut || ids.new_unused_id(|candidate| doc_ref.contains(candidate)))
        };
        let created = copy.id().clone();

        let list = destination(doc, location.parent_id.as_ref())?;
        list.insert(location.index + 1, copy);

        Ok(Applied {
            created: Some(created),
        })
    }

    fn apply_page_settings(doc: &mut PageDocument, patch: &PageSettingsPatch) -> EditResult<Applied> {
        // Validate before writing anything
        let slug = patch.slug.as_deref().map(Slug::parse).transpose()?;

        if let Some(slug) = slug {
            doc.slug = slug;
        }
        if let Some(title) = &patch.title {
            doc.title = title.clone();
        }
        if let Some(description) = &patch.description {
            doc.description = description.clone();
        }
        if let Some(meta_title) = &patch.meta_title {
            doc.meta_title = non_empty(meta_title);
        }
        if let Some(meta_description) = &patch.meta_description {
            doc.meta_description = non_empty(meta_description);
        }
        if let Some(keywords) = &patch.meta_keywords {
            doc.meta_keywords = keywords.clone();
        }
        if let Some(css) = &patch.custom_css {
            doc.custom_css = Some(css.clone()).filter(|markup| !markup.is_empty());
        }
        if let Some(js) = &patch.custom_js {
            doc.custom_js = Some(js.clone()).filter(|markup| !markup.is_empty());
        }

        Ok(Applied::default())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// The list a block may be inserted into
fn destination<'d>(
    doc: &'d mut PageDocument,
    parent_id: Option<&BlockId>,
) -> EditResult<&'d mut Vec<Block>> {
    match parent_id {
        None => Ok(&mut doc.sections),
        Some(parent) => doc
            .find_block_mut(parent)
            .ok_or_else(|| EditError::BlockNotFound(parent.clone()))?
            .children_mut()
            .ok_or_else(|| EditError::NotAContainer(parent.clone())),
    }
}

/// Remove a block from wherever it lives and return it
fn detach(doc: &mut PageDocument, id: &BlockId) -> EditResult<Block> {
    let location = doc
        .locate(id)
        .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
    let list = doc
        .list_mut(location.parent_id.as_ref())
        .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
    Ok(list.remove(location.index))
}
