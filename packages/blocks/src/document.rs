//! # Page Document
//!
//! The CMS record for one URL: ordered sections of blocks plus page metadata.
//!
//! ## Publication
//!
//! Only `Published` documents may be served on public routes. Drafts are
//! visible to the builder and previews only.

use crate::{Block, BlockError, BlockId, BlockResult, Slug, UntrustedMarkup};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Deepest block nesting a document may have (top-level sections are depth
/// 1). Keeps stored pages well inside serde_json's recursion limit.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Publication status of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
}

/// Position of a block: its parent (`None` for top-level sections) and index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockLocation {
    pub parent_id: Option<BlockId>,
    pub index: usize,
}

/// A page and its ordered content blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// Gateway-assigned id; empty until the page is first created
    #[serde(default)]
    pub id: String,
    pub slug: Slug,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub sections: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customCSS")]
    pub custom_css: Option<UntrustedMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customJS")]
    pub custom_js: Option<UntrustedMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageDocument {
    /// Empty draft page (not yet created on any gateway)
    pub fn blank(slug: Slug, title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            slug,
            title: title.into(),
            description: String::new(),
            status: PageStatus::Draft,
            sections: Vec::new(),
            custom_css: None,
            custom_js: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Build a stored document from gateway input
    pub fn from_input(id: impl Into<String>, input: PageInput, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            slug: input.slug,
            title: input.title,
            description: input.description,
            status: input.status,
            sections: input.sections,
            custom_css: input.custom_css,
            custom_js: input.custom_js,
            meta_title: input.meta_title,
            meta_description: input.meta_description,
            meta_keywords: input.meta_keywords,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// The writable part of this document, for create/update calls
    pub fn to_input(&self) -> PageInput {
        PageInput {
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            sections: self.sections.clone(),
            custom_css: self.custom_css.clone(),
            custom_js: self.custom_js.clone(),
            meta_title: self.meta_title.clone(),
            meta_description: self.meta_description.clone(),
            meta_keywords: self.meta_keywords.clone(),
        }
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            status: self.status,
            updated_at: self.updated_at,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PageStatus::Published
    }

    /// Whether the page has been created on a gateway yet
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn find_block(&self, id: &BlockId) -> Option<&Block> {
        self.sections.iter().find_map(|block| block.find(id))
    }

    pub fn find_block_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        self.sections.iter_mut().find_map(|block| block.find_mut(id))
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.find_block(id).is_some()
    }

    /// Find the parent and index of a block
    pub fn locate(&self, id: &BlockId) -> Option<BlockLocation> {
        fn search(parent: Option<&BlockId>, blocks: &[Block], id: &BlockId) -> Option<BlockLocation> {
            if let Some(index) = blocks.iter().position(|b| b.id() == id) {
                return Some(BlockLocation {
                    parent_id: parent.cloned(),
                    index,
                });
            }
            blocks
                .iter()
                .find_map(|b| search(Some(b.id()), b.children(), id))
        }

        search(None, &self.sections, id)
    }

    /// The ordered list a parent owns: the sections for `None`, a
    /// container's children otherwise. `None` if the parent is missing.
    pub fn list(&self, parent_id: Option<&BlockId>) -> Option<&[Block]> {
        match parent_id {
            None => Some(&self.sections),
            Some(id) => self.find_block(id).map(Block::children),
        }
    }

    /// Mutable version of `list`; `None` also for non-container parents
    pub fn list_mut(&mut self, parent_id: Option<&BlockId>) -> Option<&mut Vec<Block>> {
        match parent_id {
            None => Some(&mut self.sections),
            Some(id) => self.find_block_mut(id).and_then(Block::children_mut),
        }
    }

    /// Whether `candidate` lies in the subtree rooted at `ancestor` (inclusive)
    pub fn is_descendant(&self, ancestor: &BlockId, candidate: &BlockId) -> bool {
        self.find_block(ancestor)
            .map(|block| block.contains(candidate))
            .unwrap_or(false)
    }

    /// Every block id in document (pre-)order
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids = Vec::new();
        for block in &self.sections {
            block.walk(&mut |b| ids.push(b.id().clone()));
        }
        ids
    }

    /// Total number of blocks at any depth
    pub fn block_count(&self) -> usize {
        let mut count = 0;
        for block in &self.sections {
            block.walk(&mut |_| count += 1);
        }
        count
    }

    /// Deepest nesting level (0 for an empty page)
    pub fn depth(&self) -> usize {
        self.sections.iter().map(Block::depth).max().unwrap_or(0)
    }

    /// Check that every block id is unique
    pub fn validate_ids(&self) -> BlockResult<()> {
        let mut seen = HashSet::new();
        let mut duplicate = None;

        for block in &self.sections {
            block.walk(&mut |b| {
                if duplicate.is_none() && !seen.insert(b.id().clone()) {
                    duplicate = Some(b.id().clone());
                }
            });
        }

        match duplicate {
            Some(id) => Err(BlockError::DuplicateBlockId(id)),
            None => Ok(()),
        }
    }

    /// `validate_ids` plus: only containers have children and nesting stays
    /// within `MAX_NESTING_DEPTH`
    pub fn validate_structure(&self) -> BlockResult<()> {
        self.validate_ids()?;

        let depth = self.depth();
        if depth > MAX_NESTING_DEPTH {
            return Err(BlockError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }

        let mut result = Ok(());
        for block in &self.sections {
            block.walk(&mut |b| {
                if result.is_ok() && !b.is_container() && !b.children().is_empty() {
                    result = Err(BlockError::InvalidProperty {
                        key: "children".to_string(),
                        reason: format!("{} blocks cannot contain other blocks", b.block_type()),
                    });
                }
            });
        }

        result
    }
}

/// Writable page fields sent to a gateway on create/update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInput {
    pub slug: Slug,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub sections: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customCSS")]
    pub custom_css: Option<UntrustedMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "customJS")]
    pub custom_js: Option<UntrustedMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_keywords: Vec<String>,
}

/// Listing entry for a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub slug: Slug,
    pub title: String,
    pub status: PageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockType, PropertyMap};

    fn block(id: &str, block_type: BlockType) -> Block {
        Block::new(id.into(), block_type, PropertyMap::new())
    }

    fn sample() -> PageDocument {
        let mut doc = PageDocument::blank(Slug::parse("home").unwrap(), "Home");
        doc.sections = vec![
            block("hero", BlockType::Hero),
            block("section", BlockType::Section)
                .with_child(block("heading", BlockType::Heading))
                .with_child(
                    block("cols", BlockType::Columns).with_child(block("img", BlockType::Image)),
                ),
        ];
        doc
    }

    #[test]
    fn test_locate() {
        let doc = sample();
        assert_eq!(
            doc.locate(&"hero".into()),
            Some(BlockLocation { parent_id: None, index: 0 })
        );
        assert_eq!(
            doc.locate(&"img".into()),
            Some(BlockLocation {
                parent_id: Some("cols".into()),
                index: 0
            })
        );
        assert_eq!(doc.locate(&"nope".into()), None);
    }

    #[test]
    fn test_list_mut_rejects_leaf_parent() {
        let mut doc = sample();
        assert!(doc.list_mut(Some(&"hero".into())).is_none());
        assert_eq!(doc.list_mut(Some(&"section".into())).map(|l| l.len()), Some(2));
        assert_eq!(doc.list_mut(None).map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_descendants_and_ids() {
        let doc = sample();
        assert!(doc.is_descendant(&"section".into(), &"img".into()));
        assert!(doc.is_descendant(&"section".into(), &"section".into()));
        assert!(!doc.is_descendant(&"cols".into(), &"heading".into()));

        let ids: Vec<_> = doc.block_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["hero", "section", "heading", "cols", "img"]);
        assert_eq!(doc.block_count(), 5);
        assert_eq!(doc.depth(), 3);
    }

    #[test]
    fn test_validate_structure_detects_duplicates() {
        let mut doc = sample();
        assert!(doc.validate_structure().is_ok());

        doc.sections.push(block("img", BlockType::Image));
        assert_eq!(
            doc.validate_structure(),
            Err(BlockError::DuplicateBlockId("img".into()))
        );
    }

    #[test]
    fn test_validate_structure_limits_nesting() {
        fn nested(depth: usize) -> Block {
            let mut block = block(&format!("s{}", depth), BlockType::Section);
            if depth > 1 {
                block = block.with_child(nested(depth - 1));
            }
            block
        }

        let mut doc = PageDocument::blank(Slug::parse("deep").unwrap(), "Deep");
        doc.sections = vec![nested(MAX_NESTING_DEPTH)];
        assert!(doc.validate_structure().is_ok());

        doc.sections = vec![nested(MAX_NESTING_DEPTH + 1)];
        assert_eq!(
            doc.validate_structure(),
            Err(BlockError::NestingTooDeep {
                depth: MAX_NESTING_DEPTH + 1,
                max: MAX_NESTING_DEPTH
            })
        );

        // The deepest allowed page survives a JSON round trip
        doc.sections = vec![nested(MAX_NESTING_DEPTH)];
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(serde_json::from_str::<PageDocument>(&json).unwrap(), doc);
    }

    #[test]
    fn test_serde_uses_cms_field_names() {
        let mut doc = sample();
        doc.custom_css = Some(UntrustedMarkup::new("body { color: red }"));
        doc.meta_title = Some("Welcome".to_string());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["customCSS"], "body { color: red }");
        assert_eq!(json["metaTitle"], "Welcome");
        assert_eq!(json["status"], "draft");
        assert!(json.get("customJS").is_none());

        let back: PageDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }
}
