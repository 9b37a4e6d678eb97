use crate::BlockType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Block properties keyed by property name.
///
/// Ordered so that anything derived from a block (render output, JSON) is
/// deterministic.
pub type PropertyMap = BTreeMap<String, Value>;

/// Identifier of a block, unique within its document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One content unit within a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,

    #[serde(rename = "type")]
    block_type: BlockType,

    #[serde(default)]
    pub properties: PropertyMap,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Block>,
}

impl Block {
    pub fn new(id: BlockId, block_type: BlockType, properties: PropertyMap) -> Self {
        Self {
            id,
            block_type,
            properties,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &BlockId {
        &self.id
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn is_container(&self) -> bool {
        self.block_type.is_container()
    }

    /// Ordered children (always empty for non-container blocks)
    pub fn children(&self) -> &[Block] {
        &self.children
    }

    /// Mutable children, `None` for blocks that cannot hold children
    pub fn children_mut(&mut self) -> Option<&mut Vec<Block>> {
        if self.is_container() {
            Some(&mut self.children)
        } else {
            None
        }
    }

    /// Builder-style child append; ignored for non-container blocks
    pub fn with_child(mut self, child: Block) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Find a block by id in this subtree (including self)
    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &BlockId) -> Option<&mut Block> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Whether `id` names this block or one of its descendants
    pub fn contains(&self, id: &BlockId) -> bool {
        self.find(id).is_some()
    }

    /// Pre-order visit of this subtree
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Block)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Height of this subtree (a leaf block has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Block::depth).max().unwrap_or(0)
    }

    /// Deep copy with every id in the subtree replaced by `next_id()`
    pub fn deep_copy(&self, next_id: &mut dyn FnMut() -> BlockId) -> Block {
        Block {
            id: next_id(),
            block_type: self.block_type,
            properties: self.properties.clone(),
            children: self
                .children
                .iter()
                .map(|child| child.deep_copy(next_id))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(id: &str, block_type: BlockType) -> Block {
        Block::new(id.into(), block_type, PropertyMap::new())
    }

    #[test]
    fn test_only_containers_take_children() {
        let section = block("s", BlockType::Section).with_child(block("t", BlockType::Text));
        assert_eq!(section.children().len(), 1);

        let mut text = block("t", BlockType::Text).with_child(block("x", BlockType::Text));
        assert!(text.children().is_empty());
        assert!(text.children_mut().is_none());
    }

    #[test]
    fn test_find_nested() {
        let tree = block("root", BlockType::Section).with_child(
            block("cols", BlockType::Columns).with_child(block("leaf", BlockType::Image)),
        );

        assert_eq!(tree.find(&"leaf".into()).map(|b| b.block_type()), Some(BlockType::Image));
        assert!(tree.contains(&"cols".into()));
        assert!(!tree.contains(&"missing".into()));
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_deep_copy_replaces_every_id() {
        let tree = block("a", BlockType::Section)
            .with_child(block("b", BlockType::Text).with_property("content", json!("hi")));

        let mut n = 0;
        let copy = tree.deep_copy(&mut || {
            n += 1;
            BlockId::new(format!("copy-{}", n))
        });

        assert_eq!(copy.id().as_str(), "copy-1");
        assert_eq!(copy.children()[0].id().as_str(), "copy-2");
        assert_eq!(copy.children()[0].properties["content"], json!("hi"));
    }

    #[test]
    fn test_serde_shape() {
        let tree = block("a", BlockType::Section).with_child(block("b", BlockType::Spacer));
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["type"], json!("section"));
        assert_eq!(json["children"][0]["id"], json!("b"));
        assert!(json["children"][0].get("children").is_none());

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
