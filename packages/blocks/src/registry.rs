//! # Block Type Registry
//!
//! Static catalogue of block definitions. The builder palette, the property
//! panel and the renderer all look block types up here.

use crate::definitions::builtin_definitions;
use crate::schema::validate_properties;
use crate::{
    Block, BlockError, BlockId, BlockResult, BlockType, Category, PageDocument, PropertyMap,
    PropertySpec,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

/// Name of the palette icon for a block type
pub type IconRef = &'static str;

/// Registry entry for one block type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub label: &'static str,
    pub icon: IconRef,
    pub category: Category,
    pub description: &'static str,
    pub properties: &'static [PropertySpec],
    pub default_properties: PropertyMap,
}

impl BlockDefinition {
    pub fn property(&self, key: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|spec| spec.key == key)
    }
}

/// Registry of block definitions, keyed by type in registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    definitions: IndexMap<BlockType, BlockDefinition>,
}

impl Registry {
    /// Registry with every built-in block type
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for definition in builtin_definitions() {
            // Built-in definitions are unique by construction (checked in tests)
            registry.definitions.insert(definition.block_type, definition);
        }
        registry
    }

    /// Process-wide built-in registry, built on first use
    pub fn shared() -> &'static Registry {
        static SHARED: OnceLock<Registry> = OnceLock::new();
        SHARED.get_or_init(Registry::builtin)
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            definitions: IndexMap::new(),
        }
    }

    /// Add a definition; each type may be registered once
    pub fn register(&mut self, definition: BlockDefinition) -> BlockResult<()> {
        if self.definitions.contains_key(&definition.block_type) {
            return Err(BlockError::DuplicateBlockType(definition.block_type));
        }
        self.definitions.insert(definition.block_type, definition);
        Ok(())
    }

    /// Registry containing only the given built-in types, in the given order
    pub fn with_types(types: &[BlockType]) -> BlockResult<Self> {
        let builtin = Self::builtin();
        let mut registry = Self::empty();
        for block_type in types {
            registry.register(builtin.lookup(*block_type)?.clone())?;
        }
        Ok(registry)
    }

    pub fn lookup(&self, block_type: BlockType) -> BlockResult<&BlockDefinition> {
        self.definitions
            .get(&block_type)
            .ok_or_else(|| BlockError::UnknownBlockType(block_type.tag().to_string()))
    }

    pub fn contains(&self, block_type: BlockType) -> bool {
        self.definitions.contains_key(&block_type)
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Palette contents: categories in display order, definitions in
    /// registration order within each category. Empty categories are omitted.
    pub fn list_by_category(&self) -> IndexMap<Category, Vec<&BlockDefinition>> {
        let mut palette = IndexMap::new();
        for category in Category::ALL {
            let entries: Vec<_> = self
                .definitions
                .values()
                .filter(|d| d.category == category)
                .collect();
            if !entries.is_empty() {
                palette.insert(category, entries);
            }
        }
        palette
    }

    /// Construct a block of `block_type` with the definition's defaults
    pub fn new_block(&self, block_type: BlockType, id: BlockId) -> BlockResult<Block> {
        let definition = self.lookup(block_type)?;
        Ok(Block::new(id, block_type, definition.default_properties.clone()))
    }

    /// Check a property patch against the type's schema without applying it.
    ///
    /// Keys are checked in order and the first invalid key is reported. A
    /// `null` value is accepted unless it would clear a required property
    /// that has no default.
    pub fn validate_patch(&self, block_type: BlockType, patch: &PropertyMap) -> BlockResult<()> {
        let definition = self.lookup(block_type)?;

        for (key, value) in patch {
            let spec = definition.property(key).ok_or_else(|| {
                BlockError::invalid_property(
                    key.as_str(),
                    format!("not a property of {} blocks", block_type),
                )
            })?;

            if value.is_null() {
                if spec.required && !definition.default_properties.contains_key(key) {
                    return Err(BlockError::invalid_property(
                        key.as_str(),
                        "required property cannot be cleared",
                    ));
                }
                continue;
            }

            spec.check(value)
                .map_err(|reason| BlockError::invalid_property(key.as_str(), reason))?;
        }

        Ok(())
    }

    /// Merge a validated property patch into `properties`.
    ///
    /// A `null` value resets the key to the type's default, or removes it
    /// when there is none. On error `properties` is left untouched.
    pub fn apply_patch(
        &self,
        block_type: BlockType,
        properties: &mut PropertyMap,
        patch: &PropertyMap,
    ) -> BlockResult<()> {
        self.validate_patch(block_type, patch)?;
        let definition = self.lookup(block_type)?;

        for (key, value) in patch {
            if value.is_null() {
                match definition.default_properties.get(key) {
                    Some(default) => {
                        properties.insert(key.clone(), default.clone());
                    }
                    None => {
                        properties.remove(key);
                    }
                }
            } else {
                properties.insert(key.clone(), value.clone());
            }
        }

        Ok(())
    }

    /// Validate a whole block subtree against the registry
    pub fn validate_block(&self, block: &Block) -> BlockResult<()> {
        let definition = self.lookup(block.block_type())?;
        validate_properties(definition.properties, &block.properties)?;
        for child in block.children() {
            self.validate_block(child)?;
        }
        Ok(())
    }

    /// Full check of a loaded document: structure, ids and every block's
    /// properties
    pub fn validate_document(&self, document: &PageDocument) -> BlockResult<()> {
        document.validate_structure()?;
        for section in &document.sections {
            self.validate_block(section)?;
        }
        Ok(())
    }

    /// Property value with the type's default filled in
    pub fn property<'a>(&'a self, block: &'a Block, key: &str) -> Option<&'a Value> {
        block.properties.get(key).or_else(|| {
            self.definitions
                .get(&block.block_type())
                .and_then(|d| d.default_properties.get(key))
        })
    }
}
