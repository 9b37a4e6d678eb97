//! # Pagecraft Blocks
//!
//! Content model for Pagecraft pages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ registry: BlockType → BlockDefinition       │
//! │  - labels, icons, categories (palette)      │
//! │  - property schemas + defaults              │
//! └─────────────────────────────────────────────┘
//!                     ↓ lookup by type
//! ┌─────────────────────────────────────────────┐
//! │ document: PageDocument                      │
//! │  - ordered sections of Blocks               │
//! │  - container blocks own ordered children    │
//! │  - publication status + page metadata       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! 1. **Closed type set**: `BlockType` is an enum; a new kind of block is a new
//!    variant plus a registry entry plus a render arm
//! 2. **Unique ids**: block ids are unique within their document
//! 3. **Immutable type**: a block's type never changes after construction
//! 4. **Untrusted markup is typed**: raw HTML/CSS/JS lives in `UntrustedMarkup`,
//!    never in a plain `String`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_blocks::{BlockType, PageDocument, Registry, Slug};
//!
//! let registry = Registry::builtin();
//! let hero = registry.new_block(BlockType::Hero, "hero-1".into())?;
//!
//! let mut doc = PageDocument::blank(Slug::parse("about")?, "About us");
//! doc.sections.push(hero);
//! ```

mod block;
mod block_type;
mod definitions;
mod document;
mod error;
mod id_generator;
mod markup;
mod registry;
mod schema;
mod slug;

pub use block::{Block, BlockId, PropertyMap};
pub use block_type::{BlockType, Category};
pub use document::{
    BlockLocation, PageDocument, PageInput, PageStatus, PageSummary, MAX_NESTING_DEPTH,
};
pub use error::{BlockError, BlockResult};
pub use id_generator::{document_seed, IdGenerator};
pub use markup::UntrustedMarkup;
pub use registry::{BlockDefinition, IconRef, Registry};
pub use schema::{PropertyKind, PropertySpec};
pub use slug::Slug;
