use crate::BlockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every kind of block a page can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    // Layout
    Section,
    Columns,
    Spacer,
    Divider,

    // Content
    Hero,
    Heading,
    Text,
    Features,
    Testimonials,
    Stats,
    CallToAction,

    // Media
    Image,
    Gallery,
    Video,

    // Interactive
    Button,
    Faq,
    Pricing,
    Form,

    // Advanced
    CustomCode,
    Embed,
}

impl BlockType {
    /// All variants in declaration order
    pub const ALL: [BlockType; 20] = [
        BlockType::Section,
        BlockType::Columns,
        BlockType::Spacer,
        BlockType::Divider,
        BlockType::Hero,
        BlockType::Heading,
        BlockType::Text,
        BlockType::Features,
        BlockType::Testimonials,
        BlockType::Stats,
        BlockType::CallToAction,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::Video,
        BlockType::Button,
        BlockType::Faq,
        BlockType::Pricing,
        BlockType::Form,
        BlockType::CustomCode,
        BlockType::Embed,
    ];

    /// Serialized tag, e.g. `"call-to-action"`
    pub fn tag(self) -> &'static str {
        match self {
            BlockType::Section => "section",
            BlockType::Columns => "columns",
            BlockType::Spacer => "spacer",
            BlockType::Divider => "divider",
            BlockType::Hero => "hero",
            BlockType::Heading => "heading",
            BlockType::Text => "text",
            BlockType::Features => "features",
            BlockType::Testimonials => "testimonials",
            BlockType::Stats => "stats",
            BlockType::CallToAction => "call-to-action",
            BlockType::Image => "image",
            BlockType::Gallery => "gallery",
            BlockType::Video => "video",
            BlockType::Button => "button",
            BlockType::Faq => "faq",
            BlockType::Pricing => "pricing",
            BlockType::Form => "form",
            BlockType::CustomCode => "custom-code",
            BlockType::Embed => "embed",
        }
    }

    /// Container blocks own an ordered list of child blocks
    pub fn is_container(self) -> bool {
        matches!(self, BlockType::Section | BlockType::Columns)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BlockType {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.tag() == s)
            .ok_or_else(|| BlockError::UnknownBlockType(s.to_string()))
    }
}

/// Palette grouping for block definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Layout,
    Content,
    Media,
    Interactive,
    Advanced,
}

impl Category {
    /// Palette display order
    pub const ALL: [Category; 5] = [
        Category::Layout,
        Category::Content,
        Category::Media,
        Category::Interactive,
        Category::Advanced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Layout => "Layout",
            Category::Content => "Content",
            Category::Media => "Media",
            Category::Interactive => "Interactive",
            Category::Advanced => "Advanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_matches_serde() {
        for block_type in BlockType::ALL {
            let json = serde_json::to_string(&block_type).unwrap();
            assert_eq!(json, format!("\"{}\"", block_type.tag()));
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!("call-to-action".parse::<BlockType>(), Ok(BlockType::CallToAction));
        assert_eq!("hero".parse::<BlockType>(), Ok(BlockType::Hero));

        let err = "carousel".parse::<BlockType>().unwrap_err();
        assert_eq!(err, BlockError::UnknownBlockType("carousel".to_string()));
    }

    #[test]
    fn test_only_layout_wrappers_are_containers() {
        let containers: Vec<_> = BlockType::ALL
            .iter()
            .filter(|t| t.is_container())
            .collect();
        assert_eq!(containers, vec![&BlockType::Section, &BlockType::Columns]);
    }
}
