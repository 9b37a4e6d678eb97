use crate::{BlockError, BlockResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe page path, e.g. `about` or `solutions/retail`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(slug: &str) -> BlockResult<Self> {
        let invalid = |reason: &str| BlockError::InvalidSlug {
            slug: slug.to_string(),
            reason: reason.to_string(),
        };

        if slug.is_empty() {
            return Err(invalid("slug is empty"));
        }

        for segment in slug.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty path segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            {
                return Err(invalid("only lowercase letters, digits and '-' are allowed"));
            }
            if segment.starts_with('-') || segment.ends_with('-') {
                return Err(invalid("segments cannot start or end with '-'"));
            }
        }

        Ok(Self(slug.to_string()))
    }

    /// Derive a slug from free text ("Pricing & Plans" → "pricing-plans")
    pub fn from_title(title: &str) -> BlockResult<Self> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_dash = false;

        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }

        Self::parse(&slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = BlockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Slug::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}
