//! # Property Schemas
//!
//! Each block definition describes its editable properties as a static list of
//! `PropertySpec`s. Schemas drive both the builder's property panel and the
//! validation of every property patch.

use crate::{BlockError, BlockResult, PropertyMap};
use serde::Serialize;
use serde_json::Value;

/// Value shape accepted by a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "camelCase")]
pub enum PropertyKind {
    /// Single-line plain text
    Text,
    /// Multi-line plain text; blank lines separate paragraphs
    RichText,
    /// Numeric value with optional inclusive bounds
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    /// Link target (http(s), site-relative, anchor, mailto or tel)
    Url,
    /// `#rgb` or `#rrggbb`
    Color,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
    /// Array of objects validated against nested specs
    List(&'static [PropertySpec]),
    /// Untrusted HTML/CSS/JS, passed through unescaped when rendered
    RawMarkup,
}

/// One editable property of a block type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropertySpec {
    pub key: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
}

impl PropertySpec {
    pub const fn new(key: &'static str, kind: PropertyKind) -> Self {
        Self {
            key,
            kind,
            required: false,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// Check a single value against this spec's kind
    pub fn check(&self, value: &Value) -> Result<(), String> {
        check_kind(&self.kind, value)
    }
}

fn check_kind(kind: &PropertyKind, value: &Value) -> Result<(), String> {
    match kind {
        PropertyKind::Text | PropertyKind::RichText | PropertyKind::RawMarkup => {
            expect_str(value).map(|_| ())
        }

        PropertyKind::Number { min, max } => {
            let n = value
                .as_f64()
                .ok_or_else(|| format!("expected a number, got {}", describe(value)))?;
            if let Some(min) = min {
                if n < *min {
                    return Err(format!("{} is below the minimum of {}", n, min));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(format!("{} is above the maximum of {}", n, max));
                }
            }
            Ok(())
        }

        PropertyKind::Boolean => match value {
            Value::Bool(_) => Ok(()),
            other => Err(format!("expected a boolean, got {}", describe(other))),
        },

        PropertyKind::Url => {
            let url = expect_str(value)?;
            if is_safe_url(url) {
                Ok(())
            } else {
                Err(format!("unsupported link target '{}'", url))
            }
        }

        PropertyKind::Color => {
            let color = expect_str(value)?;
            if is_hex_color(color) {
                Ok(())
            } else {
                Err(format!("'{}' is not a #rgb or #rrggbb color", color))
            }
        }

        PropertyKind::Choice(options) => {
            let choice = expect_str(value)?;
            if options.iter().any(|option| *option == choice) {
                Ok(())
            } else {
                Err(format!("'{}' is not one of {}", choice, options.join(", ")))
            }
        }

        PropertyKind::List(item_specs) => {
            let items = value
                .as_array()
                .ok_or_else(|| format!("expected a list, got {}", describe(value)))?;
            for (index, item) in items.iter().enumerate() {
                let fields = item
                    .as_object()
                    .ok_or_else(|| format!("item {} is not an object", index))?;

                for (field, field_value) in fields {
                    let spec = item_specs
                        .iter()
                        .find(|s| s.key == field.as_str())
                        .ok_or_else(|| format!("item {} has unknown field '{}'", index, field))?;
                    spec.check(field_value)
                        .map_err(|reason| format!("item {} field '{}': {}", index, field, reason))?;
                }

                for spec in item_specs.iter().filter(|s| s.required) {
                    if !fields.contains_key(spec.key) {
                        return Err(format!("item {} is missing field '{}'", index, spec.key));
                    }
                }
            }
            Ok(())
        }
    }
}

fn expect_str(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a string, got {}", describe(value)))
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Empty means "no link"; anything scriptable is rejected
fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return true;
    }

    let lower = trimmed.to_ascii_lowercase();
    ["http://", "https://", "mailto:", "tel:", "/", "#", "?"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Validate a complete property map against a schema
pub(crate) fn validate_properties(specs: &[PropertySpec], properties: &PropertyMap) -> BlockResult<()> {
    for (key, value) in properties {
        let spec = specs
            .iter()
            .find(|s| s.key == key.as_str())
            .ok_or_else(|| BlockError::invalid_property(key.as_str(), "unknown property"))?;
        spec.check(value)
            .map_err(|reason| BlockError::invalid_property(key.as_str(), reason))?;
    }

    for spec in specs.iter().filter(|s| s.required) {
        if !properties.contains_key(spec.key) {
            return Err(BlockError::invalid_property(spec.key, "required property is missing"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ITEM: &[PropertySpec] = &[
        PropertySpec::new("question", PropertyKind::Text).required(),
        PropertySpec::new("answer", PropertyKind::RichText),
    ];

    #[test]
    fn test_number_bounds() {
        let spec = PropertySpec::new(
            "level",
            PropertyKind::Number {
                min: Some(1.0),
                max: Some(6.0),
            },
        );
        assert!(spec.check(&json!(3)).is_ok());
        assert!(spec.check(&json!(0)).is_err());
        assert!(spec.check(&json!(7)).is_err());
        assert!(spec.check(&json!("3")).is_err());
    }

    #[test]
    fn test_url_rejects_script_targets() {
        let spec = PropertySpec::new("href", PropertyKind::Url);
        assert!(spec.check(&json!("https://example.com")).is_ok());
        assert!(spec.check(&json!("/contact")).is_ok());
        assert!(spec.check(&json!("")).is_ok());
        assert!(spec.check(&json!("javascript:alert(1)")).is_err());
        assert!(spec.check(&json!(" JavaScript:alert(1)")).is_err());
    }

    #[test]
    fn test_color_format() {
        let spec = PropertySpec::new("background", PropertyKind::Color);
        assert!(spec.check(&json!("#fff")).is_ok());
        assert!(spec.check(&json!("#1a2B3c")).is_ok());
        assert!(spec.check(&json!("red")).is_err());
        assert!(spec.check(&json!("#12345")).is_err());
    }

    #[test]
    fn test_choice() {
        let spec = PropertySpec::new("align", PropertyKind::Choice(&["left", "center"]));
        assert!(spec.check(&json!("left")).is_ok());
        let err = spec.check(&json!("justify")).unwrap_err();
        assert!(err.contains("left, center"));
    }

    #[test]
    fn test_list_items_validated() {
        let spec = PropertySpec::new("items", PropertyKind::List(ITEM));
        assert!(spec
            .check(&json!([{ "question": "Why?", "answer": "Because." }]))
            .is_ok());

        let missing = spec.check(&json!([{ "answer": "Because." }])).unwrap_err();
        assert!(missing.contains("missing field 'question'"));

        let unknown = spec.check(&json!([{ "question": "Why?", "votes": 3 }])).unwrap_err();
        assert!(unknown.contains("unknown field 'votes'"));
    }

    #[test]
    fn test_validate_properties_reports_first_bad_key() {
        let mut props = PropertyMap::new();
        props.insert("question".to_string(), json!("Why?"));
        props.insert("answer".to_string(), json!(42));

        let err = validate_properties(ITEM, &props).unwrap_err();
        match err {
            BlockError::InvalidProperty { key, .. } => assert_eq!(key, "answer"),
            other => panic!("Expected InvalidProperty, got {:?}", other),
        }
    }
}
