use pagecraft_blocks::{BlockId, UntrustedMarkup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Render tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VNode {
    /// HTML element
    #[serde(rename_all = "camelCase")]
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Set on the root element of each rendered block (render key and
        /// drag handle for the builder canvas)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<BlockId>,
    },

    /// Text node (escaped on output)
    Text { content: String },

    /// Untrusted markup (never escaped by the renderer)
    Raw { markup: UntrustedMarkup },

    /// Stand-in for a block that could not be rendered
    #[serde(rename_all = "camelCase")]
    Placeholder { block_id: BlockId, message: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            block_id: None,
        }
    }

    /// Root element of a rendered block
    pub fn block_root(tag: impl Into<String>, block_id: &BlockId, class: &str) -> Self {
        VNode::element(tag)
            .with_attr("class", class)
            .with_attr("data-block-id", block_id.as_str())
            .with_block_id(block_id.clone())
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn raw(markup: UntrustedMarkup) -> Self {
        VNode::Raw { markup }
    }

    pub fn placeholder(block_id: BlockId, message: impl Into<String>) -> Self {
        VNode::Placeholder {
            block_id,
            message: message.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    /// Set an attribute only when `value` is non-empty
    pub fn with_optional_attr(self, key: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.with_attr(key, value)
        }
    }

    /// Append to the class attribute
    pub fn with_class(mut self, class: &str) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            let entry = attributes.entry("class".to_string()).or_default();
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(class);
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: impl IntoIterator<Item = VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Element containing a single text node
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(VNode::text(content))
    }

    fn with_block_id(mut self, id: BlockId) -> Self {
        if let VNode::Element {
            ref mut block_id, ..
        } = self
        {
            *block_id = Some(id);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children.as_slice(),
            _ => &[],
        }
    }

    pub fn block_id(&self) -> Option<&BlockId> {
        match self {
            VNode::Element { block_id, .. } => block_id.as_ref(),
            VNode::Placeholder { block_id, .. } => Some(block_id),
            _ => None,
        }
    }

    /// Concatenated text content of this subtree (raw markup excluded)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            VNode::Raw { .. } | VNode::Placeholder { .. } => {}
        }
    }
}
