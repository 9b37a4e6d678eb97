//! HTML serialization of render trees.
//!
//! Text and attribute values are always escaped. What happens to
//! `UntrustedMarkup` (custom code blocks, page CSS/JS) is decided by the
//! caller through `RawMarkupPolicy`; there is no default.

use crate::renderer::RenderedPage;
use crate::vnode::VNode;
use std::collections::BTreeMap;

/// What to do with untrusted markup when producing HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawMarkupPolicy {
    /// Emit untrusted markup unchanged. Only for trusted authors.
    Verbatim,
    /// Show untrusted markup as escaped text; drop page CSS/JS
    Escape,
    /// Drop untrusted markup entirely
    Omit,
}

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub raw_markup: RawMarkupPolicy,
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl HtmlOptions {
    pub fn new(raw_markup: RawMarkupPolicy) -> Self {
        Self {
            raw_markup,
            pretty: true,
            indent: "  ".to_string(),
        }
    }

    /// Single-line output
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

struct Context<'o> {
    options: &'o HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'o> Context<'o> {
    fn new(options: &'o HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Full HTML document for a rendered page
pub fn to_html(page: &RenderedPage, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"utf-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    ctx.add_line(&format!("<title>{}</title>", escape_text(&page.title)));
    if !page.description.is_empty() {
        ctx.add_line(&format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_attr(&page.description)
        ));
    }
    if options.raw_markup == RawMarkupPolicy::Verbatim {
        if let Some(css) = &page.custom_css {
            ctx.add_line(&format!("<style>{}</style>", css.as_unescaped_str()));
        }
    }
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body>");
    ctx.indent();
    ctx.add_line("<main class=\"pc-page\">");
    ctx.indent();
    for node in &page.nodes {
        write_node(node, &mut ctx);
    }
    ctx.dedent();
    ctx.add_line("</main>");
    if options.raw_markup == RawMarkupPolicy::Verbatim {
        if let Some(js) = &page.custom_js {
            ctx.add_line(&format!("<script>{}</script>", js.as_unescaped_str()));
        }
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// HTML for a list of nodes without the document shell
pub fn fragment(nodes: &[VNode], options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    for node in nodes {
        write_node(node, &mut ctx);
    }
    ctx.get_output()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Text { content } => ctx.add_line(&escape_text(content)),

        VNode::Raw { markup } => match ctx.options.raw_markup {
            RawMarkupPolicy::Verbatim => ctx.add_line(markup.as_unescaped_str()),
            RawMarkupPolicy::Escape => ctx.add_line(&format!(
                "<pre class=\"pc-untrusted\">{}</pre>",
                escape_text(markup.as_unescaped_str())
            )),
            RawMarkupPolicy::Omit => {}
        },

        VNode::Placeholder { block_id, message } => ctx.add_line(&format!(
            "<div class=\"pc-placeholder\" data-block-id=\"{}\" data-error=\"{}\"></div>",
            escape_attr(block_id.as_str()),
            escape_attr(message)
        )),

        VNode::Element {
            tag,
            attributes,
            children,
            ..
        } => write_element(tag, attributes, children, ctx),
    }
}

fn write_element(
    tag: &str,
    attributes: &BTreeMap<String, String>,
    children: &[VNode],
    ctx: &mut Context,
) {
    let open = open_tag(tag, attributes);

    if VOID_ELEMENTS.iter().any(|void| *void == tag) {
        ctx.add_line(&open);
        return;
    }

    // Elements holding only text stay on one line
    if children.iter().all(|c| matches!(c, VNode::Text { .. })) {
        let text: String = children
            .iter()
            .map(|c| match c {
                VNode::Text { content } => escape_text(content),
                _ => String::new(),
            })
            .collect();
        ctx.add_line(&format!("{}{}</{}>", open, text, tag));
        return;
    }

    ctx.add_line(&open);
    ctx.indent();
    for child in children {
        write_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

fn open_tag(tag: &str, attributes: &BTreeMap<String, String>) -> String {
    let mut open = format!("<{}", tag);
    for (name, value) in attributes {
        if value.is_empty() {
            open.push_str(&format!(" {}", name));
        } else {
            open.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
    }
    open.push('>');
    open
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::UntrustedMarkup;

    #[test]
    fn test_text_and_attributes_escaped() {
        let node = VNode::element("a")
            .with_attr("href", "/search?q=\"x\"&y")
            .with_text("<b>bold</b>");
        let html = fragment(&[node], &HtmlOptions::new(RawMarkupPolicy::Verbatim).compact());
        assert_eq!(
            html,
            "<a href=\"/search?q=&quot;x&quot;&amp;y\">&lt;b&gt;bold&lt;/b&gt;</a>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let node = VNode::element("video")
            .with_attr("controls", "")
            .with_child(VNode::element("source").with_attr("src", "/a.mp4"));
        let html = fragment(&[node], &HtmlOptions::new(RawMarkupPolicy::Omit).compact());
        assert_eq!(html, "<video controls><source src=\"/a.mp4\"></video>");
    }

    #[test]
    fn test_raw_markup_policies() {
        let raw = [VNode::raw(UntrustedMarkup::new("<script>alert(1)</script>"))];

        let verbatim = fragment(&raw, &HtmlOptions::new(RawMarkupPolicy::Verbatim).compact());
        assert_eq!(verbatim, "<script>alert(1)</script>");

        let escaped = fragment(&raw, &HtmlOptions::new(RawMarkupPolicy::Escape).compact());
        assert!(!escaped.contains("<script>"));
        assert!(escaped.contains("&lt;script&gt;"));

        let omitted = fragment(&raw, &HtmlOptions::new(RawMarkupPolicy::Omit).compact());
        assert_eq!(omitted, "");
    }

    #[test]
    fn test_pretty_output_indents_children() {
        let node = VNode::element("ul")
            .with_child(VNode::element("li").with_text("One"))
            .with_child(VNode::element("li").with_text("Two"));
        let html = fragment(&[node], &HtmlOptions::new(RawMarkupPolicy::Omit));
        assert_eq!(html, "<ul>\n  <li>One</li>\n  <li>Two</li>\n</ul>\n");
    }
}
