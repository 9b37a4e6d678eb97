//! # Block Renderer
//!
//! Pure projection from blocks to a render tree.
//!
//! ## Determinism Contract
//!
//! For the same registry, options and block, `render_block()` produces the
//! same tree on every call. Properties are ordered maps and nothing in the
//! renderer carries state between calls.
//!
//! ## Dispatch
//!
//! `render_block` matches exhaustively on `BlockType`, so adding a block type
//! without a render arm is a compile error.
//!
//! ## Error Recovery Boundaries
//!
//! `render_block` propagates `UnknownBlockType` and `BlockTreeTooDeep`.
//! `render_page` recovers per top-level section: the failing section is logged
//! and replaced by a `Placeholder`, the rest of the page still renders.
//!
//! ## Trust Boundary
//!
//! `CustomCode` blocks and the page's custom CSS/JS become `UntrustedMarkup`
//! in the output. Nothing here sanitizes them; see `html::RawMarkupPolicy`.

use crate::vnode::VNode;
use pagecraft_blocks::{Block, BlockType, PageDocument, Registry, UntrustedMarkup};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    #[error("Block tree too deep: depth {depth} exceeds the maximum of {max}")]
    BlockTreeTooDeep { depth: usize, max: usize },
}

/// Options for rendering
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum block nesting depth (top-level sections are depth 1)
    pub max_depth: usize,
}

pub const DEFAULT_MAX_DEPTH: usize = 64;

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A fully rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub title: String,
    pub description: String,
    pub nodes: Vec<VNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<UntrustedMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_js: Option<UntrustedMarkup>,
}

/// Renders blocks using the definitions in a registry
pub struct Renderer<'a> {
    registry: &'a Registry,
    options: RenderOptions,
}

impl<'a> Renderer<'a> {
    pub fn new(registry: &'a Registry, options: RenderOptions) -> Self {
        Self { registry, options }
    }

    pub fn with_defaults(registry: &'a Registry) -> Self {
        Self::new(registry, RenderOptions::default())
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a whole page. Never fails: broken sections become placeholders.
    #[instrument(skip(self, page), fields(slug = %page.slug, sections = page.sections.len()))]
    pub fn render_page(&self, page: &PageDocument) -> RenderedPage {
        let nodes = page
            .sections
            .iter()
            .map(|block| match self.render_block(block) {
                Ok(node) => node,
                Err(e) => {
                    error!(block_id = %block.id(), block_type = %block.block_type(), error = %e, "Failed to render section");
                    VNode::placeholder(block.id().clone(), e.to_string())
                }
            })
            .collect();

        RenderedPage {
            title: page.meta_title.clone().unwrap_or_else(|| page.title.clone()),
            description: page
                .meta_description
                .clone()
                .unwrap_or_else(|| page.description.clone()),
            nodes,
            custom_css: page.custom_css.clone().filter(|css| !css.is_empty()),
            custom_js: page.custom_js.clone().filter(|js| !js.is_empty()),
        }
    }

    /// Render one block and its subtree
    pub fn render_block(&self, block: &Block) -> RenderResult<VNode> {
        self.render_at(block, 1)
    }

    fn render_at(&self, block: &Block, depth: usize) -> RenderResult<VNode> {
        if depth > self.options.max_depth {
            return Err(RenderError::BlockTreeTooDeep {
                depth,
                max: self.options.max_depth,
            });
        }

        // Unregistered types are a data-integrity failure, not a fallback
        let block_type = block.block_type();
        if !self.registry.contains(block_type) {
            return Err(RenderError::UnknownBlockType(block_type.tag().to_string()));
        }
        debug!(block_id = %block.id(), block_type = %block.block_type(), depth, "Rendering block");

        let props = Props {
            registry: self.registry,
            block,
        };

        let node = match block.block_type() {
            BlockType::Section => self.render_section(&props, depth)?,
            BlockType::Columns => self.render_columns(&props, depth)?,
            BlockType::Spacer => render_spacer(&props),
            BlockType::Divider => render_divider(&props),
            BlockType::Hero => render_hero(&props),
            BlockType::Heading => render_heading(&props),
            BlockType::Text => render_text(&props),
            BlockType::Features => render_features(&props),
            BlockType::Testimonials => render_testimonials(&props),
            BlockType::Stats => render_stats(&props),
            BlockType::CallToAction => render_call_to_action(&props),
            BlockType::Image => render_image(&props),
            BlockType::Gallery => render_gallery(&props),
            BlockType::Video => render_video(&props),
            BlockType::Button => render_button(&props),
            BlockType::Faq => render_faq(&props),
            BlockType::Pricing => render_pricing(&props),
            BlockType::Form => render_form(&props),
            BlockType::CustomCode => render_custom_code(&props),
            BlockType::Embed => render_embed(&props),
        };

        Ok(node)
    }

    fn render_children(&self, block: &Block, depth: usize) -> RenderResult<Vec<VNode>> {
        block
            .children()
            .iter()
            .map(|child| self.render_at(child, depth + 1))
            .collect()
    }

    fn render_section(&self, props: &Props, depth: usize) -> RenderResult<VNode> {
        let mut node = props
            .root("section", "pc-section")
            .with_class(&format!("pc-pad-{}", props.text_or("padding", "medium")))
            .with_optional_attr("id", &props.text("anchor"));

        if props.bool("fullWidth") {
            node = node.with_class("pc-full-width");
        }
        let background = props.text("background");
        if !background.is_empty() {
            node = node.with_attr("style", format!("background-color: {}", background));
        }

        Ok(node.with_children(self.render_children(props.block, depth)?))
    }

    fn render_columns(&self, props: &Props, depth: usize) -> RenderResult<VNode> {
        let columns = props.number("columns").unwrap_or(2.0) as u32;
        let mut node = props
            .root("div", "pc-columns")
            .with_class(&format!("pc-gap-{}", props.text_or("gap", "medium")))
            .with_attr(
                "style",
                format!("grid-template-columns: repeat({}, minmax(0, 1fr))", columns),
            );

        if props.bool("stackOnMobile") {
            node = node.with_class("pc-stack-mobile");
        }

        Ok(node.with_children(self.render_children(props.block, depth)?))
    }
}

/// Property accessor that falls back to the registry defaults
struct Props<'a> {
    registry: &'a Registry,
    block: &'a Block,
}

impl<'a> Props<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.registry.property(self.block, key)
    }

    fn text(&self, key: &str) -> String {
        self.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    fn text_or(&self, key: &str, fallback: &str) -> String {
        let value = self.text(key);
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    fn bool(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn list(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn root(&self, tag: &str, class: &str) -> VNode {
        VNode::block_root(
            tag,
            self.block.id(),
            &format!("pc-block pc-{} {}", self.block.block_type(), class),
        )
    }
}

fn field<'v>(item: &'v Value, key: &str) -> &'v str {
    item.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn field_bool(item: &Value, key: &str) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Blank-line separated paragraphs
fn paragraphs(text: &str) -> Vec<VNode> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| VNode::element("p").with_text(p))
        .collect()
}

fn heading(level: u8, text: &str) -> VNode {
    VNode::element(format!("h{}", level.clamp(1, 6))).with_text(text)
}

fn link(class: &str, label: &str, url: &str) -> VNode {
    VNode::element("a")
        .with_attr("class", class)
        .with_attr("href", if url.is_empty() { "#" } else { url })
        .with_text(label)
}

fn render_spacer(props: &Props) -> VNode {
    let height = props.number("height").unwrap_or(0.0);
    props
        .root("div", "pc-spacer")
        .with_attr("aria-hidden", "true")
        .with_attr("style", format!("height: {}px", height))
}

fn render_divider(props: &Props) -> VNode {
    props.root("hr", "pc-divider").with_attr(
        "style",
        format!(
            "border-top: 1px {} {}",
            props.text_or("style", "solid"),
            props.text_or("color", "#e5e7eb")
        ),
    )
}

fn render_hero(props: &Props) -> VNode {
    let mut inner = VNode::element("div")
        .with_attr("class", "pc-hero-inner")
        .with_child(heading(1, &props.text("title")))
        .with_children(paragraphs(&props.text("subtitle")));

    let cta_label = props.text("ctaLabel");
    if !cta_label.is_empty() {
        inner = inner.with_child(link("pc-button pc-button-primary", &cta_label, &props.text("ctaUrl")));
    }

    let mut node = props
        .root("section", "pc-hero")
        .with_class(&format!("pc-align-{}", props.text_or("alignment", "center")));

    let background = props.text("backgroundImage");
    if !background.is_empty() {
        node = node.with_child(
            VNode::element("img")
                .with_attr("class", "pc-hero-background")
                .with_attr("src", background)
                .with_attr("alt", ""),
        );
    }

    node.with_child(inner)
}

fn render_heading(props: &Props) -> VNode {
    let level = props.number("level").unwrap_or(2.0) as u8;
    let title = heading(level, &props.text("text"));
    props
        .root("div", "pc-heading")
        .with_class(&format!("pc-align-{}", props.text_or("alignment", "left")))
        .with_child(title)
}

fn render_text(props: &Props) -> VNode {
    props
        .root("div", "pc-text")
        .with_class(&format!("pc-align-{}", props.text_or("alignment", "left")))
        .with_children(paragraphs(&props.text("content")))
}

fn optional_title(props: &Props) -> Option<VNode> {
    let title = props.text("title");
    if title.is_empty() {
        None
    } else {
        Some(heading(2, &title))
    }
}

fn render_features(props: &Props) -> VNode {
    let items = props.list("items").iter().map(|item| {
        VNode::element("li")
            .with_attr("class", "pc-feature")
            .with_optional_attr("data-icon", field(item, "icon"))
            .with_child(heading(3, field(item, "title")))
            .with_children(paragraphs(field(item, "description")))
    });

    props
        .root("section", "pc-features")
        .with_children(optional_title(props))
        .with_child(VNode::element("ul").with_attr("class", "pc-feature-grid").with_children(items))
}

fn render_testimonials(props: &Props) -> VNode {
    let quotes = props.list("items").iter().map(|item| {
        let mut footer = VNode::element("footer")
            .with_child(VNode::element("cite").with_text(field(item, "author")));
        let role = field(item, "role");
        if !role.is_empty() {
            footer = footer.with_child(VNode::element("span").with_attr("class", "pc-role").with_text(role));
        }

        let mut quote = VNode::element("blockquote").with_attr("class", "pc-testimonial");
        let avatar = field(item, "avatar");
        if !avatar.is_empty() {
            quote = quote.with_child(
                VNode::element("img")
                    .with_attr("class", "pc-avatar")
                    .with_attr("src", avatar)
                    .with_attr("alt", field(item, "author")),
            );
        }
        quote.with_children(paragraphs(field(item, "quote"))).with_child(footer)
    });

    props
        .root("section", "pc-testimonials")
        .with_children(optional_title(props))
        .with_children(quotes)
}

fn render_stats(props: &Props) -> VNode {
    let stats = props.list("items").iter().map(|item| {
        VNode::element("div")
            .with_attr("class", "pc-stat")
            .with_child(VNode::element("strong").with_text(field(item, "value")))
            .with_child(VNode::element("span").with_text(field(item, "label")))
    });

    props.root("section", "pc-stats").with_children(stats)
}

fn render_call_to_action(props: &Props) -> VNode {
    let mut node = props
        .root("section", "pc-cta")
        .with_child(heading(2, &props.text("title")))
        .with_children(paragraphs(&props.text("description")));

    let label = props.text("buttonLabel");
    if !label.is_empty() {
        let class = format!("pc-button pc-button-{}", props.text_or("variant", "primary"));
        node = node.with_child(link(&class, &label, &props.text("buttonUrl")));
    }
    node
}

fn render_image(props: &Props) -> VNode {
    let mut node = props.root("figure", "pc-image");
    if props.bool("rounded") {
        node = node.with_class("pc-rounded");
    }

    let src = props.text("src");
    node = if src.is_empty() {
        node.with_child(VNode::element("div").with_attr("class", "pc-image-empty"))
    } else {
        node.with_child(
            VNode::element("img")
                .with_attr("src", src)
                .with_attr("alt", props.text("alt"))
                .with_attr("loading", "lazy"),
        )
    };

    let caption = props.text("caption");
    if !caption.is_empty() {
        node = node.with_child(VNode::element("figcaption").with_text(caption));
    }
    node
}

fn render_gallery(props: &Props) -> VNode {
    let columns = props.number("columns").unwrap_or(3.0) as u32;
    let images = props.list("images").iter().map(|image| {
        VNode::element("img")
            .with_attr("src", field(image, "src"))
            .with_attr("alt", field(image, "alt"))
            .with_attr("loading", "lazy")
    });

    props
        .root("div", "pc-gallery")
        .with_attr(
            "style",
            format!("grid-template-columns: repeat({}, minmax(0, 1fr))", columns),
        )
        .with_children(images)
}

fn render_video(props: &Props) -> VNode {
    let mut video = VNode::element("video")
        .with_optional_attr("src", &props.text("url"))
        .with_optional_attr("poster", &props.text("poster"))
        .with_attr("playsinline", "");
    if props.bool("controls") {
        video = video.with_attr("controls", "");
    }
    if props.bool("autoplay") {
        // Browsers only autoplay muted video
        video = video.with_attr("autoplay", "").with_attr("muted", "");
    }

    props.root("div", "pc-video").with_child(video)
}

fn render_button(props: &Props) -> VNode {
    let class = format!(
        "pc-block pc-button pc-button-{}",
        props.text_or("variant", "primary")
    );
    let mut node = VNode::block_root("a", props.block.id(), &class)
        .with_attr("href", props.text_or("url", "#"))
        .with_text(props.text("label"));

    if props.bool("openInNewTab") {
        node = node
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer");
    }
    node
}

fn render_faq(props: &Props) -> VNode {
    let entries = props.list("items").iter().map(|item| {
        VNode::element("details")
            .with_attr("class", "pc-faq-item")
            .with_child(VNode::element("summary").with_text(field(item, "question")))
            .with_child(
                VNode::element("div")
                    .with_attr("class", "pc-faq-answer")
                    .with_children(paragraphs(field(item, "answer"))),
            )
    });

    props
        .root("section", "pc-faq")
        .with_children(optional_title(props))
        .with_children(entries)
}

fn render_pricing(props: &Props) -> VNode {
    let plans = props.list("plans").iter().map(|plan| {
        let mut price = VNode::element("p")
            .with_attr("class", "pc-price")
            .with_child(VNode::element("strong").with_text(field(plan, "price")));
        let period = field(plan, "period");
        if !period.is_empty() {
            price = price.with_child(VNode::element("span").with_text(format!("/{}", period)));
        }

        let features = field(plan, "features")
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| VNode::element("li").with_text(line));

        let mut card = VNode::element("div")
            .with_attr("class", "pc-plan")
            .with_child(heading(3, field(plan, "name")))
            .with_child(price)
            .with_child(VNode::element("ul").with_children(features));

        if field_bool(plan, "highlighted") {
            card = card.with_class("pc-plan-highlighted");
        }
        let cta = field(plan, "ctaLabel");
        if !cta.is_empty() {
            card = card.with_child(link("pc-button", cta, field(plan, "ctaUrl")));
        }
        card
    });

    props
        .root("section", "pc-pricing")
        .with_children(optional_title(props))
        .with_child(VNode::element("div").with_attr("class", "pc-plans").with_children(plans))
}

fn render_form(props: &Props) -> VNode {
    let fields = props.list("fields").iter().map(|spec| {
        let name = field(spec, "name");
        let input_type = match field(spec, "inputType") {
            "" => "text",
            other => other,
        };
        let control_id = format!("{}-{}", props.block.id(), name);

        let control = if input_type == "textarea" {
            VNode::element("textarea")
        } else {
            VNode::element("input").with_attr("type", input_type)
        };
        let mut control = control
            .with_attr("id", control_id.clone())
            .with_attr("name", name);

        if field_bool(spec, "required") {
            control = control.with_attr("required", "");
        }

        VNode::element("div")
            .with_attr("class", "pc-field")
            .with_child(
                VNode::element("label")
                    .with_attr("for", control_id)
                    .with_text(field(spec, "label")),
            )
            .with_child(control)
    });

    let form = VNode::element("form")
        .with_attr("method", "post")
        .with_optional_attr("action", &props.text("action"))
        .with_optional_attr("data-success-message", &props.text("successMessage"))
        .with_children(fields)
        .with_child(
            VNode::element("button")
                .with_attr("type", "submit")
                .with_text(props.text_or("submitLabel", "Send")),
        );

    props
        .root("section", "pc-form")
        .with_children(optional_title(props))
        .with_child(form)
}

fn render_custom_code(props: &Props) -> VNode {
    props
        .root("div", "pc-custom-code")
        .with_child(VNode::raw(UntrustedMarkup::new(props.text("html"))))
}

fn render_embed(props: &Props) -> VNode {
    let height = props.number("height").unwrap_or(400.0);
    props.root("div", "pc-embed").with_child(
        VNode::element("iframe")
            .with_attr("src", props.text("url"))
            .with_attr("title", props.text_or("title", "Embedded content"))
            .with_attr("height", format!("{}", height))
            .with_attr("loading", "lazy")
            .with_attr("sandbox", "allow-scripts allow-same-origin allow-popups allow-forms"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::{BlockId, PropertyMap, Slug};
    use serde_json::json;

    fn block(registry: &Registry, id: &str, block_type: BlockType) -> Block {
        registry.new_block(block_type, BlockId::new(id)).unwrap()
    }

    #[test]
    fn test_every_block_type_renders_with_defaults() {
        let registry = Registry::builtin();
        let renderer = Renderer::with_defaults(&registry);

        for block_type in BlockType::ALL {
            let node = renderer
                .render_block(&block(&registry, "b", block_type))
                .unwrap();
            assert_eq!(node.block_id(), Some(&BlockId::new("b")), "{}", block_type);
        }
    }

    #[test]
    fn test_missing_properties_fall_back_to_defaults() {
        let registry = Registry::builtin();
        let renderer = Renderer::with_defaults(&registry);

        let bare = Block::new("h".into(), BlockType::Heading, PropertyMap::new());
        let node = renderer.render_block(&bare).unwrap();
        assert_eq!(node.children()[0].tag(), Some("h2"));
        assert_eq!(node.text_content(), "Heading");
    }

    #[test]
    fn test_containers_render_children_in_order() {
        let registry = Registry::builtin();
        let renderer = Renderer::with_defaults(&registry);

        let section = block(&registry, "s", BlockType::Section)
            .with_child(block(&registry, "a", BlockType::Spacer))
            .with_child(block(&registry, "b", BlockType::Divider));

        let node = renderer.render_block(&section).unwrap();
        let ids: Vec<_> = node
            .children()
            .iter()
            .filter_map(|c| c.block_id())
            .map(|id| id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_depth_limit() {
        let registry = Registry::builtin();
        let renderer = Renderer::new(&registry, RenderOptions { max_depth: 3 });

        let mut tree = block(&registry, "leaf", BlockType::Text);
        for i in 0..3 {
            tree = block(&registry, &format!("s{}", i), BlockType::Section).with_child(tree);
        }

        assert_eq!(
            renderer.render_block(&tree),
            Err(RenderError::BlockTreeTooDeep { depth: 4, max: 3 })
        );
        assert!(renderer.render_block(&tree.children()[0]).is_ok());
    }

    #[test]
    fn test_unregistered_type_fails() {
        let registry = Registry::with_types(&[BlockType::Hero]).unwrap();
        let renderer = Renderer::with_defaults(&registry);
        let faq = Block::new("f".into(), BlockType::Faq, PropertyMap::new());

        let err = renderer.render_block(&faq).unwrap_err();
        assert_eq!(err, RenderError::UnknownBlockType("faq".to_string()));
        assert_eq!(err.to_string(), "Unknown block type: faq");

        // Registered types with bad properties still render
        let mut props = PropertyMap::new();
        props.insert("title".to_string(), serde_json::json!(42));
        let hero = Block::new("h".into(), BlockType::Hero, props);
        assert!(renderer.render_block(&hero).is_ok());
    }

    #[test]
    fn test_render_page_replaces_broken_sections() {
        let registry = Registry::with_types(&[BlockType::Hero]).unwrap();
        let renderer = Renderer::with_defaults(&registry);

        let mut page = PageDocument::blank(Slug::parse("home").unwrap(), "Home");
        page.sections = vec![
            registry.new_block(BlockType::Hero, "h".into()).unwrap(),
            Block::new("f".into(), BlockType::Faq, PropertyMap::new()),
        ];

        let rendered = renderer.render_page(&page);
        assert_eq!(rendered.nodes.len(), 2);
        assert!(matches!(rendered.nodes[1], VNode::Placeholder { .. }));
    }

    #[test]
    fn test_custom_code_is_raw() {
        let registry = Registry::builtin();
        let renderer = Renderer::with_defaults(&registry);
        let code = block(&registry, "c", BlockType::CustomCode)
            .with_property("html", json!("<marquee>hi</marquee>"));

        let node = renderer.render_block(&code).unwrap();
        match &node.children()[0] {
            VNode::Raw { markup } => assert_eq!(markup.as_unescaped_str(), "<marquee>hi</marquee>"),
            other => panic!("Expected raw node, got {:?}", other),
        }
    }

    #[test]
    fn test_meta_title_preferred() {
        let registry = Registry::builtin();
        let renderer = Renderer::with_defaults(&registry);
        let mut page = PageDocument::blank(Slug::parse("home").unwrap(), "Home");
        page.meta_title = Some("Acme | Home".to_string());
        page.custom_css = Some(UntrustedMarkup::new("   "));

        let rendered = renderer.render_page(&page);
        assert_eq!(rendered.title, "Acme | Home");
        assert!(rendered.custom_css.is_none());
    }
}
