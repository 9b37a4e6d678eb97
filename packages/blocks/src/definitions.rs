//! Built-in block catalogue.

use crate::schema::{PropertyKind as K, PropertySpec as P};
use crate::{BlockDefinition, BlockType, Category, PropertyMap};
use serde_json::{json, Value};

const ALIGNMENT: K = K::Choice(&["left", "center", "right"]);
const SIZE: K = K::Choice(&["none", "small", "medium", "large"]);
const VARIANT: K = K::Choice(&["primary", "secondary", "outline"]);

const fn range(min: f64, max: f64) -> K {
    K::Number {
        min: Some(min),
        max: Some(max),
    }
}

const SECTION: &[P] = &[
    P::new("background", K::Color),
    P::new("padding", SIZE),
    P::new("anchor", K::Text),
    P::new("fullWidth", K::Boolean),
];

const COLUMNS: &[P] = &[
    P::new("columns", range(1.0, 6.0)).required(),
    P::new("gap", SIZE),
    P::new("stackOnMobile", K::Boolean),
];

const SPACER: &[P] = &[P::new("height", range(0.0, 400.0)).required()];

const DIVIDER: &[P] = &[
    P::new("style", K::Choice(&["solid", "dashed", "dotted"])),
    P::new("color", K::Color),
];

const HERO: &[P] = &[
    P::new("title", K::Text).required(),
    P::new("subtitle", K::RichText),
    P::new("backgroundImage", K::Url),
    P::new("ctaLabel", K::Text),
    P::new("ctaUrl", K::Url),
    P::new("alignment", ALIGNMENT),
];

const HEADING: &[P] = &[
    P::new("text", K::Text).required(),
    P::new("level", range(1.0, 6.0)),
    P::new("alignment", ALIGNMENT),
];

const TEXT: &[P] = &[
    P::new("content", K::RichText).required(),
    P::new("alignment", ALIGNMENT),
];

const FEATURE_ITEM: &[P] = &[
    P::new("title", K::Text).required(),
    P::new("description", K::RichText),
    P::new("icon", K::Text),
];

const FEATURES: &[P] = &[
    P::new("title", K::Text),
    P::new("items", K::List(FEATURE_ITEM)),
];

const TESTIMONIAL_ITEM: &[P] = &[
    P::new("quote", K::RichText).required(),
    P::new("author", K::Text).required(),
    P::new("role", K::Text),
    P::new("avatar", K::Url),
];

const TESTIMONIALS: &[P] = &[
    P::new("title", K::Text),
    P::new("items", K::List(TESTIMONIAL_ITEM)),
];

const STAT_ITEM: &[P] = &[
    P::new("value", K::Text).required(),
    P::new("label", K::Text).required(),
];

const STATS: &[P] = &[P::new("items", K::List(STAT_ITEM))];

const CALL_TO_ACTION: &[P] = &[
    P::new("title", K::Text).required(),
    P::new("description", K::RichText),
    P::new("buttonLabel", K::Text),
    P::new("buttonUrl", K::Url),
    P::new("variant", VARIANT),
];

const IMAGE: &[P] = &[
    P::new("src", K::Url),
    P::new("alt", K::Text),
    P::new("caption", K::Text),
    P::new("rounded", K::Boolean),
];

const GALLERY_ITEM: &[P] = &[P::new("src", K::Url).required(), P::new("alt", K::Text)];

const GALLERY: &[P] = &[
    P::new("images", K::List(GALLERY_ITEM)),
    P::new("columns", range(1.0, 6.0)),
];

const VIDEO: &[P] = &[
    P::new("url", K::Url),
    P::new("poster", K::Url),
    P::new("autoplay", K::Boolean),
    P::new("controls", K::Boolean),
];

const BUTTON: &[P] = &[
    P::new("label", K::Text).required(),
    P::new("url", K::Url),
    P::new("variant", VARIANT),
    P::new("openInNewTab", K::Boolean),
];

const FAQ_ITEM: &[P] = &[
    P::new("question", K::Text).required(),
    P::new("answer", K::RichText).required(),
];

const FAQ: &[P] = &[P::new("title", K::Text), P::new("items", K::List(FAQ_ITEM))];

const PRICING_PLAN: &[P] = &[
    P::new("name", K::Text).required(),
    P::new("price", K::Text).required(),
    P::new("period", K::Text),
    P::new("features", K::RichText),
    P::new("ctaLabel", K::Text),
    P::new("ctaUrl", K::Url),
    P::new("highlighted", K::Boolean),
];

const PRICING: &[P] = &[
    P::new("title", K::Text),
    P::new("plans", K::List(PRICING_PLAN)),
];

const FORM_FIELD: &[P] = &[
    P::new("name", K::Text).required(),
    P::new("label", K::Text).required(),
    P::new("inputType", K::Choice(&["text", "email", "tel", "number", "textarea"])),
    P::new("required", K::Boolean),
];

const FORM: &[P] = &[
    P::new("title", K::Text),
    P::new("action", K::Url),
    P::new("submitLabel", K::Text),
    P::new("successMessage", K::Text),
    P::new("fields", K::List(FORM_FIELD)),
];

const CUSTOM_CODE: &[P] = &[P::new("html", K::RawMarkup)];

const EMBED: &[P] = &[
    P::new("url", K::Url).required(),
    P::new("title", K::Text),
    P::new("height", range(0.0, 2000.0)),
];

fn props(value: Value) -> PropertyMap {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => PropertyMap::new(),
    }
}

fn define(
    block_type: BlockType,
    label: &'static str,
    icon: &'static str,
    category: Category,
    description: &'static str,
    properties: &'static [P],
    defaults: Value,
) -> BlockDefinition {
    BlockDefinition {
        block_type,
        label,
        icon,
        category,
        description,
        properties,
        default_properties: props(defaults),
    }
}

/// One definition per `BlockType`, in palette order
pub(crate) fn builtin_definitions() -> Vec<BlockDefinition> {
    use BlockType::*;
    use Category::*;

    vec![
        define(Section, "Section", "square", Layout, "Full-width wrapper for other blocks", SECTION,
            json!({ "padding": "medium", "fullWidth": false })),
        define(Columns, "Columns", "columns", Layout, "Side-by-side column layout", COLUMNS,
            json!({ "columns": 2, "gap": "medium", "stackOnMobile": true })),
        define(Spacer, "Spacer", "move-vertical", Layout, "Vertical whitespace", SPACER,
            json!({ "height": 48 })),
        define(Divider, "Divider", "minus", Layout, "Horizontal rule", DIVIDER,
            json!({ "style": "solid", "color": "#e5e7eb" })),

        define(Hero, "Hero", "sparkles", Content, "Large headline with call to action", HERO,
            json!({
                "title": "Build something great",
                "subtitle": "Tell visitors what makes you different.",
                "ctaLabel": "Get started",
                "ctaUrl": "#",
                "alignment": "center"
            })),
        define(Heading, "Heading", "heading", Content, "Section title", HEADING,
            json!({ "text": "Heading", "level": 2, "alignment": "left" })),
        define(Text, "Text", "type", Content, "Paragraphs of text", TEXT,
            json!({ "content": "Start writing here.", "alignment": "left" })),
        define(Features, "Features", "layout-grid", Content, "Grid of feature highlights", FEATURES,
            json!({
                "title": "Features",
                "items": [
                    { "title": "Fast", "description": "Pages load in an instant.", "icon": "zap" },
                    { "title": "Secure", "description": "Built with safety in mind.", "icon": "shield" },
                    { "title": "Flexible", "description": "Adapts to your workflow.", "icon": "settings" }
                ]
            })),
        define(Testimonials, "Testimonials", "quote", Content, "Customer quotes", TESTIMONIALS,
            json!({
                "title": "What our customers say",
                "items": [
                    { "quote": "It changed how we work.", "author": "Alex Doe", "role": "CTO" }
                ]
            })),
        define(Stats, "Stats", "bar-chart", Content, "Key figures", STATS,
            json!({
                "items": [
                    { "value": "99.9%", "label": "Uptime" },
                    { "value": "24/7", "label": "Support" }
                ]
            })),
        define(CallToAction, "Call to action", "megaphone", Content, "Banner with a single action", CALL_TO_ACTION,
            json!({
                "title": "Ready to get started?",
                "buttonLabel": "Contact us",
                "buttonUrl": "/contact",
                "variant": "primary"
            })),

        define(Image, "Image", "image", Media, "Single image with caption", IMAGE,
            json!({ "src": "", "alt": "", "rounded": false })),
        define(Gallery, "Gallery", "images", Media, "Grid of images", GALLERY,
            json!({ "images": [], "columns": 3 })),
        define(Video, "Video", "video", Media, "Embedded video player", VIDEO,
            json!({ "url": "", "autoplay": false, "controls": true })),

        define(Button, "Button", "mouse-pointer", Interactive, "Link styled as a button", BUTTON,
            json!({ "label": "Click me", "url": "#", "variant": "primary", "openInNewTab": false })),
        define(Faq, "FAQ", "help-circle", Interactive, "Expandable questions and answers", FAQ,
            json!({
                "title": "Frequently asked questions",
                "items": [
                    { "question": "How does it work?", "answer": "Add blocks and publish." }
                ]
            })),
        define(Pricing, "Pricing", "credit-card", Interactive, "Plan comparison table", PRICING,
            json!({
                "title": "Pricing",
                "plans": [
                    { "name": "Starter", "price": "$0", "period": "month", "ctaLabel": "Start free", "ctaUrl": "/signup" },
                    { "name": "Pro", "price": "$29", "period": "month", "ctaLabel": "Upgrade", "ctaUrl": "/signup", "highlighted": true }
                ]
            })),
        define(Form, "Form", "clipboard", Interactive, "Contact or signup form", FORM,
            json!({
                "title": "Get in touch",
                "action": "",
                "submitLabel": "Send",
                "successMessage": "Thanks! We'll be in touch.",
                "fields": [
                    { "name": "email", "label": "Email", "inputType": "email", "required": true },
                    { "name": "message", "label": "Message", "inputType": "textarea" }
                ]
            })),

        define(CustomCode, "Custom code", "code", Advanced, "Raw HTML, rendered unescaped", CUSTOM_CODE,
            json!({ "html": "" })),
        define(Embed, "Embed", "external-link", Advanced, "Third-party page in an iframe", EMBED,
            json!({ "url": "https://example.com", "height": 400 })),
    ]
}
