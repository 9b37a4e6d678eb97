//! # Pagecraft Renderer
//!
//! Turns blocks into a render tree and the render tree into HTML.
//!
//! ## Architecture
//!
//! ```text
//! PageDocument ──render_page──▶ RenderedPage { nodes: Vec<VNode> }
//!                                     │
//!                          html::to_html(HtmlOptions)
//!                                     ▼
//!                                   String
//! ```
//!
//! The builder canvas consumes the `VNode` tree directly (each block root
//! carries its `block_id`). The CLI and previews go through `html`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_renderer::{html, HtmlOptions, RawMarkupPolicy, Renderer};
//!
//! let renderer = Renderer::with_defaults(Registry::shared());
//! let page = renderer.render_page(&document);
//! let out = html::to_html(&page, &HtmlOptions::new(RawMarkupPolicy::Escape));
//! ```

pub mod html;
mod pages;
mod renderer;
mod vnode;

pub use html::{HtmlOptions, RawMarkupPolicy};
pub use pages::{not_found_page, unavailable_page};
pub use renderer::{RenderError, RenderOptions, RenderResult, RenderedPage, Renderer, DEFAULT_MAX_DEPTH};
pub use vnode::VNode;
