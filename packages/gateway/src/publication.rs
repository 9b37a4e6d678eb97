//! # Publication Gate
//!
//! The only way public routes read pages. A page is visible iff it exists
//! and is `Published`. Callers get one of three answers and nothing else:
//! a missing page, a draft and a malformed slug all look the same from
//! outside.

use crate::error::GatewayError;
use crate::gateway::PageGateway;
use pagecraft_blocks::PageDocument;
use pagecraft_renderer::{not_found_page, unavailable_page, RenderedPage, Renderer};
use tracing::{debug, error, instrument, warn};

/// Outcome of a public page lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PublicLookup {
    Found(PageDocument),
    NotFound,
    Unavailable,
}

/// A rendered public response
#[derive(Debug, Clone, PartialEq)]
pub struct PublicPage {
    /// HTTP-style status: 200, 404 or 503
    pub status: u16,
    pub page: RenderedPage,
}

/// Read-only public view over a gateway
pub struct PublicPages<G> {
    gateway: G,
}

impl<G: PageGateway> PublicPages<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    #[instrument(skip(self))]
    pub async fn lookup(&self, slug: &str) -> PublicLookup {
        match self.gateway.get_page_by_slug(slug).await {
            Ok(page) if page.is_published() => PublicLookup::Found(page),
            Ok(_) => {
                debug!(reason = "draft", "Page hidden from public view");
                PublicLookup::NotFound
            }
            Err(GatewayError::NotFound(_)) => {
                debug!(reason = "missing", "Page hidden from public view");
                PublicLookup::NotFound
            }
            Err(GatewayError::InvalidSlug { .. }) => {
                debug!(reason = "invalid slug", "Page hidden from public view");
                PublicLookup::NotFound
            }
            Err(GatewayError::ServiceUnavailable(reason)) => {
                warn!(%reason, "Content service unavailable");
                PublicLookup::Unavailable
            }
            Err(e) => {
                error!(error = %e, "Page lookup failed");
                PublicLookup::Unavailable
            }
        }
    }

    /// Look up and render a page, falling back to the static pages
    pub async fn render(&self, slug: &str, renderer: &Renderer<'_>) -> PublicPage {
        match self.lookup(slug).await {
            PublicLookup::Found(page) => PublicPage {
                status: 200,
                page: renderer.render_page(&page),
            },
            PublicLookup::NotFound => PublicPage {
                status: 404,
                page: not_found_page(),
            },
            PublicLookup::Unavailable => PublicPage {
                status: 503,
                page: unavailable_page(),
            },
        }
    }
}
