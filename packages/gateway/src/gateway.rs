use crate::error::GatewayResult;
use async_trait::async_trait;
use pagecraft_blocks::{PageDocument, PageInput, PageSummary};
use std::sync::Arc;

/// Storage for page documents.
///
/// Implementations own id assignment and timestamps. Slugs are unique across
/// all pages: `create_page` and `update_page` fail with `SlugTaken` instead of
/// creating a second page for the same URL.
#[async_trait]
pub trait PageGateway: Send + Sync {
    /// Fetch a page by its URL slug, whatever its status
    async fn get_page_by_slug(&self, slug: &str) -> GatewayResult<PageDocument>;

    async fn get_page(&self, id: &str) -> GatewayResult<PageDocument>;

    async fn create_page(&self, input: PageInput) -> GatewayResult<PageDocument>;

    async fn update_page(&self, id: &str, input: PageInput) -> GatewayResult<PageDocument>;

    async fn delete_page(&self, id: &str) -> GatewayResult<()>;

    /// All pages, sorted by slug
    async fn list_pages(&self) -> GatewayResult<Vec<PageSummary>>;
}

#[async_trait]
impl<T: PageGateway + ?Sized> PageGateway for Arc<T> {
    async fn get_page_by_slug(&self, slug: &str) -> GatewayResult<PageDocument> {
        (**self).get_page_by_slug(slug).await
    }

    async fn get_page(&self, id: &str) -> GatewayResult<PageDocument> {
        (**self).get_page(id).await
    }

    async fn create_page(&self, input: PageInput) -> GatewayResult<PageDocument> {
        (**self).create_page(input).await
    }

    async fn update_page(&self, id: &str, input: PageInput) -> GatewayResult<PageDocument> {
        (**self).update_page(id, input).await
    }

    async fn delete_page(&self, id: &str) -> GatewayResult<()> {
        (**self).delete_page(id).await
    }

    async fn list_pages(&self) -> GatewayResult<Vec<PageSummary>> {
        (**self).list_pages().await
    }
}
