use crate::error::{GatewayError, GatewayResult};
use crate::gateway::PageGateway;
use async_trait::async_trait;
use chrono::Utc;
use pagecraft_blocks::{PageDocument, PageInput, PageSummary, Slug};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// In-process page store keyed by page id
#[derive(Debug)]
pub struct MemoryGateway {
    pages: RwLock<BTreeMap<String, PageDocument>>,
    available: AtomicBool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            pages: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: while unavailable every call fails with
    /// `ServiceUnavailable`
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> GatewayResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GatewayError::ServiceUnavailable(
                "memory gateway is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn slug_owner<'a>(pages: &'a BTreeMap<String, PageDocument>, slug: &Slug) -> Option<&'a str> {
    pages
        .values()
        .find(|page| &page.slug == slug)
        .map(|page| page.id.as_str())
}

#[async_trait]
impl PageGateway for MemoryGateway {
    async fn get_page_by_slug(&self, slug: &str) -> GatewayResult<PageDocument> {
        self.check_available()?;
        let slug = Slug::parse(slug)?;
        let pages = self.pages.read().await;

        pages
            .values()
            .find(|page| page.slug == slug)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(slug.to_string()))
    }

    async fn get_page(&self, id: &str) -> GatewayResult<PageDocument> {
        self.check_available()?;
        let pages = self.pages.read().await;

        pages
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input), fields(slug = %input.slug))]
    async fn create_page(&self, input: PageInput) -> GatewayResult<PageDocument> {
        self.check_available()?;
        let mut pages = self.pages.write().await;

        if slug_owner(&pages, &input.slug).is_some() {
            return Err(GatewayError::SlugTaken(input.slug));
        }

        let id = Uuid::new_v4().to_string();
        let page = PageDocument::from_input(id.clone(), input, Utc::now());
        pages.insert(id.clone(), page.clone());

        debug!(page_id = %id, "Created page");
        Ok(page)
    }

    #[instrument(skip(self, input), fields(slug = %input.slug))]
    async fn update_page(&self, id: &str, input: PageInput) -> GatewayResult<PageDocument> {
        self.check_available()?;
        let mut pages = self.pages.write().await;

        let created_at = pages
            .get(id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?
            .created_at;

        if matches!(slug_owner(&pages, &input.slug), Some(owner) if owner != id) {
            return Err(GatewayError::SlugTaken(input.slug));
        }

        let mut page = PageDocument::from_input(id, input, Utc::now());
        page.created_at = created_at.or(page.created_at);
        pages.insert(id.to_string(), page.clone());

        debug!(page_id = %id, "Updated page");
        Ok(page)
    }

    async fn delete_page(&self, id: &str) -> GatewayResult<()> {
        self.check_available()?;
        let mut pages = self.pages.write().await;

        pages
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn list_pages(&self) -> GatewayResult<Vec<PageSummary>> {
        self.check_available()?;
        let pages = self.pages.read().await;

        let mut summaries: Vec<_> = pages.values().map(PageDocument::summary).collect();
        summaries.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::PageStatus;

    fn input(slug: &str) -> PageInput {
        PageDocument::blank(Slug::parse(slug).unwrap(), slug).to_input()
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let gateway = MemoryGateway::new();
        let page = gateway.create_page(input("about")).await.unwrap();

        assert!(page.is_persisted());
        assert!(page.created_at.is_some());
        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(gateway.get_page(&page.id).await.unwrap(), page);
    }

    #[tokio::test]
    async fn test_slug_collisions_rejected() {
        let gateway = MemoryGateway::new();
        gateway.create_page(input("about")).await.unwrap();
        let pricing = gateway.create_page(input("pricing")).await.unwrap();

        assert!(matches!(
            gateway.create_page(input("about")).await,
            Err(GatewayError::SlugTaken(_))
        ));
        assert!(matches!(
            gateway.update_page(&pricing.id, input("about")).await,
            Err(GatewayError::SlugTaken(_))
        ));

        // Keeping its own slug is fine
        assert!(gateway.update_page(&pricing.id, input("pricing")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let gateway = MemoryGateway::new();
        let page = gateway.create_page(input("about")).await.unwrap();

        let mut changed = page.to_input();
        changed.title = "About us".to_string();
        let updated = gateway.update_page(&page.id, changed).await.unwrap();

        assert_eq!(updated.created_at, page.created_at);
        assert_eq!(updated.title, "About us");
    }

    #[tokio::test]
    async fn test_outage() {
        let gateway = MemoryGateway::new();
        gateway.set_available(false);
        assert!(matches!(
            gateway.list_pages().await,
            Err(GatewayError::ServiceUnavailable(_))
        ));
        gateway.set_available(true);
        assert!(gateway.list_pages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_by_slug() {
        let gateway = MemoryGateway::new();
        for slug in ["pricing", "about", "blog/launch"] {
            gateway.create_page(input(slug)).await.unwrap();
        }

        let slugs: Vec<_> = gateway
            .list_pages()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug.to_string())
            .collect();
        assert_eq!(slugs, vec!["about", "blog/launch", "pricing"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let gateway = MemoryGateway::new();
        let page = gateway.create_page(input("about")).await.unwrap();
        gateway.delete_page(&page.id).await.unwrap();
        assert!(matches!(
            gateway.get_page(&page.id).await,
            Err(GatewayError::NotFound(_))
        ));
    }
}
