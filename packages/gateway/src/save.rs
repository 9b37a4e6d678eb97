//! # Save Coordination
//!
//! At most one save per key is in flight. A second save under the same key
//! while the first is running fails fast with `SaveAlreadyInFlight`; the
//! caller keeps its dirty state and retries later.
//!
//! Callers holding a builder session pass the session's own key, which stays
//! the same while the slug is edited during a create. `save_key` covers
//! one-off saves that have no session.
//!
//! Writes run in their own tokio task, so dropping the future returned by
//! `save` never interrupts a write halfway. The page's slot is released when
//! that task finishes.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::PageGateway;
use pagecraft_blocks::PageDocument;
use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

pub struct SaveCoordinator<G> {
    gateway: Arc<G>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl<G> Clone for SaveCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

/// Key for a save with no builder session behind it: the page's id once
/// created, its slug before that
pub fn save_key(page: &PageDocument) -> String {
    if page.is_persisted() {
        format!("id:{}", page.id)
    } else {
        format!("slug:{}", page.slug)
    }
}

fn lock(set: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    // The set stays consistent even if a holder panicked
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks a key in flight until dropped
struct InFlight {
    set: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    fn acquire(set: Arc<Mutex<HashSet<String>>>, key: String) -> GatewayResult<Self> {
        if !lock(&set).insert(key.clone()) {
            return Err(GatewayError::SaveAlreadyInFlight(key));
        }
        Ok(Self { set, key })
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.key);
    }
}

impl<G: PageGateway + 'static> SaveCoordinator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Whether a save under `key` is running
    pub fn is_saving(&self, key: &str) -> bool {
        lock(&self.in_flight).contains(key)
    }

    /// Create or update `page` on the gateway and return the stored version.
    /// `key` names the working copy; one save per key runs at a time.
    #[instrument(skip(self, key, page), fields(slug = %page.slug, page_id = %page.id))]
    pub async fn save(&self, key: impl Into<String>, page: PageDocument) -> GatewayResult<PageDocument> {
        let key = key.into();
        let slot = match InFlight::acquire(self.in_flight.clone(), key) {
            Ok(slot) => slot,
            Err(e) => {
                warn!("Rejected concurrent save");
                return Err(e);
            }
        };

        let gateway = self.gateway.clone();
        let task = tokio::spawn(async move {
            let _slot = slot;
            let input = page.to_input();
            if page.is_persisted() {
                gateway.update_page(&page.id, input).await
            } else {
                gateway.create_page(input).await
            }
        });

        match task.await {
            Ok(Ok(saved)) => {
                info!(page_id = %saved.id, "Saved page");
                Ok(saved)
            }
            Ok(Err(e)) => {
                debug!(error = %e, "Save failed");
                Err(e)
            }
            Err(join_error) => Err(GatewayError::Io(io::Error::new(
                io::ErrorKind::Other,
                format!("save task failed: {}", join_error),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryGateway;
    use pagecraft_blocks::Slug;

    #[test]
    fn test_save_key() {
        let mut page = PageDocument::blank(Slug::parse("about").unwrap(), "About");
        assert_eq!(save_key(&page), "slug:about");
        page.id = "abc".to_string();
        assert_eq!(save_key(&page), "id:abc");
    }

    #[test]
    fn test_in_flight_released_on_drop() {
        let set = Arc::new(Mutex::new(HashSet::new()));
        let slot = InFlight::acquire(set.clone(), "k".to_string()).unwrap();
        assert!(matches!(
            InFlight::acquire(set.clone(), "k".to_string()),
            Err(GatewayError::SaveAlreadyInFlight(_))
        ));
        drop(slot);
        assert!(InFlight::acquire(set, "k".to_string()).is_ok());
    }

    #[tokio::test]
    async fn test_first_save_creates_then_updates() {
        let coordinator = SaveCoordinator::new(Arc::new(MemoryGateway::new()));
        let page = PageDocument::blank(Slug::parse("about").unwrap(), "About");

        let created = coordinator.save(save_key(&page), page).await.unwrap();
        assert!(created.is_persisted());

        let mut edited = created.clone();
        edited.title = "About us".to_string();
        let updated = coordinator.save(save_key(&edited), edited).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "About us");
        assert!(!coordinator.is_saving(&save_key(&updated)));
    }
}
