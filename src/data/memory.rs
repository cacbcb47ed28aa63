use crate::domain::document::{Document, Filter};
use crate::domain::repository::DocumentRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

/// Document collection kept in process memory.
///
/// Every conditional write runs under a single write lock, so an update or
/// delete matches and mutates at most one document atomically.
#[derive(Clone)]
pub struct InMemoryCollection<D: Document> {
    storage: Arc<RwLock<HashMap<Uuid, D>>>,
}

impl<D: Document> InMemoryCollection<D> {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.storage.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.storage.read().await.is_empty()
    }
}

impl<D: Document> Default for InMemoryCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> DocumentRepository<D> for InMemoryCollection<D> {
    #[instrument(skip_all, fields(collection = D::NAME, id = %document.id()))]
    async fn insert(&self, document: D) -> Result<D> {
        trace!("Acquiring write lock");
        let mut storage = self.storage.write().await;
        storage.insert(document.id(), document.clone());
        debug!(id = %document.id(), owner_id = %document.owner_id(), "Document inserted");
        Ok(document)
    }

    #[instrument(skip(self), fields(collection = D::NAME))]
    async fn find(&self, filter: &Filter) -> Result<Vec<D>> {
        trace!("Acquiring read lock");
        let storage = self.storage.read().await;
        let found: Vec<D> = storage
            .values()
            .filter(|doc| filter.matches(*doc))
            .cloned()
            .collect();
        debug!(count = found.len(), "Documents found");
        Ok(found)
    }

    #[instrument(skip(self), fields(collection = D::NAME))]
    async fn find_one(&self, filter: &Filter) -> Result<Option<D>> {
        trace!("Acquiring read lock");
        let storage = self.storage.read().await;
        let found = storage.values().find(|doc| filter.matches(*doc)).cloned();
        if found.is_none() {
            trace!("No document matched");
        }
        Ok(found)
    }

    #[instrument(skip(self, patch), fields(collection = D::NAME))]
    async fn find_one_and_update(&self, filter: &Filter, patch: &D::Patch) -> Result<Option<D>> {
        trace!("Acquiring write lock");
        let mut storage = self.storage.write().await;
        let Some(current) = storage.values_mut().find(|doc| filter.matches(&**doc)) else {
            trace!("No document matched");
            return Ok(None);
        };

        let mut updated = current.clone();
        updated.apply(patch);
        updated.validate()?;
        updated.touch(Utc::now());
        *current = updated.clone();

        debug!(id = %updated.id(), "Document updated");
        Ok(Some(updated))
    }

    #[instrument(skip(self), fields(collection = D::NAME))]
    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<D>> {
        trace!("Acquiring write lock");
        let mut storage = self.storage.write().await;
        let id = storage
            .values()
            .find(|doc| filter.matches(*doc))
            .map(|doc| doc.id());
        let removed = id.and_then(|id| storage.remove(&id));
        if let Some(doc) = &removed {
            debug!(id = %doc.id(), "Document deleted");
        }
        Ok(removed)
    }

    #[instrument(skip(self), fields(collection = D::NAME))]
    async fn delete_many(&self, filter: &Filter) -> Result<usize> {
        trace!("Acquiring write lock");
        let mut storage = self.storage.write().await;
        let before = storage.len();
        storage.retain(|_, doc| !filter.matches(doc));
        let deleted = before - storage.len();
        debug!(deleted = deleted, "Documents deleted");
        Ok(deleted)
    }
}
