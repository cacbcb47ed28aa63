use crate::domain::document::{Document, Filter};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Collection of documents queried through equality filters.
#[async_trait]
pub trait DocumentRepository<D: Document>: Send + Sync {
    async fn insert(&self, document: D) -> Result<D>;
    async fn find(&self, filter: &Filter) -> Result<Vec<D>>;
    async fn find_one(&self, filter: &Filter) -> Result<Option<D>>;
    /// Applies `patch` to the single document matching `filter`, validating
    /// the result before it is stored.
    async fn find_one_and_update(&self, filter: &Filter, patch: &D::Patch) -> Result<Option<D>>;
    async fn find_one_and_delete(&self, filter: &Filter) -> Result<Option<D>>;
    async fn delete_many(&self, filter: &Filter) -> Result<usize>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
}
