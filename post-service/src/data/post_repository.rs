use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) owner_id: Uuid,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
}

/// Same wire-level list request shape as the other services; empty strings
/// mean "absent" and every key is checked against the column allow-list.
#[derive(Debug, Clone, Default)]
pub(crate) struct ListQuery {
    pub(crate) page: i64,
    pub(crate) limit: i64,
    pub(crate) field: String,
    pub(crate) value: String,
    pub(crate) sort_by: String,
    pub(crate) started_at: String,
    pub(crate) ended_at: String,
    pub(crate) filters: Vec<(String, String)>,
}

pub(crate) fn offset(page: i64, limit: i64) -> i64 {
    limit * (page - 1).max(0)
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create(&self, input: NewPost) -> Result<Post, DomainError>;
    /// Fetches one live post and bumps its view counter.
    async fn get(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn get_all(&self, query: ListQuery) -> Result<(Vec<Post>, i64), DomainError>;
    async fn get_by_owner(
        &self,
        owner_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Post>, i64), DomainError>;
    async fn update(&self, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
