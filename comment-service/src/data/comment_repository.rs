use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) content: String,
    pub(crate) post_id: Uuid,
    pub(crate) owner_id: Uuid,
}

#[derive(Debug, Clone)]
pub(crate) struct CommentPatch {
    pub(crate) id: Uuid,
    pub(crate) content: String,
}

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
pub(crate) trait CommentRepository: Send + Sync {
    async fn create(&self, input: NewComment) -> Result<Comment, DomainError>;
    /// Fetches one live comment and bumps its view counter.
    async fn get(&self, id: Uuid) -> Result<Option<Comment>, DomainError>;
    async fn get_all(&self, query: ListQuery) -> Result<(Vec<Comment>, i64), DomainError>;
    async fn update(&self, patch: CommentPatch) -> Result<Option<Comment>, DomainError>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
