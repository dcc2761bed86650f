use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct UserPatch {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
}

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

/// List request as it arrives over the wire. Empty strings mean "absent";
/// the repository validates every key against its column allow-list.
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
pub(crate) trait UserRepository: Send + Sync {
    async fn create(&self, input: NewUser) -> Result<User, DomainError>;
    async fn get_by_field(&self, field: &str, value: &str) -> Result<Option<User>, DomainError>;
    async fn get_all(&self, query: ListQuery) -> Result<(Vec<User>, i64), DomainError>;
    async fn update(&self, patch: UserPatch) -> Result<Option<User>, DomainError>;
    async fn soft_delete(&self, field: &str, value: &str) -> Result<bool, DomainError>;
    async fn check_uniques(&self, field: &str, value: &str) -> Result<bool, DomainError>;
    async fn find_credentials(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::offset;

    #[test]
    fn offset_is_limit_times_page_minus_one() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(2, 10), 10);
        assert_eq!(offset(3, 5), 10);
    }

    #[test]
    fn offset_never_goes_negative() {
        assert_eq!(offset(0, 10), 0);
        assert_eq!(offset(-3, 10), 0);
    }
}
