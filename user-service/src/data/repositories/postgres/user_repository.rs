use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::data::repositories::postgres::columns::{filter_column, sort_column};
use crate::data::user_repository::{
    ListQuery, NewUser, UserCredentials, UserPatch, UserRepository, offset,
};
use crate::domain::error::DomainError;
use crate::domain::user::User;

const USER_COLUMNS: &str = "id, name, last_name, username, email, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    last_name: String,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    id: Uuid,
    name: String,
    last_name: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            last_name: row.last_name,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CredentialsRow> for UserCredentials {
    fn from(row: CredentialsRow) -> Self {
        Self {
            user: User {
                id: row.id,
                name: row.name,
                last_name: row.last_name,
                username: row.username,
                email: row.email,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, last_name, username, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, last_name, username, email, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.last_name)
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get_by_field(&self, field: &str, value: &str) -> Result<Option<User>, DomainError> {
        let column = resolve_filter_column(field)?;
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column}::text = $1 AND deleted_at IS NULL"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }

    async fn get_all(&self, query: ListQuery) -> Result<(Vec<User>, i64), DomainError> {
        let conditions = build_conditions(&query)?;
        let order_by = match query.sort_by.as_str() {
            "" => None,
            name => Some(
                sort_column(name).ok_or_else(|| DomainError::UnknownColumn(name.to_string()))?,
            ),
        };

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE deleted_at IS NULL"
        ));
        push_conditions(&mut builder, &conditions);
        if let Some(column) = order_by {
            builder.push(" ORDER BY ").push(column);
        }
        builder
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(offset(query.page, query.limit));

        let rows = builder
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT count(1) FROM users WHERE deleted_at IS NULL");
        push_conditions(&mut count_builder, &conditions);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(User::from).collect(), total))
    }

    async fn update(&self, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET updated_at = NOW(),
                name = $2,
                last_name = $3,
                username = $4,
                email = $5
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, last_name, username, email, created_at, updated_at
            "#,
        )
        .bind(patch.id)
        .bind(&patch.name)
        .bind(&patch.last_name)
        .bind(&patch.username)
        .bind(&patch.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }

    async fn soft_delete(&self, field: &str, value: &str) -> Result<bool, DomainError> {
        let column = resolve_filter_column(field)?;
        let sql = format!(
            "UPDATE users SET deleted_at = NOW() WHERE {column}::text = $1 AND deleted_at IS NULL"
        );

        let result = sqlx::query(&sql)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn check_uniques(&self, field: &str, value: &str) -> Result<bool, DomainError> {
        let column = resolve_filter_column(field)?;
        let sql = format!(
            "SELECT count(1) FROM users WHERE {column}::text = $1 AND deleted_at IS NULL"
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count > 0)
    }

    async fn find_credentials(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT id, name, last_name, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE deleted_at IS NULL
              AND ((email = $1 AND $1 <> '') OR (username = $2 AND $2 <> ''))
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(UserCredentials::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.get_by_field("email", email).await
    }
}

struct Conditions {
    equals: Vec<(&'static str, String)>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

fn build_conditions(query: &ListQuery) -> Result<Conditions, DomainError> {
    let mut equals = Vec::new();
    if !query.field.is_empty() {
        equals.push((resolve_filter_column(&query.field)?, query.value.clone()));
    }
    for (key, value) in &query.filters {
        equals.push((resolve_filter_column(key)?, value.clone()));
    }

    Ok(Conditions {
        equals,
        started_at: parse_time_bound("started_at", &query.started_at)?,
        ended_at: parse_time_bound("ended_at", &query.ended_at)?,
    })
}

fn push_conditions(builder: &mut QueryBuilder<'_, Postgres>, conditions: &Conditions) {
    for (column, value) in &conditions.equals {
        builder
            .push(" AND ")
            .push(*column)
            .push("::text = ")
            .push_bind(value.clone());
    }
    if let Some(bound) = conditions.started_at {
        builder.push(" AND created_at >= ").push_bind(bound);
    }
    if let Some(bound) = conditions.ended_at {
        builder.push(" AND created_at <= ").push_bind(bound);
    }
}

fn resolve_filter_column(field: &str) -> Result<&'static str, DomainError> {
    filter_column(field).ok_or_else(|| DomainError::UnknownColumn(field.to_string()))
}

fn parse_time_bound(
    field: &'static str,
    raw: &str,
) -> Result<Option<DateTime<Utc>>, DomainError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_time(NaiveTime::MIN);
        return Ok(Some(DateTime::from_naive_utc_and_offset(midnight, Utc)));
    }
    Err(DomainError::Validation {
        field,
        message: "expected RFC 3339 or YYYY-MM-DD",
    })
}

fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some("23505")
    {
        let resource = match db_err.constraint() {
            Some("users_username_live_key") => "username",
            Some("users_email_live_key") => "email",
            _ => "user",
        };
        return DomainError::AlreadyExists(resource.to_string());
    }
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;

    use super::{PostgresUserRepository, parse_time_bound};
    use crate::data::user_repository::{ListQuery, NewUser, UserRepository};
    use crate::domain::error::DomainError;

    #[test]
    fn time_bound_accepts_rfc3339_and_plain_dates() {
        assert!(
            parse_time_bound("started_at", "2024-05-01T10:00:00Z")
                .expect("must parse")
                .is_some()
        );
        assert!(
            parse_time_bound("started_at", "2024-05-01")
                .expect("must parse")
                .is_some()
        );
        assert!(parse_time_bound("started_at", "").expect("must parse").is_none());
        assert!(parse_time_bound("started_at", "yesterday").is_err());
    }

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("postgres must be reachable");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations must apply");
        pool
    }

    fn sample_input(suffix: &str) -> NewUser {
        NewUser {
            name: "Integration".to_string(),
            last_name: "Test".to_string(),
            username: format!("it_user_{suffix}"),
            email: format!("it_{suffix}@example.com"),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$c29tZWhhc2g".to_string(),
        }
    }

    fn unique_suffix() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock must be after unix epoch")
            .as_nanos();
        format!("{nanos}")
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn create_then_get_round_trips() {
        let repo = PostgresUserRepository::new(test_pool().await);
        let input = sample_input(&unique_suffix());

        let created = repo.create(input.clone()).await.expect("create must succeed");
        assert_eq!(created.email, input.email);

        let fetched = repo
            .get_by_field("id", &created.id.to_string())
            .await
            .expect("get must succeed")
            .expect("row must exist");
        assert_eq!(fetched.username, input.username);
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn soft_delete_is_idempotent_and_hides_rows() {
        let repo = PostgresUserRepository::new(test_pool().await);
        let input = sample_input(&unique_suffix());
        let created = repo.create(input).await.expect("create must succeed");

        assert!(
            repo.check_uniques("email", &created.email)
                .await
                .expect("check must succeed")
        );

        let deleted = repo
            .soft_delete("id", &created.id.to_string())
            .await
            .expect("delete must succeed");
        assert!(deleted);

        // second delete reports "no effect" instead of erroring
        let deleted_again = repo
            .soft_delete("id", &created.id.to_string())
            .await
            .expect("delete must succeed");
        assert!(!deleted_again);

        let fetched = repo
            .get_by_field("id", &created.id.to_string())
            .await
            .expect("get must succeed");
        assert!(fetched.is_none());

        assert!(
            !repo
                .check_uniques("email", &created.email)
                .await
                .expect("check must succeed")
        );

        let (users, _) = repo
            .get_all(ListQuery {
                page: 1,
                limit: 100,
                field: "email".to_string(),
                value: created.email.clone(),
                ..ListQuery::default()
            })
            .await
            .expect("list must succeed");
        assert!(users.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn unknown_filter_key_is_a_validation_error() {
        let repo = PostgresUserRepository::new(test_pool().await);
        let err = repo
            .get_by_field("password_hash", "anything")
            .await
            .expect_err("must be rejected");
        assert!(matches!(err, DomainError::UnknownColumn(_)));
    }
}
