use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::data::post_repository::{
    ListQuery, NewPost, PostPatch, PostRepository, offset,
};
use crate::data::repositories::postgres::columns::{filter_column, sort_column};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

const POST_COLUMNS: &str = "id, title, content, category, views, owner_id, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    category: String,
    views: i64,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            category: row.category,
            views: row.views,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, title, content, category, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, category, views, owner_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.category)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET views = views + 1
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, title, content, category, views, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn get_all(&self, query: ListQuery) -> Result<(Vec<Post>, i64), DomainError> {
        let conditions = build_conditions(&query)?;
        let order_by = match query.sort_by.as_str() {
            "" => None,
            name => Some(
                sort_column(name).ok_or_else(|| DomainError::UnknownColumn(name.to_string()))?,
            ),
        };

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE deleted_at IS NULL"
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
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut count_builder =
            QueryBuilder::<Postgres>::new("SELECT count(1) FROM posts WHERE deleted_at IS NULL");
        push_conditions(&mut count_builder, &conditions);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Post::from).collect(), total))
    }

    async fn get_by_owner(
        &self,
        owner_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE owner_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(owner_id)
            .bind(limit)
            .bind(offset(page, limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let total: i64 = sqlx::query_scalar(
            "SELECT count(1) FROM posts WHERE owner_id = $1 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Post::from).collect(), total))
    }

    async fn update(&self, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET updated_at = NOW(),
                title = $2,
                content = $3,
                category = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, title, content, category, views, owner_id, created_at, updated_at
            "#,
        )
        .bind(patch.id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(&patch.category)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Post::from))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE posts SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
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
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use super::PostgresPostRepository;
    use crate::data::post_repository::{NewPost, PostRepository};

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

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database"]
    async fn get_bumps_the_view_counter() {
        let repo = PostgresPostRepository::new(test_pool().await);
        let created = repo
            .create(NewPost {
                title: "views".to_string(),
                content: "counter".to_string(),
                category: "test".to_string(),
                owner_id: Uuid::new_v4(),
            })
            .await
            .expect("create must succeed");
        assert_eq!(created.views, 0);

        let first = repo
            .get(created.id)
            .await
            .expect("get must succeed")
            .expect("post must exist");
        let second = repo
            .get(created.id)
            .await
            .expect("get must succeed")
            .expect("post must exist");
        assert_eq!(first.views, 1);
        assert_eq!(second.views, 2);

        assert!(repo.soft_delete(created.id).await.expect("delete must succeed"));
        assert!(repo.get(created.id).await.expect("get must succeed").is_none());
    }
}
