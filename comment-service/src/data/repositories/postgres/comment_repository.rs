use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::data::comment_repository::{
    CommentPatch, CommentRepository, ListQuery, NewComment, offset,
};
use crate::data::repositories::postgres::columns::{filter_column, sort_column};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

const COMMENT_COLUMNS: &str = "id, content, post_id, owner_id, views, created_at, updated_at";

#[derive(Debug, Clone)]
pub(crate) struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    post_id: Uuid,
    owner_id: Uuid,
    views: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            post_id: row.post_id,
            owner_id: row.owner_id,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (id, content, post_id, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, content, post_id, owner_id, views, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.content)
        .bind(input.post_id)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET views = views + 1
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, content, post_id, owner_id, views, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn get_all(&self, query: ListQuery) -> Result<(Vec<Comment>, i64), DomainError> {
        let conditions = build_conditions(&query)?;
        let order_by = match query.sort_by.as_str() {
            "" => None,
            name => Some(
                sort_column(name).ok_or_else(|| DomainError::UnknownColumn(name.to_string()))?,
            ),
        };

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE deleted_at IS NULL"
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
            .build_query_as::<CommentRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut count_builder = QueryBuilder::<Postgres>::new(
            "SELECT count(1) FROM comments WHERE deleted_at IS NULL",
        );
        push_conditions(&mut count_builder, &conditions);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Comment::from).collect(), total))
    }

    async fn update(&self, patch: CommentPatch) -> Result<Option<Comment>, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET updated_at = NOW(),
                content = $2
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, content, post_id, owner_id, views, created_at, updated_at
            "#,
        )
        .bind(patch.id)
        .bind(&patch.content)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Comment::from))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
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

    use super::PostgresCommentRepository;
    use crate::data::comment_repository::{CommentRepository, ListQuery, NewComment};

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
    async fn list_filtered_by_post_hides_soft_deleted_rows() {
        let repo = PostgresCommentRepository::new(test_pool().await);
        let post_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();

        let first = repo
            .create(NewComment {
                content: "first".to_string(),
                post_id,
                owner_id,
            })
            .await
            .expect("create must succeed");
        repo.create(NewComment {
            content: "second".to_string(),
            post_id,
            owner_id,
        })
        .await
        .expect("create must succeed");

        let by_post = ListQuery {
            page: 1,
            limit: 10,
            field: "post_id".to_string(),
            value: post_id.to_string(),
            ..ListQuery::default()
        };

        let (comments, count) = repo
            .get_all(by_post.clone())
            .await
            .expect("list must succeed");
        assert_eq!(comments.len(), 2);
        assert_eq!(count, 2);

        assert!(repo.soft_delete(first.id).await.expect("delete must succeed"));
        assert!(repo.get(first.id).await.expect("get must succeed").is_none());

        let (comments, count) = repo.get_all(by_post).await.expect("list must succeed");
        assert_eq!(comments.len(), 1);
        assert_eq!(count, 1);
        assert_eq!(comments[0].content, "second");
    }
}
