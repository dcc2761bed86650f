use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::Status;
use uuid::Uuid;

use crate::data::post_repository::ListQuery;
use crate::domain::post::Post as DomainPost;

use super::proto::pb;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

pub(crate) fn to_proto_post(post: DomainPost) -> pb::Post {
    pb::Post {
        id: post.id.to_string(),
        title: post.title,
        content: post.content,
        category: post.category,
        views: post.views,
        owner_id: post.owner_id.to_string(),
        created_at: Some(to_proto_timestamp(post.created_at)),
        updated_at: Some(to_proto_timestamp(post.updated_at)),
    }
}

pub(crate) fn to_list_query(input: pb::GetAllPostsRequest) -> ListQuery {
    ListQuery {
        page: if input.page > 0 { input.page } else { DEFAULT_PAGE },
        limit: if input.limit > 0 { input.limit } else { DEFAULT_LIMIT },
        field: input.field,
        value: input.value,
        sort_by: input.sort_by,
        started_at: input.started_at,
        ended_at: input.ended_at,
        filters: input
            .filters
            .into_iter()
            .map(|filter| (filter.key, filter.value))
            .collect(),
    }
}

pub(crate) fn normalize_paging(page: i64, limit: i64) -> (i64, i64) {
    (
        if page > 0 { page } else { DEFAULT_PAGE },
        if limit > 0 { limit } else { DEFAULT_LIMIT },
    )
}

pub(crate) fn parse_uuid(field: &'static str, raw: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(raw)
        .map_err(|_| Status::invalid_argument(format!("'{field}' must be a valid uuid")))
}

fn to_proto_timestamp(value: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: value.timestamp(),
        nanos: value.timestamp_subsec_nanos() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_paging;

    #[test]
    fn paging_defaults_replace_non_positive_values() {
        assert_eq!(normalize_paging(0, 0), (1, 10));
        assert_eq!(normalize_paging(-1, 50), (1, 50));
        assert_eq!(normalize_paging(3, 5), (3, 5));
    }
}
