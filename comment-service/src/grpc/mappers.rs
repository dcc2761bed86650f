use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::Status;
use uuid::Uuid;

use crate::data::comment_repository::ListQuery;
use crate::domain::comment::Comment as DomainComment;

use super::proto::pb;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

pub(crate) fn to_proto_comment(comment: DomainComment) -> pb::Comment {
    pb::Comment {
        id: comment.id.to_string(),
        content: comment.content,
        post_id: comment.post_id.to_string(),
        owner_id: comment.owner_id.to_string(),
        views: comment.views,
        created_at: Some(to_proto_timestamp(comment.created_at)),
        updated_at: Some(to_proto_timestamp(comment.updated_at)),
    }
}

pub(crate) fn to_list_query(input: pb::GetAllCommentsRequest) -> ListQuery {
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
