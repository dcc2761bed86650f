use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::Status;
use uuid::Uuid;

use crate::data::user_repository::ListQuery;
use crate::domain::user::User as DomainUser;

use super::proto::pb;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

pub(crate) fn to_proto_user(user: DomainUser) -> pb::User {
    pb::User {
        id: user.id.to_string(),
        name: user.name,
        last_name: user.last_name,
        username: user.username,
        email: user.email,
        created_at: Some(to_proto_timestamp(user.created_at)),
        updated_at: Some(to_proto_timestamp(user.updated_at)),
    }
}

pub(crate) fn to_list_query(input: pb::GetAllUsersRequest) -> ListQuery {
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

#[cfg(test)]
mod tests {
    use super::{pb, parse_uuid, to_list_query};

    #[test]
    fn list_query_defaults_page_and_limit() {
        let query = to_list_query(pb::GetAllUsersRequest::default());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn list_query_keeps_filters_in_order() {
        let request = pb::GetAllUsersRequest {
            filters: vec![
                pb::Filter {
                    key: "name".to_string(),
                    value: "Max".to_string(),
                },
                pb::Filter {
                    key: "email".to_string(),
                    value: "max@example.com".to_string(),
                },
            ],
            ..pb::GetAllUsersRequest::default()
        };
        let query = to_list_query(request);
        assert_eq!(query.filters[0].0, "name");
        assert_eq!(query.filters[1].0, "email");
    }

    #[test]
    fn uuid_parse_errors_are_invalid_argument() {
        assert!(parse_uuid("id", "not-a-uuid").is_err());
    }
}
