use anyhow::anyhow;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::rpc_request;
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::handlers::comments::CommentListDto;
use crate::presentation::handlers::from_proto_timestamp;
use crate::proto::{comment, user};
use crate::query::{QueryParams, parse_query};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreateUserDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) name: String,
    pub(crate) last_name: Option<String>,
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: String,
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 8, max = 128))]
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdateUserDto {
    #[validate(length(min = 1, max = 64))]
    pub(crate) name: Option<String>,
    pub(crate) last_name: Option<String>,
    #[validate(length(min = 3, max = 64))]
    pub(crate) username: Option<String>,
    #[validate(email)]
    pub(crate) email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldValueQuery {
    pub(crate) field: Option<String>,
    pub(crate) value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PagingQuery {
    pub(crate) page: Option<i64>,
    pub(crate) limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserDto {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserListDto {
    pub(crate) users: Vec<UserDto>,
    pub(crate) count: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletedDto {
    pub(crate) deleted: bool,
}

impl From<user::User> for UserDto {
    fn from(value: user::User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            last_name: value.last_name,
            username: value.username,
            email: value.email,
            created_at: from_proto_timestamp(value.created_at),
            updated_at: from_proto_timestamp(value.updated_at),
        }
    }
}

pub(crate) fn missing_user() -> AppError {
    AppError::Internal(anyhow!("user service returned an empty user"))
}

pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserDto>,
) -> AppResult<(StatusCode, Json<UserDto>)> {
    dto.validate()?;

    let mut client = state.clients.users.clone();
    let response = client
        .register(rpc_request(
            &state.settings,
            user::RegisterRequest {
                name: dto.name,
                last_name: dto.last_name.unwrap_or_default(),
                username: dto.username,
                email: dto.email,
                password: dto.password,
            },
        ))
        .await?;

    let created = response.into_inner().user.ok_or_else(missing_user)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// One handler covers both shapes of `GET /v1/users`: with `field`/`value`
/// and no explicit paging it is a single lookup, otherwise a paginated list.
pub(crate) async fn get_or_list_users(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let (params, errors) = parse_query(&pairs);
    if let Some(message) = errors.first() {
        return Err(AppError::BadRequest(message.clone()));
    }

    let explicit_paging = pairs.iter().any(|(key, _)| key == "page" || key == "limit");
    let mut client = state.clients.users.clone();

    if !explicit_paging && !params.field.is_empty() {
        let response = client
            .get(rpc_request(
                &state.settings,
                user::GetUserRequest {
                    field: params.field,
                    value: params.value,
                },
            ))
            .await?;
        let found = response.into_inner().user.ok_or_else(missing_user)?;
        return Ok(Json(UserDto::from(found)).into_response());
    }

    let response = client
        .get_all(rpc_request(&state.settings, to_get_all_users(params)))
        .await?;
    let inner = response.into_inner();
    Ok(Json(UserListDto {
        users: inner.users.into_iter().map(UserDto::from).collect(),
        count: inner.count,
    })
    .into_response())
}

pub(crate) async fn update_user(
    State(state): State<AppState>,
    Query(query): Query<FieldValueQuery>,
    Json(dto): Json<UpdateUserDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    let (field, value) = require_field_value(query)?;

    let mut client = state.clients.users.clone();
    let current = client
        .get(rpc_request(
            &state.settings,
            user::GetUserRequest { field, value },
        ))
        .await?
        .into_inner()
        .user
        .ok_or_else(missing_user)?;

    let response = client
        .update(rpc_request(
            &state.settings,
            user::UpdateUserRequest {
                id: current.id,
                name: dto.name.unwrap_or(current.name),
                last_name: dto.last_name.unwrap_or(current.last_name),
                username: dto.username.unwrap_or(current.username),
                email: dto.email.unwrap_or(current.email),
            },
        ))
        .await?;

    let updated = response.into_inner().user.ok_or_else(missing_user)?;
    Ok(Json(updated.into()))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    Query(query): Query<FieldValueQuery>,
) -> AppResult<Json<DeletedDto>> {
    let (field, value) = require_field_value(query)?;

    let mut client = state.clients.users.clone();
    let response = client
        .delete(rpc_request(
            &state.settings,
            user::DeleteUserRequest { field, value },
        ))
        .await?;

    Ok(Json(DeletedDto {
        deleted: response.into_inner().deleted,
    }))
}

/// Legacy aggregate endpoint kept from the original surface: a paginated
/// dump of comment data.
pub(crate) async fn all_user_data(
    State(state): State<AppState>,
    Query(paging): Query<PagingQuery>,
) -> AppResult<Json<CommentListDto>> {
    let mut client = state.clients.comments.clone();
    let response = client
        .get_all(rpc_request(
            &state.settings,
            comment::GetAllCommentsRequest {
                page: paging.page.unwrap_or(1),
                limit: paging.limit.unwrap_or(10),
                ..comment::GetAllCommentsRequest::default()
            },
        ))
        .await?;

    Ok(Json(response.into_inner().into()))
}

fn require_field_value(query: FieldValueQuery) -> Result<(String, String), AppError> {
    let field = query.field.unwrap_or_default();
    let value = query.value.unwrap_or_default();
    if field.is_empty() || value.is_empty() {
        return Err(AppError::BadRequest(
            "both `field` and `value` must be provided".to_string(),
        ));
    }
    Ok((field, value))
}

fn to_get_all_users(params: QueryParams) -> user::GetAllUsersRequest {
    user::GetAllUsersRequest {
        page: params.page,
        limit: params.limit,
        field: params.field,
        value: params.value,
        sort_by: params.sort_by,
        started_at: params.started_at,
        ended_at: params.ended_at,
        filters: params
            .filters
            .into_iter()
            .map(|(key, value)| user::Filter { key, value })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValueQuery, require_field_value, to_get_all_users};
    use crate::query::QueryParams;

    #[test]
    fn field_and_value_are_both_required() {
        let err = require_field_value(FieldValueQuery {
            field: Some("email".to_string()),
            value: None,
        });
        assert!(err.is_err());

        let ok = require_field_value(FieldValueQuery {
            field: Some("email".to_string()),
            value: Some("a@b.c".to_string()),
        })
        .expect("must pass");
        assert_eq!(ok.0, "email");
    }

    #[test]
    fn residual_filters_are_forwarded_to_the_rpc() {
        let params = QueryParams {
            filters: vec![("name".to_string(), "Max".to_string())],
            ..QueryParams::default()
        };

        let request = to_get_all_users(params);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 10);
        assert_eq!(request.filters.len(), 1);
        assert_eq!(request.filters[0].key, "name");
    }
}
