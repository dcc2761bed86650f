use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::rpc_request;
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::handlers::from_proto_timestamp;
use crate::presentation::handlers::users::DeletedDto;
use crate::proto::comment;
use crate::query::{QueryParams, parse_query};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreateCommentDto {
    #[validate(length(min = 1, max = 4096))]
    pub(crate) content: String,
    #[validate(length(min = 1))]
    pub(crate) post_id: String,
    #[validate(length(min = 1))]
    pub(crate) owner_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdateCommentDto {
    #[validate(length(min = 1, max = 4096))]
    pub(crate) content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentDto {
    pub(crate) id: String,
    pub(crate) content: String,
    pub(crate) post_id: String,
    pub(crate) owner_id: String,
    pub(crate) views: i64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentListDto {
    pub(crate) comments: Vec<CommentDto>,
    pub(crate) count: i64,
}

impl From<comment::Comment> for CommentDto {
    fn from(value: comment::Comment) -> Self {
        Self {
            id: value.id,
            content: value.content,
            post_id: value.post_id,
            owner_id: value.owner_id,
            views: value.views,
            created_at: from_proto_timestamp(value.created_at),
            updated_at: from_proto_timestamp(value.updated_at),
        }
    }
}

impl From<comment::GetAllCommentsResponse> for CommentListDto {
    fn from(value: comment::GetAllCommentsResponse) -> Self {
        Self {
            comments: value.comments.into_iter().map(CommentDto::from).collect(),
            count: value.count,
        }
    }
}

fn missing_comment() -> AppError {
    AppError::Internal(anyhow::anyhow!("comment service returned an empty comment"))
}

pub(crate) async fn create_comment(
    State(state): State<AppState>,
    Json(dto): Json<CreateCommentDto>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    dto.validate()?;

    let mut client = state.clients.comments.clone();
    let response = client
        .create(rpc_request(
            &state.settings,
            comment::CreateCommentRequest {
                content: dto.content,
                post_id: dto.post_id,
                owner_id: dto.owner_id,
            },
        ))
        .await?;

    let created = response.into_inner().comment.ok_or_else(missing_comment)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub(crate) async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommentDto>> {
    let mut client = state.clients.comments.clone();
    let response = client
        .get(rpc_request(
            &state.settings,
            comment::GetCommentRequest { id },
        ))
        .await?;

    let found = response.into_inner().comment.ok_or_else(missing_comment)?;
    Ok(Json(found.into()))
}

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<CommentListDto>> {
    let (params, errors) = parse_query(&pairs);
    if let Some(message) = errors.first() {
        return Err(AppError::BadRequest(message.clone()));
    }

    let mut client = state.clients.comments.clone();
    let response = client
        .get_all(rpc_request(&state.settings, to_get_all_comments(params)))
        .await?;

    Ok(Json(response.into_inner().into()))
}

pub(crate) async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdateCommentDto>,
) -> AppResult<Json<CommentDto>> {
    dto.validate()?;

    let mut client = state.clients.comments.clone();
    let response = client
        .update(rpc_request(
            &state.settings,
            comment::UpdateCommentRequest {
                id,
                content: dto.content,
            },
        ))
        .await?;

    let updated = response.into_inner().comment.ok_or_else(missing_comment)?;
    Ok(Json(updated.into()))
}

pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedDto>> {
    let mut client = state.clients.comments.clone();
    let response = client
        .delete(rpc_request(
            &state.settings,
            comment::DeleteCommentRequest { id },
        ))
        .await?;

    Ok(Json(DeletedDto {
        deleted: response.into_inner().deleted,
    }))
}

fn to_get_all_comments(params: QueryParams) -> comment::GetAllCommentsRequest {
    comment::GetAllCommentsRequest {
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
            .map(|(key, value)| comment::Filter { key, value })
            .collect(),
    }
}
