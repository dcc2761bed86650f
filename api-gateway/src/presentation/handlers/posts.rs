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
use crate::presentation::handlers::users::{DeletedDto, PagingQuery};
use crate::proto::post;
use crate::query::{QueryParams, parse_query};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    pub(crate) category: Option<String>,
    #[validate(length(min = 1))]
    pub(crate) owner_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 255))]
    pub(crate) title: String,
    #[validate(length(min = 1))]
    pub(crate) content: String,
    pub(crate) category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostDto {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) category: String,
    pub(crate) views: i64,
    pub(crate) owner_id: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostListDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) count: i64,
}

impl From<post::Post> for PostDto {
    fn from(value: post::Post) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            category: value.category,
            views: value.views,
            owner_id: value.owner_id,
            created_at: from_proto_timestamp(value.created_at),
            updated_at: from_proto_timestamp(value.updated_at),
        }
    }
}

impl From<post::GetAllPostsResponse> for PostListDto {
    fn from(value: post::GetAllPostsResponse) -> Self {
        Self {
            posts: value.posts.into_iter().map(PostDto::from).collect(),
            count: value.count,
        }
    }
}

fn missing_post() -> AppError {
    AppError::Internal(anyhow::anyhow!("post service returned an empty post"))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;

    let mut client = state.clients.posts.clone();
    let response = client
        .create(rpc_request(
            &state.settings,
            post::CreatePostRequest {
                title: dto.title,
                content: dto.content,
                category: dto.category.unwrap_or_default(),
                owner_id: dto.owner_id,
            },
        ))
        .await?;

    let created = response.into_inner().post.ok_or_else(missing_post)?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostDto>> {
    let mut client = state.clients.posts.clone();
    let response = client
        .get_post(rpc_request(&state.settings, post::GetPostRequest { id }))
        .await?;

    let found = response.into_inner().post.ok_or_else(missing_post)?;
    Ok(Json(found.into()))
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<PostListDto>> {
    let (params, errors) = parse_query(&pairs);
    if let Some(message) = errors.first() {
        return Err(AppError::BadRequest(message.clone()));
    }

    let mut client = state.clients.posts.clone();
    let response = client
        .get_all_posts(rpc_request(&state.settings, to_get_all_posts(params)))
        .await?;

    Ok(Json(response.into_inner().into()))
}

pub(crate) async fn posts_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Query(paging): Query<PagingQuery>,
) -> AppResult<Json<PostListDto>> {
    let mut client = state.clients.posts.clone();
    let response = client
        .get_posts_by_owner_id(rpc_request(
            &state.settings,
            post::GetPostsByOwnerIdRequest {
                owner_id,
                page: paging.page.unwrap_or(1),
                limit: paging.limit.unwrap_or(10),
            },
        ))
        .await?;

    Ok(Json(response.into_inner().into()))
}

pub(crate) async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;

    let mut client = state.clients.posts.clone();
    let response = client
        .update(rpc_request(
            &state.settings,
            post::UpdatePostRequest {
                id,
                title: dto.title,
                content: dto.content,
                category: dto.category.unwrap_or_default(),
            },
        ))
        .await?;

    let updated = response.into_inner().post.ok_or_else(missing_post)?;
    Ok(Json(updated.into()))
}

pub(crate) async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeletedDto>> {
    let mut client = state.clients.posts.clone();
    let response = client
        .delete(rpc_request(&state.settings, post::DeletePostRequest { id }))
        .await?;

    Ok(Json(DeletedDto {
        deleted: response.into_inner().deleted,
    }))
}

fn to_get_all_posts(params: QueryParams) -> post::GetAllPostsRequest {
    post::GetAllPostsRequest {
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
            .map(|(key, value)| post::Filter { key, value })
            .collect(),
    }
}
