use tonic::{Request, Response, Status};

use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::data::repositories::postgres::post_repository::PostgresPostRepository;
use crate::domain::post::{CreatePost, UpdatePost};

use super::mappers::{normalize_paging, parse_uuid, to_list_query, to_proto_post};
use super::proto::{
    CreatePostRequest, DeletePostRequest, DeleteResponse, GetAllPostsRequest, GetAllPostsResponse,
    GetPostRequest, GetPostsByOwnerIdRequest, PostResponse, PostService, PostServiceServer,
    UpdatePostRequest,
};
use super::status::map_domain_error;

pub(crate) struct GrpcPostService {
    repo: PostgresPostRepository,
}

impl GrpcPostService {
    pub(crate) fn new(repo: PostgresPostRepository) -> Self {
        Self { repo }
    }

    pub(crate) fn into_server(self) -> PostServiceServer<Self> {
        PostServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl PostService for GrpcPostService {
    async fn create(
        &self,
        request: Request<CreatePostRequest>,
    ) -> Result<Response<PostResponse>, Status> {
        let input = request.into_inner();
        let owner_id = parse_uuid("owner_id", &input.owner_id)?;
        let create = CreatePost {
            title: input.title,
            content: input.content,
            category: input.category,
            owner_id,
        }
        .validate()
        .map_err(map_domain_error)?;

        let post = self
            .repo
            .create(NewPost {
                title: create.title,
                content: create.content,
                category: create.category,
                owner_id: create.owner_id,
            })
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(PostResponse {
            post: Some(to_proto_post(post)),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdatePostRequest>,
    ) -> Result<Response<PostResponse>, Status> {
        let input = request.into_inner();
        let id = parse_uuid("id", &input.id)?;
        let update = UpdatePost {
            id,
            title: input.title,
            content: input.content,
            category: input.category,
        }
        .validate()
        .map_err(map_domain_error)?;

        let post = self
            .repo
            .update(PostPatch {
                id: update.id,
                title: update.title,
                content: update.content,
                category: update.category,
            })
            .await
            .map_err(map_domain_error)?
            .ok_or_else(|| Status::not_found(format!("post id: {id}")))?;

        Ok(Response::new(PostResponse {
            post: Some(to_proto_post(post)),
        }))
    }

    async fn delete(
        &self,
        request: Request<DeletePostRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let id = parse_uuid("id", &request.into_inner().id)?;
        let deleted = self.repo.soft_delete(id).await.map_err(map_domain_error)?;

        Ok(Response::new(DeleteResponse { deleted }))
    }

    async fn get_post(
        &self,
        request: Request<GetPostRequest>,
    ) -> Result<Response<PostResponse>, Status> {
        let id = parse_uuid("id", &request.into_inner().id)?;
        let post = self
            .repo
            .get(id)
            .await
            .map_err(map_domain_error)?
            .ok_or_else(|| Status::not_found(format!("post id: {id}")))?;

        Ok(Response::new(PostResponse {
            post: Some(to_proto_post(post)),
        }))
    }

    async fn get_all_posts(
        &self,
        request: Request<GetAllPostsRequest>,
    ) -> Result<Response<GetAllPostsResponse>, Status> {
        let (posts, count) = self
            .repo
            .get_all(to_list_query(request.into_inner()))
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(GetAllPostsResponse {
            posts: posts.into_iter().map(to_proto_post).collect(),
            count,
        }))
    }

    async fn get_posts_by_owner_id(
        &self,
        request: Request<GetPostsByOwnerIdRequest>,
    ) -> Result<Response<GetAllPostsResponse>, Status> {
        let input = request.into_inner();
        let owner_id = parse_uuid("owner_id", &input.owner_id)?;
        let (page, limit) = normalize_paging(input.page, input.limit);

        let (posts, count) = self
            .repo
            .get_by_owner(owner_id, page, limit)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(GetAllPostsResponse {
            posts: posts.into_iter().map(to_proto_post).collect(),
            count,
        }))
    }
}
