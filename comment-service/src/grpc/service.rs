use tonic::{Request, Response, Status};

use crate::data::comment_repository::{CommentPatch, CommentRepository, NewComment};
use crate::data::repositories::postgres::comment_repository::PostgresCommentRepository;
use crate::domain::comment::{CreateComment, UpdateComment};

use super::mappers::{parse_uuid, to_list_query, to_proto_comment};
use super::proto::{
    CommentResponse, CommentService, CommentServiceServer, CreateCommentRequest,
    DeleteCommentRequest, DeleteResponse, GetAllCommentsRequest, GetAllCommentsResponse,
    GetCommentRequest, UpdateCommentRequest,
};
use super::status::map_domain_error;

pub(crate) struct GrpcCommentService {
    repo: PostgresCommentRepository,
}

impl GrpcCommentService {
    pub(crate) fn new(repo: PostgresCommentRepository) -> Self {
        Self { repo }
    }

    pub(crate) fn into_server(self) -> CommentServiceServer<Self> {
        CommentServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl CommentService for GrpcCommentService {
    async fn create(
        &self,
        request: Request<CreateCommentRequest>,
    ) -> Result<Response<CommentResponse>, Status> {
        let input = request.into_inner();
        let post_id = parse_uuid("post_id", &input.post_id)?;
        let owner_id = parse_uuid("owner_id", &input.owner_id)?;
        let create = CreateComment {
            content: input.content,
            post_id,
            owner_id,
        }
        .validate()
        .map_err(map_domain_error)?;

        let comment = self
            .repo
            .create(NewComment {
                content: create.content,
                post_id: create.post_id,
                owner_id: create.owner_id,
            })
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(CommentResponse {
            comment: Some(to_proto_comment(comment)),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateCommentRequest>,
    ) -> Result<Response<CommentResponse>, Status> {
        let input = request.into_inner();
        let id = parse_uuid("id", &input.id)?;
        let update = UpdateComment {
            id,
            content: input.content,
        }
        .validate()
        .map_err(map_domain_error)?;

        let comment = self
            .repo
            .update(CommentPatch {
                id: update.id,
                content: update.content,
            })
            .await
            .map_err(map_domain_error)?
            .ok_or_else(|| Status::not_found(format!("comment id: {id}")))?;

        Ok(Response::new(CommentResponse {
            comment: Some(to_proto_comment(comment)),
        }))
    }

    async fn delete(
        &self,
        request: Request<DeleteCommentRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let id = parse_uuid("id", &request.into_inner().id)?;
        let deleted = self.repo.soft_delete(id).await.map_err(map_domain_error)?;

        Ok(Response::new(DeleteResponse { deleted }))
    }

    async fn get(
        &self,
        request: Request<GetCommentRequest>,
    ) -> Result<Response<CommentResponse>, Status> {
        let id = parse_uuid("id", &request.into_inner().id)?;
        let comment = self
            .repo
            .get(id)
            .await
            .map_err(map_domain_error)?
            .ok_or_else(|| Status::not_found(format!("comment id: {id}")))?;

        Ok(Response::new(CommentResponse {
            comment: Some(to_proto_comment(comment)),
        }))
    }

    async fn get_all(
        &self,
        request: Request<GetAllCommentsRequest>,
    ) -> Result<Response<GetAllCommentsResponse>, Status> {
        let (comments, count) = self
            .repo
            .get_all(to_list_query(request.into_inner()))
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(GetAllCommentsResponse {
            comments: comments.into_iter().map(to_proto_comment).collect(),
            count,
        }))
    }
}
