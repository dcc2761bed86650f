pub(crate) mod pb {
    tonic::include_proto!("comment");
}

pub(crate) use pb::comment_service_server::{CommentService, CommentServiceServer};
pub(crate) use pb::{
    CommentResponse, CreateCommentRequest, DeleteCommentRequest, DeleteResponse,
    GetAllCommentsRequest, GetAllCommentsResponse, GetCommentRequest, UpdateCommentRequest,
};
