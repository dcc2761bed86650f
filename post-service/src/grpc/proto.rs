pub(crate) mod pb {
    tonic::include_proto!("post");
}

pub(crate) use pb::post_service_server::{PostService, PostServiceServer};
pub(crate) use pb::{
    CreatePostRequest, DeletePostRequest, DeleteResponse, GetAllPostsRequest, GetAllPostsResponse,
    GetPostRequest, GetPostsByOwnerIdRequest, PostResponse, UpdatePostRequest,
};
