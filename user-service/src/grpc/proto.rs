pub(crate) mod pb {
    tonic::include_proto!("user");
}

pub(crate) use pb::user_service_server::{UserService, UserServiceServer};
pub(crate) use pb::{
    AuthorizationRequest, CheckUniquesRequest, CheckUniquesResponse, DeleteResponse,
    DeleteUserRequest, GetAllUsersRequest, GetAllUsersResponse, GetByEmailRequest, GetUserRequest,
    LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse,
};
