use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::application::account_service::AccountService;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::domain::user::{RegisterInput, UpdateInput};

use super::mappers::{parse_uuid, to_list_query, to_proto_user};
use super::proto::{
    AuthorizationRequest, CheckUniquesRequest, CheckUniquesResponse, DeleteResponse,
    DeleteUserRequest, GetAllUsersRequest, GetAllUsersResponse, GetByEmailRequest, GetUserRequest,
    LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse, UserService, UserServiceServer,
};
use super::status::map_domain_error;

pub(crate) struct GrpcUserService {
    account: Arc<AccountService<PostgresUserRepository>>,
}

impl GrpcUserService {
    pub(crate) fn new(account: Arc<AccountService<PostgresUserRepository>>) -> Self {
        Self { account }
    }

    pub(crate) fn into_server(self) -> UserServiceServer<Self> {
        UserServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl UserService for GrpcUserService {
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let user = self
            .account
            .register(RegisterInput {
                name: input.name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
                password: input.password,
            })
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let user = self
            .account
            .login(&input.email, &input.username, &input.password)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }

    async fn authorization(
        &self,
        request: Request<AuthorizationRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let user = self
            .account
            .verify(&input.email, &input.code)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }

    async fn get(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let user = self
            .account
            .get(&input.field, &input.value)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }

    async fn get_all(
        &self,
        request: Request<GetAllUsersRequest>,
    ) -> Result<Response<GetAllUsersResponse>, Status> {
        let (users, count) = self
            .account
            .get_all(to_list_query(request.into_inner()))
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(GetAllUsersResponse {
            users: users.into_iter().map(to_proto_user).collect(),
            count,
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let id = parse_uuid("id", &input.id)?;
        let user = self
            .account
            .update(UpdateInput {
                id,
                name: input.name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
            })
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }

    async fn delete(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        let input = request.into_inner();
        let deleted = self
            .account
            .delete(&input.field, &input.value)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(DeleteResponse { deleted }))
    }

    async fn check_uniques(
        &self,
        request: Request<CheckUniquesRequest>,
    ) -> Result<Response<CheckUniquesResponse>, Status> {
        let input = request.into_inner();
        let exists = self
            .account
            .check_uniques(&input.field, &input.value)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(CheckUniquesResponse { exists }))
    }

    async fn get_user_by_email(
        &self,
        request: Request<GetByEmailRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = request.into_inner();
        let user = self
            .account
            .get_by_email(&input.email)
            .await
            .map_err(map_domain_error)?;

        Ok(Response::new(UserResponse {
            user: Some(to_proto_user(user)),
        }))
    }
}
