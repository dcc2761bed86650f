use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clients::rpc_request;
use crate::presentation::AppState;
use crate::presentation::app_error::{AppError, AppResult};
use crate::presentation::handlers::users::{UserDto, missing_user};
use crate::proto::user;
use crate::token;

const USER_ROLE: &str = "user";

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RegisterDto {
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

#[derive(Debug, Deserialize)]
pub(crate) struct LoginDto {
    pub(crate) email: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct VerificationDto {
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(min = 1))]
    pub(crate) code: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisteredDto {
    pub(crate) message: String,
    pub(crate) email: String,
}

/// Login/verification response: the user plus a fresh token pair. No
/// credential material is ever echoed back.
#[derive(Debug, Serialize)]
pub(crate) struct SessionDto {
    pub(crate) user: UserDto,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterDto>,
) -> AppResult<Json<RegisteredDto>> {
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
    Ok(Json(RegisteredDto {
        message: "user registered, verification code sent".to_string(),
        email: created.email,
    }))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginDto>,
) -> AppResult<Json<SessionDto>> {
    let email = dto.email.unwrap_or_default();
    let username = dto.username.unwrap_or_default();
    if email.trim().is_empty() && username.trim().is_empty() {
        return Err(AppError::BadRequest(
            "either email or username must be provided".to_string(),
        ));
    }

    let mut client = state.clients.users.clone();
    let response = client
        .login(rpc_request(
            &state.settings,
            user::LoginRequest {
                email,
                username,
                password: dto.password,
            },
        ))
        .await?;

    let found = response.into_inner().user.ok_or_else(missing_user)?;
    let tokens = token::issue_pair(&state.settings.token, &found.id, USER_ROLE, Utc::now())?;

    Ok(Json(SessionDto {
        user: found.into(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

pub(crate) async fn verification(
    State(state): State<AppState>,
    Json(dto): Json<VerificationDto>,
) -> AppResult<Json<SessionDto>> {
    dto.validate()?;

    let mut client = state.clients.users.clone();
    let response = client
        .authorization(rpc_request(
            &state.settings,
            user::AuthorizationRequest {
                email: dto.email,
                code: dto.code,
            },
        ))
        .await?;

    let verified = response.into_inner().user.ok_or_else(missing_user)?;
    let tokens = token::issue_pair(&state.settings.token, &verified.id, USER_ROLE, Utc::now())?;

    Ok(Json(SessionDto {
        user: verified.into(),
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}
