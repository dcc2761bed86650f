use axum::{
    Router,
    routing::{get, post, put},
};

use crate::presentation::AppState;
use crate::presentation::handlers::users::{
    all_user_data, create_user, delete_user, get_or_list_users, update_user,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/users", get(get_or_list_users).delete(delete_user))
        .route("/v1/users/create", post(create_user))
        .route("/v1/user/update", put(update_user))
        .route("/v1/all/user/data", get(all_user_data))
}
