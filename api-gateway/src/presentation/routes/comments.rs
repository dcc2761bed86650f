use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::comments::{
    create_comment, delete_comment, get_comment, list_comments, update_comment,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/comments", get(list_comments).post(create_comment))
        .route(
            "/v1/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}
