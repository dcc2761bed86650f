use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::handlers::posts::{
    create_post, delete_post, get_post, list_posts, posts_by_owner, update_post,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/posts", get(list_posts).post(create_post))
        .route(
            "/v1/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/v1/posts/owner/{owner_id}", get(posts_by_owner))
}
