//! Generated wire contract for the three backend services. The `.proto`
//! sources live in `proto/` at the workspace root and are compiled by
//! `build.rs`; nothing here is hand-maintained.

pub(crate) mod user {
    tonic::include_proto!("user");
}

pub(crate) mod post {
    tonic::include_proto!("post");
}

pub(crate) mod comment {
    tonic::include_proto!("comment");
}
