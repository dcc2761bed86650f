use std::time::Duration;

use anyhow::Result;
use tonic::transport::{Channel, Endpoint};

use crate::infrastructure::settings::Settings;
use crate::proto::comment::comment_service_client::CommentServiceClient;
use crate::proto::post::post_service_client::PostServiceClient;
use crate::proto::user::user_service_client::UserServiceClient;

/// One lazily connected channel per backend service. Clients are cheap to
/// clone; every handler clones its client instead of sharing `&mut` state.
#[derive(Debug, Clone)]
pub(crate) struct ServiceClients {
    pub(crate) users: UserServiceClient<Channel>,
    pub(crate) posts: PostServiceClient<Channel>,
    pub(crate) comments: CommentServiceClient<Channel>,
}

impl ServiceClients {
    pub(crate) fn connect(settings: &Settings) -> Result<Self> {
        Ok(Self {
            users: UserServiceClient::new(lazy_channel(&settings.user_service_endpoint)?),
            posts: PostServiceClient::new(lazy_channel(&settings.post_service_endpoint)?),
            comments: CommentServiceClient::new(lazy_channel(&settings.comment_service_endpoint)?),
        })
    }
}

fn lazy_channel(endpoint: &str) -> Result<Channel> {
    Ok(Endpoint::from_shared(endpoint.to_string())?.connect_lazy())
}

/// Binds one downstream call to the configured per-request deadline.
pub(crate) fn rpc_request<T>(settings: &Settings, message: T) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    request.set_timeout(Duration::from_secs(settings.rpc_timeout_secs));
    request
}
