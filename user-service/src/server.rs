use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tonic::transport::Server;
use tracing::info;

use crate::application::account_service::AccountService;
use crate::data::repositories::postgres::user_repository::PostgresUserRepository;
use crate::grpc::service::GrpcUserService;
use crate::infrastructure::settings::Settings;

pub(crate) async fn run_grpc(settings: &Settings, pool: PgPool) -> anyhow::Result<()> {
    let repo = PostgresUserRepository::new(pool);
    let account = Arc::new(AccountService::new(repo));

    let service = GrpcUserService::new(account)
        .into_server()
        .max_decoding_message_size(settings.grpc_max_decoding_message_size_bytes)
        .max_encoding_message_size(settings.grpc_max_encoding_message_size_bytes);

    let addr = settings.grpc_addr.parse()?;
    info!("user-service gRPC listening on {addr}");

    Server::builder()
        .timeout(Duration::from_secs(settings.grpc_request_timeout_secs))
        .concurrency_limit_per_connection(settings.grpc_concurrency_limit)
        .add_service(service)
        .serve(addr)
        .await?;

    Ok(())
}
