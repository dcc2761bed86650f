use std::sync::Arc;

use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::clients::ServiceClients;
use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::{AppState, routes};

pub(crate) async fn run_http(settings: Arc<Settings>, clients: ServiceClients) -> anyhow::Result<()> {
    let state = AppState::new(clients, settings.clone());

    let app = routes::router().with_state(state);
    let app = apply_trace(app);
    let app = apply_cors(app, &settings)?;
    let app = app
        .layer(ConcurrencyLimitLayer::new(settings.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            settings.http_request_body_limit_bytes,
        ));

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("api-gateway HTTP listening on {}", settings.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
