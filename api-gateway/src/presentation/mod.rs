use std::sync::Arc;

use crate::clients::ServiceClients;
use crate::infrastructure::settings::Settings;

pub(crate) mod app_error;
pub(crate) mod handlers;
pub(crate) mod middleware;
pub(crate) mod routes;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) clients: ServiceClients,
    pub(crate) settings: Arc<Settings>,
}

impl AppState {
    pub(crate) fn new(clients: ServiceClients, settings: Arc<Settings>) -> Self {
        Self { clients, settings }
    }
}
