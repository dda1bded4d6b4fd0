// HTTP server setup

use crate::api::routes;
use crate::api::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/certificate",
            get(routes::list_certificates)
                .post(routes::add_certificate)
                .delete(routes::remove_certificate),
        )
        .route("/api/certificate/:hostname/ics", get(routes::certificate_ics))
        .route("/api/command/list", post(routes::command_list))
        .route("/api/command/add", post(routes::command_add))
        .route("/api/command/remove", post(routes::command_remove))
        .route("/api/command/remove/:url", get(routes::command_remove_link))
        .route("/api/command/help", post(routes::command_help))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ApiServer {
    pub fn new(host: String, port: u16, state: AppState) -> Self {
        Self { host, port, state }
    }

    pub async fn run(self) -> crate::Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("API server listening on {}", addr);
        axum::serve(listener, router(self.state)).await?;

        Ok(())
    }
}
