// src/bin/api_server.rs

use review_store::infra::{config, logging};
use review_store::{load_data, transport, ReviewService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init();

    // --- Service Initialization ---
    info!(target: "api", "initializing ReviewService...");
    let database_url = config::database_url()?;
    let service = ReviewService::connect(&database_url, config::max_connections()?).await?;

    // --- Optional: load a CSV export before serving ---
    if let Some(path) = config::reviews_csv() {
        match load_data(&service, &path).await {
            Ok(summary) => info!(
                target: "api",
                "loaded {} reviews from {} ({} rejected)",
                summary.loaded(),
                path.display(),
                summary.rejected.len()
            ),
            Err(e) => error!(target: "api", "failed to load {}: {}", path.display(), e),
        }
    }

    let service = Arc::new(service);
    let app_state = transport::http::AppState {
        service: service.clone(),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let addr = config::bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target: "api", "API server listening on http://{}", addr);
    info!(target: "api", "Swagger UI available at http://{}/swagger-ui", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!(target: "api", "shutdown signal received, closing the pool");
            service.gateway().close().await;
        }
    }

    Ok(())
}
