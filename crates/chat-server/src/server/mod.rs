//! Server setup and initialization

use std::path::Path;

use axum::Router;
use chat_common::{AppConfig, AppError, JwtService};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::services::ServiceContext;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// In production the built frontend is served as well, with unknown paths
/// falling back to `index.html` for client-side routing.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let mut router = create_router();

    if config.app.env.is_production() {
        let dist = Path::new(&config.static_files.dir);
        info!(dir = %dist.display(), "Serving frontend assets");
        router = router.fallback_service(
            ServeDir::new(dist).not_found_service(ServeFile::new(dist.join("index.html"))),
        );
    }

    apply_middleware(router, &config.cors).with_state(state)
}

/// Initialize all dependencies and create `AppState`
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    if config.database.url.is_some() {
        warn!("DATABASE_URL is set but this build keeps data in memory");
    }

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expiry_secs);
    let service_context = ServiceContext::in_memory(jwt_service);

    Ok(AppState::new(service_context, config))
}

/// Serve the application on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read local address: {e}")))?;
    info!("Server is running on port {}", addr.port());

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, listener).await
}
