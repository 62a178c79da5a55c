/**
 * Router Configuration
 *
 * Assembles the application router: the `/api` route table, a permissive
 * CORS layer for browser clients on other origins, and request tracing.
 */
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::api_routes::configure_api_routes;
use crate::server::state::AppState;

/// Create the router with all routes and layers configured.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    let router = router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { "404 Not Found" });

    router.with_state(app_state)
}
