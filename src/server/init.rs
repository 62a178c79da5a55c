/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store creation, schema setup, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load server configuration from the environment
 * 2. Connect to the record store and apply the schema
 * 3. Spawn the single fan-out worker consuming the update queue
 * 4. Create the router with all routes and middleware
 *
 * The fan-out worker is the only consumer of the update queue, which is what
 * guarantees activity rows and realtime events appear in mutation order.
 */

use axum::Router;
use tokio::sync::mpsc;

use crate::activity::db::ActivityStore;
use crate::auth::users::UserStore;
use crate::boards::db::BoardStore;
use crate::lists::db::ListStore;
use crate::realtime::rooms::RoomRegistry;
use crate::routes::create_router;
use crate::server::config::{connect_store, ServerConfig};
use crate::server::state::AppState;
use crate::sync::{fanout, BoardUpdate, Coordinator};
use crate::tasks::db::TaskStore;

/// Create and configure the Axum application.
///
/// Connects to the record store named by the configuration, applies the
/// schema, wires the coordinator to the fan-out worker, and returns a
/// router ready to serve requests.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("Initializing taskboard backend server");

    // Step 1: Connect to the record store; this also applies the schema
    let pool = connect_store(&config.database_url).await?;

    let app_state = build_state(pool);
    tracing::info!("Stores and fan-out worker initialized");

    // Final step: create router with all routes
    Ok(create_router(app_state))
}

/// Build the application state around an already-connected pool.
pub fn build_state(pool: sqlx::SqlitePool) -> AppState {
    let boards = BoardStore::new(pool.clone());
    let lists = ListStore::new(pool.clone());
    let tasks = TaskStore::new(pool.clone());
    let users = UserStore::new(pool.clone());
    let activities = ActivityStore::new(pool);

    let rooms = RoomRegistry::new();

    // Single-consumer update queue: the coordinator enqueues, the fan-out
    // worker records activity and publishes to rooms in arrival order.
    let (update_tx, update_rx) = mpsc::unbounded_channel::<BoardUpdate>();
    fanout::spawn(update_rx, activities.clone(), users.clone(), rooms.clone());

    let coordinator = Coordinator::new(boards, lists, tasks, users.clone(), activities, update_tx);

    AppState {
        coordinator,
        rooms,
        users,
    }
}
