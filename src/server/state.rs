/**
 * Application State
 *
 * The `AppState` struct is the central state container handed to the Axum
 * router. `FromRef` implementations let handlers extract just the part they
 * need.
 *
 * # Thread Safety
 *
 * Every field is clone-cheap and internally synchronized: the coordinator
 * shares its lock table and update queue across clones, the room registry
 * shares its membership table, and the user store wraps a connection pool.
 */
use axum::extract::FromRef;

use crate::auth::users::UserStore;
use crate::realtime::rooms::RoomRegistry;
use crate::sync::Coordinator;

/// Application state for the Axum router.
#[derive(Clone)]
pub struct AppState {
    /// Mutation coordinator holding the record-store handles.
    pub coordinator: Coordinator,
    /// Room registry for realtime fan-out.
    pub rooms: RoomRegistry,
    /// User store, used directly by the auth handlers.
    pub users: UserStore,
}

impl FromRef<AppState> for Coordinator {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.coordinator.clone()
    }
}

impl FromRef<AppState> for RoomRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.rooms.clone()
    }
}

impl FromRef<AppState> for UserStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}
