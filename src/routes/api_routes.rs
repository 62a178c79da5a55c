/**
 * API Route Table
 *
 * All REST endpoints under `/api`.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/signup` - register
 * - `POST /api/auth/login` - login
 * - `GET /api/auth/me` - current user
 *
 * ## Boards
 * - `POST /api/boards` / `GET /api/boards`
 * - `DELETE /api/boards/{board_id}` - owner only, cascades
 * - `POST /api/boards/{board_id}/share` - owner only, rotates token
 * - `POST /api/boards/{board_id}/save` - save a shared board
 * - `GET /api/boards/{board_id}/users`
 * - `GET /api/boards/{board_id}/activities`
 *
 * ## Lists and tasks
 * - `POST|GET /api/boards/{board_id}/lists`,
 *   `DELETE /api/boards/{board_id}/lists/{list_id}`
 * - `GET /api/boards/{board_id}/tasks`
 * - `POST /api/tasks`, `PUT|DELETE /api/tasks/{task_id}`,
 *   `POST /api/tasks/{task_id}/move`
 *
 * ## Realtime
 * - `GET /api/realtime` - SSE stream
 * - `POST|DELETE /api/realtime/{connection_id}/boards/{board_id}` -
 *   join/leave a board room
 */
use axum::{routing, Router};

use crate::auth::handlers::{login, me, signup};
use crate::boards::handlers::{
    create_board, create_share_token, delete_board, get_activities, get_board_users, get_boards,
    save_shared_board,
};
use crate::lists::handlers::{create_list, delete_list, get_lists};
use crate::realtime::subscription::{join_board, leave_board, subscribe};
use crate::server::state::AppState;
use crate::tasks::handlers::{create_task, delete_task, get_tasks, move_task, update_task};

/// Add every `/api` route to the router.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication
        .route("/api/auth/signup", routing::post(signup))
        .route("/api/auth/login", routing::post(login))
        .route("/api/auth/me", routing::get(me))
        // Boards
        .route("/api/boards", routing::post(create_board).get(get_boards))
        .route("/api/boards/{board_id}", routing::delete(delete_board))
        .route("/api/boards/{board_id}/share", routing::post(create_share_token))
        .route("/api/boards/{board_id}/save", routing::post(save_shared_board))
        .route("/api/boards/{board_id}/users", routing::get(get_board_users))
        .route("/api/boards/{board_id}/activities", routing::get(get_activities))
        // Lists
        .route(
            "/api/boards/{board_id}/lists",
            routing::post(create_list).get(get_lists),
        )
        .route(
            "/api/boards/{board_id}/lists/{list_id}",
            routing::delete(delete_list),
        )
        // Tasks
        .route("/api/boards/{board_id}/tasks", routing::get(get_tasks))
        .route("/api/tasks", routing::post(create_task))
        .route(
            "/api/tasks/{task_id}",
            routing::put(update_task).delete(delete_task),
        )
        .route("/api/tasks/{task_id}/move", routing::post(move_task))
        // Realtime
        .route("/api/realtime", routing::get(subscribe))
        .route(
            "/api/realtime/{connection_id}/boards/{board_id}",
            routing::post(join_board).delete(leave_board),
        )
}
