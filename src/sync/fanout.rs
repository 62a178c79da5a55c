/**
 * Update Fan-out Task
 *
 * The single consumer of the coordinator's update queue. For each update,
 * in order: append the activity entry, publish the mutation event to the
 * board's room, publish the matching `activity:created` event.
 *
 * This path is best-effort by design. A failed activity insert is logged and
 * suppressed, never surfaced to the mutation's caller; room delivery is
 * fire-and-forget per connection. Because there is exactly one consumer,
 * per-room delivery order equals mutation order.
 */
use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::activity::db::{Activity, ActivityStore};
use crate::auth::users::UserStore;
use crate::realtime::event::{BoardEvent, EventKind};
use crate::realtime::rooms::RoomRegistry;
use crate::sync::update::BoardUpdate;

/// Spawn the fan-out task.
pub fn spawn(
    updates: mpsc::UnboundedReceiver<BoardUpdate>,
    activities: ActivityStore,
    users: UserStore,
    rooms: RoomRegistry,
) -> JoinHandle<()> {
    tokio::spawn(run(updates, activities, users, rooms))
}

async fn run(
    mut updates: mpsc::UnboundedReceiver<BoardUpdate>,
    activities: ActivityStore,
    users: UserStore,
    rooms: RoomRegistry,
) {
    tracing::info!("update fan-out task started");
    while let Some(update) = updates.recv().await {
        handle(&activities, &users, &rooms, update).await;
    }
    tracing::info!("update queue closed, fan-out task stopping");
}

async fn handle(
    activities: &ActivityStore,
    users: &UserStore,
    rooms: &RoomRegistry,
    update: BoardUpdate,
) {
    // Display-name snapshot for the audit entry. Best effort; an
    // unauthenticated share-token actor has neither id nor name.
    let actor_name = match update.actor {
        Some(actor) => match users.get(actor).await {
            Ok(Some(user)) => Some(user.name),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("actor lookup failed for activity: {:?}", e);
                None
            }
        },
        None => None,
    };

    let entry = if update.persist {
        match activities
            .append(
                update.board,
                update.list,
                update.task,
                update.actor,
                actor_name.as_deref(),
                update.kind,
                &update.detail,
            )
            .await
        {
            Ok(entry) => Some(entry),
            Err(e) => {
                // The mutation already succeeded; losing its audit entry is
                // logged, not propagated.
                tracing::error!("activity append failed for board {}: {:?}", update.board, e);
                None
            }
        }
    } else {
        // board:deleted - the trail was removed with the board, but the room
        // still hears about it.
        Some(Activity {
            id: Uuid::new_v4(),
            board: update.board,
            list: update.list,
            task: update.task,
            actor: update.actor,
            actor_name,
            kind: update.kind,
            data: update.detail.clone(),
            created_at: Utc::now(),
        })
    };

    rooms.publish(update.board, BoardEvent::new(update.event, update.payload));

    if let Some(entry) = entry {
        match serde_json::to_value(&entry) {
            Ok(data) => {
                rooms.publish(update.board, BoardEvent::new(EventKind::ActivityCreated, data));
            }
            Err(e) => tracing::error!("activity serialization failed: {:?}", e),
        }
    }
}
