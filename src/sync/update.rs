/**
 * Board Update Messages
 *
 * One `BoardUpdate` is produced per successful mutation and handed to the
 * fan-out task over an mpsc queue. The mutation response never waits on it.
 * Because the coordinator enqueues while still holding the board's mutation
 * lock and a single consumer drains the queue, updates reach the audit log
 * and the room in exactly the order mutations were applied.
 */
use serde_json::Value;
use uuid::Uuid;

use crate::activity::db::ActivityKind;
use crate::realtime::event::EventKind;

/// Everything the fan-out task needs to audit and broadcast one mutation.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    /// Board the mutation applied to.
    pub board: Uuid,
    /// List involved, if any.
    pub list: Option<Uuid>,
    /// Task involved, if any.
    pub task: Option<Uuid>,
    /// Acting user, if authenticated.
    pub actor: Option<Uuid>,
    /// Audit tag for the activity entry.
    pub kind: ActivityKind,
    /// Activity detail payload (already redacted by the coordinator).
    pub detail: Value,
    /// Room event name for the mutation broadcast.
    pub event: EventKind,
    /// Room event payload: canonical record, or the deleted id.
    pub payload: Value,
    /// Whether the activity entry is persisted. False only for
    /// `board:deleted`, whose board (and audit trail) no longer exists.
    pub persist: bool,
}
