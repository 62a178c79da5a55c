//! Realtime fan-out integration tests
//!
//! Drives the coordinator and asserts what a subscribed room member sees.

use tokio::time::{timeout, Duration};

use taskboard::realtime::event::{BoardEvent, EventKind};
use taskboard::sync::coordinator::CreateTask;
use taskboard::tasks::db::TaskStatus;

use crate::common::{caller, create_test_user, setup};

async fn next_event(rx: &mut tokio::sync::mpsc::UnboundedReceiver<BoardEvent>) -> BoardEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

#[tokio::test]
async fn test_room_member_sees_mutation_then_activity() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Live").await.unwrap();
    let (conn, mut rx) = env.rooms.connect();
    env.rooms.join(conn, board.id);

    let task = env
        .coordinator
        .create_task(
            &me,
            CreateTask {
                title: "Visible".into(),
                description: String::new(),
                board: board.id,
                list: lists[0].id,
                status: TaskStatus::Todo,
                position: 0,
                due_date: None,
            },
        )
        .await
        .unwrap();

    let created = next_event(&mut rx).await;
    assert_eq!(created.kind, EventKind::TaskCreated);
    assert_eq!(created.data["id"], serde_json::json!(task.id));
    assert_eq!(created.data["title"], "Visible");

    let audit = next_event(&mut rx).await;
    assert_eq!(audit.kind, EventKind::ActivityCreated);
    assert_eq!(audit.data["type"], "task:created");
    assert_eq!(audit.data["actor_name"], "ada");
}

#[tokio::test]
async fn test_non_members_hear_nothing() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, _) = env.coordinator.create_board(&me, "Quiet").await.unwrap();
    let (other_board, _) = env.coordinator.create_board(&me, "Loud").await.unwrap();

    let (conn, mut rx) = env.rooms.connect();
    env.rooms.join(conn, board.id);

    env.coordinator
        .create_list(&me, other_board.id, "Elsewhere", None)
        .await
        .unwrap();

    // Create one event in the joined room to bracket the silence.
    env.coordinator
        .create_list(&me, board.id, "Here", None)
        .await
        .unwrap();
    let first = next_event(&mut rx).await;
    assert_eq!(first.kind, EventKind::ListCreated);
    assert_eq!(first.data["title"], "Here");
}

#[tokio::test]
async fn test_board_deleted_event_reaches_the_room() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, _) = env.coordinator.create_board(&me, "Ending").await.unwrap();
    let (conn, mut rx) = env.rooms.connect();
    env.rooms.join(conn, board.id);

    env.coordinator.delete_board(&me, board.id).await.unwrap();

    let deleted = next_event(&mut rx).await;
    assert_eq!(deleted.kind, EventKind::BoardDeleted);
    assert_eq!(deleted.data["id"], serde_json::json!(board.id));

    // The deletion is announced on the activity stream but never persisted;
    // the board's trail went away with the cascade.
    let audit = next_event(&mut rx).await;
    assert_eq!(audit.kind, EventKind::ActivityCreated);
    assert_eq!(audit.data["type"], "board:deleted");
    assert!(env.activities.recent(board.id, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_leave_stops_delivery() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, _) = env.coordinator.create_board(&me, "Revolving").await.unwrap();
    let (conn, mut rx) = env.rooms.connect();
    env.rooms.join(conn, board.id);

    env.coordinator
        .create_list(&me, board.id, "Before", None)
        .await
        .unwrap();
    let first = next_event(&mut rx).await;
    assert_eq!(first.kind, EventKind::ListCreated);
    // Drain the paired activity event.
    let audit = next_event(&mut rx).await;
    assert_eq!(audit.kind, EventKind::ActivityCreated);

    env.rooms.leave(conn, board.id);
    env.coordinator
        .create_list(&me, board.id, "After", None)
        .await
        .unwrap();

    // Give the fan-out worker time to run, then confirm silence.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());
}
