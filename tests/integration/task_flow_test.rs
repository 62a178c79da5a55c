//! Task mutation integration tests

use uuid::Uuid;

use taskboard::error::ApiError;
use taskboard::sync::coordinator::CreateTask;
use taskboard::tasks::db::{TaskPatch, TaskStatus};

use crate::common::{caller, create_test_user, setup, visitor};

fn new_task(board: Uuid, list: Uuid, title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: String::new(),
        board,
        list,
        status: TaskStatus::Todo,
        position: 0,
        due_date: None,
    }
}

#[tokio::test]
async fn test_create_task_lands_in_its_list() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Work").await.unwrap();
    let task = env
        .coordinator
        .create_task(&me, new_task(board.id, lists[0].id, "Write the parser"))
        .await
        .unwrap();

    assert_eq!(task.board, board.id);
    assert_eq!(task.list, lists[0].id);
    assert_eq!(task.status, TaskStatus::Todo);
    assert!(task.assignee.is_none());

    let stored = env.coordinator.tasks_for_board(&me, board.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Write the parser");
}

#[tokio::test]
async fn test_create_task_validates_list_ownership() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board_a, _) = env.coordinator.create_board(&me, "A").await.unwrap();
    let (_, lists_b) = env.coordinator.create_board(&me, "B").await.unwrap();

    // A list from another board is rejected, a missing list is not found.
    assert!(matches!(
        env.coordinator
            .create_task(&me, new_task(board_a.id, lists_b[0].id, "Stray"))
            .await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.coordinator
            .create_task(&me, new_task(board_a.id, Uuid::new_v4(), "Nowhere"))
            .await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_partial_update_touches_only_named_fields() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Work").await.unwrap();
    let task = env
        .coordinator
        .create_task(&me, new_task(board.id, lists[0].id, "Original"))
        .await
        .unwrap();

    let updated = env
        .coordinator
        .update_task(
            &me,
            task.id,
            TaskPatch {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.list, task.list);

    // An empty patch is a client error, not a no-op write.
    assert!(matches!(
        env.coordinator
            .update_task(&me, task.id, TaskPatch::default())
            .await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_assignment_requires_membership_and_real_user() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let friend = create_test_user(&env, "grace").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Work").await.unwrap();
    let grant = env
        .coordinator
        .rotate_share_token(&me, board.id)
        .await
        .unwrap();
    let task = env
        .coordinator
        .create_task(&me, new_task(board.id, lists[0].id, "Assign me"))
        .await
        .unwrap();

    // A share-token visitor may edit, but assignment is members-only.
    let guest = visitor(&grant.token);
    assert!(env
        .coordinator
        .update_task(
            &guest,
            task.id,
            TaskPatch {
                title: Some("Visitor edit".into()),
                ..Default::default()
            },
        )
        .await
        .is_ok());
    assert!(matches!(
        env.coordinator
            .update_task(
                &guest,
                task.id,
                TaskPatch {
                    assignee: Some(friend.user_id),
                    ..Default::default()
                },
            )
            .await,
        Err(ApiError::Forbidden)
    ));

    // The assignee must be a known user.
    assert!(matches!(
        env.coordinator
            .update_task(
                &me,
                task.id,
                TaskPatch {
                    assignee: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await,
        Err(ApiError::InvalidInput(_))
    ));

    let assigned = env
        .coordinator
        .update_task(
            &me,
            task.id,
            TaskPatch {
                assignee: Some(friend.user_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(assigned.assignee, Some(friend.user_id));
}

#[tokio::test]
async fn test_move_stays_within_the_board() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Work").await.unwrap();
    let (_, other_lists) = env.coordinator.create_board(&me, "Other").await.unwrap();
    let task = env
        .coordinator
        .create_task(&me, new_task(board.id, lists[0].id, "Mover"))
        .await
        .unwrap();

    let moved = env
        .coordinator
        .move_task(&me, task.id, lists[2].id)
        .await
        .unwrap();
    assert_eq!(moved.list, lists[2].id);
    assert_eq!(moved.board, board.id);

    assert!(matches!(
        env.coordinator
            .move_task(&me, task.id, other_lists[0].id)
            .await,
        Err(ApiError::InvalidInput(_))
    ));
    assert!(matches!(
        env.coordinator.move_task(&me, task.id, Uuid::new_v4()).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_list_takes_its_tasks_along() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Work").await.unwrap();
    env.coordinator
        .create_task(&me, new_task(board.id, lists[0].id, "In doomed list"))
        .await
        .unwrap();
    let survivor = env
        .coordinator
        .create_task(&me, new_task(board.id, lists[1].id, "Elsewhere"))
        .await
        .unwrap();

    env.coordinator
        .delete_list(&me, board.id, lists[0].id)
        .await
        .unwrap();

    let remaining = env.coordinator.tasks_for_board(&me, board.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor.id);

    // Deleting a list through the wrong board id is not found.
    let (other_board, _) = env.coordinator.create_board(&me, "Other").await.unwrap();
    assert!(matches!(
        env.coordinator
            .delete_list(&me, other_board.id, lists[1].id)
            .await,
        Err(ApiError::NotFound(_))
    ));
}
