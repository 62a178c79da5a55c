//! Board lifecycle integration tests

use chrono::{Duration, Utc};
use pretty_assertions::{assert_eq, assert_ne};
use uuid::Uuid;

use taskboard::error::ApiError;
use taskboard::sync::Caller;
use taskboard::tasks::db::TaskStatus;

use crate::common::{caller, create_test_user, setup, visitor, wait_for_activities};

#[tokio::test]
async fn test_new_board_gets_default_lists() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;

    let (board, lists) = env
        .coordinator
        .create_board(&caller(&owner), "Launch plan")
        .await
        .unwrap();

    assert_eq!(board.title, "Launch plan");
    assert_eq!(board.owner, owner.user_id);

    let titles: Vec<&str> = lists.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["To Do", "In Progress", "Done"]);
    let positions: Vec<i64> = lists.iter().map(|l| l.position).collect();
    assert_eq!(positions, [0, 1, 2]);

    // The stored order matches what create_board returned.
    let stored = env
        .coordinator
        .lists_for_board(&caller(&owner), board.id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].title, "To Do");
}

#[tokio::test]
async fn test_create_board_requires_identity_and_title() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;

    let anonymous = Caller::default();
    assert!(matches!(
        env.coordinator.create_board(&anonymous, "x").await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        env.coordinator.create_board(&caller(&owner), "   ").await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_board_listing_covers_owned_and_saved() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let friend = create_test_user(&env, "grace").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Shared")
        .await
        .unwrap();
    env.coordinator
        .create_board(&caller(&friend), "Mine")
        .await
        .unwrap();

    let grant = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();
    let mut saving = caller(&friend);
    saving.share_token = Some(grant.token.clone());
    env.coordinator
        .save_shared_board(&saving, board.id)
        .await
        .unwrap();

    let boards = env.coordinator.boards_for(&caller(&friend)).await.unwrap();
    assert_eq!(boards.len(), 2);
}

#[tokio::test]
async fn test_delete_board_cascades_everything() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let me = caller(&owner);

    let (board, lists) = env.coordinator.create_board(&me, "Doomed").await.unwrap();
    env.coordinator
        .create_task(
            &me,
            taskboard::sync::coordinator::CreateTask {
                title: "Orphan candidate".into(),
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
    wait_for_activities(&env, board.id, 1).await;

    env.coordinator.delete_board(&me, board.id).await.unwrap();

    assert!(env.boards.get(board.id).await.unwrap().is_none());
    assert!(env.lists.for_board(board.id).await.unwrap().is_empty());
    assert!(env.tasks.for_board(board.id).await.unwrap().is_empty());
    assert!(env.activities.recent(board.id, 100).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_only_owner_manages_the_board() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let collaborator = create_test_user(&env, "grace").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Owned")
        .await
        .unwrap();
    let grant = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();

    let mut saving = caller(&collaborator);
    saving.share_token = Some(grant.token.clone());
    env.coordinator
        .save_shared_board(&saving, board.id)
        .await
        .unwrap();

    // A collaborator can edit but cannot rotate tokens or delete the board.
    assert!(matches!(
        env.coordinator
            .rotate_share_token(&caller(&collaborator), board.id)
            .await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        env.coordinator
            .delete_board(&caller(&collaborator), board.id)
            .await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn test_save_shared_board_conflicts() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let friend = create_test_user(&env, "grace").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Shared")
        .await
        .unwrap();
    let grant = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();

    // The owner cannot save their own board.
    let mut owner_with_token = caller(&owner);
    owner_with_token.share_token = Some(grant.token.clone());
    assert!(matches!(
        env.coordinator
            .save_shared_board(&owner_with_token, board.id)
            .await,
        Err(ApiError::Conflict(_))
    ));

    // Saving twice is a conflict too.
    let mut saving = caller(&friend);
    saving.share_token = Some(grant.token.clone());
    env.coordinator
        .save_shared_board(&saving, board.id)
        .await
        .unwrap();
    assert!(matches!(
        env.coordinator.save_shared_board(&saving, board.id).await,
        Err(ApiError::Conflict(_))
    ));

    // Saving without any token at all is denied.
    assert!(matches!(
        env.coordinator
            .save_shared_board(&caller(&friend), board.id)
            .await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn test_rotation_invalidates_previous_token() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Rotating")
        .await
        .unwrap();
    let first = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();
    let second = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();
    assert_ne!(first.token, second.token);
    assert_eq!(
        second.share_path,
        format!("/board/{}?share={}", board.id, second.token)
    );

    // Old link stops working, new one reads fine.
    assert!(matches!(
        env.coordinator
            .lists_for_board(&visitor(&first.token), board.id)
            .await,
        Err(ApiError::Forbidden)
    ));
    assert!(env
        .coordinator
        .lists_for_board(&visitor(&second.token), board.id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_expired_token_denies_visitors() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Stale link")
        .await
        .unwrap();
    env.boards
        .set_share_token(board.id, "deadbeef", Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert!(matches!(
        env.coordinator
            .lists_for_board(&visitor("deadbeef"), board.id)
            .await,
        Err(ApiError::Forbidden)
    ));
}

#[tokio::test]
async fn test_missing_board_denial_depends_on_caller() {
    let env = setup().await;
    let user = create_test_user(&env, "ada").await;
    let ghost = Uuid::new_v4();

    // Visitors cannot distinguish "no such board" from "no access".
    assert!(matches!(
        env.coordinator
            .lists_for_board(&visitor("sometoken"), ghost)
            .await,
        Err(ApiError::Forbidden)
    ));
    assert!(matches!(
        env.coordinator.lists_for_board(&caller(&user), ghost).await,
        Err(ApiError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_board_members_lists_owner_then_collaborators() {
    let env = setup().await;
    let owner = create_test_user(&env, "ada").await;
    let friend = create_test_user(&env, "grace").await;

    let (board, _) = env
        .coordinator
        .create_board(&caller(&owner), "Team")
        .await
        .unwrap();
    let grant = env
        .coordinator
        .rotate_share_token(&caller(&owner), board.id)
        .await
        .unwrap();
    let mut saving = caller(&friend);
    saving.share_token = Some(grant.token);
    env.coordinator
        .save_shared_board(&saving, board.id)
        .await
        .unwrap();

    let members = env
        .coordinator
        .board_members(&caller(&owner), board.id)
        .await
        .unwrap();
    assert_eq!(members.owner_id, owner.user_id);
    assert_eq!(members.users.len(), 2);
    assert_eq!(members.users[0].role, "owner");
    assert_eq!(members.users[1].role, "collaborator");
    assert_eq!(members.users[1].id, friend.user_id);
}
