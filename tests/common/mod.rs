//! Common test utilities and helpers
//!
//! Builds a full coordinator + fan-out pipeline against an in-memory record
//! store, and provides helpers for creating users and callers.

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration, Instant};
use uuid::Uuid;

use taskboard::activity::db::ActivityStore;
use taskboard::auth::users::UserStore;
use taskboard::auth::Identity;
use taskboard::boards::db::BoardStore;
use taskboard::lists::db::ListStore;
use taskboard::realtime::rooms::RoomRegistry;
use taskboard::server::config::connect_store;
use taskboard::sync::{fanout, BoardUpdate, Caller, Coordinator};
use taskboard::tasks::db::TaskStore;

/// A fully wired pipeline over an in-memory store, with direct store handles
/// so tests can observe what the coordinator and fan-out worker wrote.
pub struct TestEnv {
    pub coordinator: Coordinator,
    pub rooms: RoomRegistry,
    pub users: UserStore,
    pub activities: ActivityStore,
    pub lists: ListStore,
    pub tasks: TaskStore,
    pub boards: BoardStore,
}

/// Build a coordinator, room registry, and running fan-out worker over a
/// fresh in-memory database.
pub async fn setup() -> TestEnv {
    let pool = connect_store("sqlite::memory:")
        .await
        .expect("in-memory store");

    let boards = BoardStore::new(pool.clone());
    let lists = ListStore::new(pool.clone());
    let tasks = TaskStore::new(pool.clone());
    let users = UserStore::new(pool.clone());
    let activities = ActivityStore::new(pool);

    let rooms = RoomRegistry::new();
    let (update_tx, update_rx) = mpsc::unbounded_channel::<BoardUpdate>();
    fanout::spawn(update_rx, activities.clone(), users.clone(), rooms.clone());

    let coordinator = Coordinator::new(
        boards.clone(),
        lists.clone(),
        tasks.clone(),
        users.clone(),
        activities.clone(),
        update_tx,
    );

    TestEnv {
        coordinator,
        rooms,
        users,
        activities,
        lists,
        tasks,
        boards,
    }
}

/// Create a user and return its identity. Uses the minimum bcrypt cost to
/// keep the suite fast.
pub async fn create_test_user(env: &TestEnv, name: &str) -> Identity {
    let email = format!("{}-{}@example.com", name, Uuid::new_v4().simple());
    let password_hash = bcrypt::hash("password123", 4).expect("hash");
    let user = env
        .users
        .create(name, &email, &password_hash)
        .await
        .expect("create user");
    Identity {
        user_id: user.id,
        email: user.email,
        name: user.name,
    }
}

/// Caller authenticated as the given identity.
pub fn caller(identity: &Identity) -> Caller {
    Caller {
        identity: Some(identity.clone()),
        share_token: None,
    }
}

/// Unauthenticated caller holding a share token.
pub fn visitor(token: &str) -> Caller {
    Caller {
        identity: None,
        share_token: Some(token.to_string()),
    }
}

/// Wait until the board's activity trail holds at least `count` entries.
///
/// The fan-out worker records activity asynchronously, so tests poll rather
/// than assume the row exists when the mutation returns.
pub async fn wait_for_activities(
    env: &TestEnv,
    board: Uuid,
    count: usize,
) -> Vec<taskboard::activity::db::Activity> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let entries = env.activities.recent(board, 100).await.expect("recent");
        if entries.len() >= count {
            return entries;
        }
        if Instant::now() > deadline {
            panic!(
                "timed out waiting for {} activity entries, got {}",
                count,
                entries.len()
            );
        }
        sleep(Duration::from_millis(10)).await;
    }
}
