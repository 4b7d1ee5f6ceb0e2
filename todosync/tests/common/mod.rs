#![allow(dead_code)]

use todosync::accounts::MIN_COST;
use todosync::{Accounts, RequestContext, TaskStore, TaskStoreBuilder};

pub struct Fixture {
    pub store: TaskStore,
    pub accounts: Accounts,
    pub alice: RequestContext,
    pub bob: RequestContext,
}

pub async fn store() -> TaskStore {
    let _ = env_logger::builder().is_test(true).try_init();
    TaskStoreBuilder::new("sqlite::memory:")
        .build()
        .await
        .expect("Failed to create TaskStore")
}

/// Accounts with the cheapest bcrypt cost, so logins stay fast in tests.
pub fn accounts(store: TaskStore) -> Accounts {
    Accounts::new(store).with_hash_cost(MIN_COST)
}

/// A store with two accounts, `alice` and `bob`, both with password `password`.
pub async fn fixture() -> Fixture {
    let store = store().await;
    let accounts = accounts(store.clone());
    let alice = accounts
        .create_user("alice", "password")
        .await
        .expect("Failed to create alice");
    let bob = accounts
        .create_user("bob", "password")
        .await
        .expect("Failed to create bob");
    Fixture {
        store,
        accounts,
        alice: RequestContext::for_user(alice.id),
        bob: RequestContext::for_user(bob.id),
    }
}

/// Keep consecutive inserts on distinct millisecond timestamps.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}
