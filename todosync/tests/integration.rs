mod common;

use sea_orm::{EntityTrait, PaginatorTrait};
use todosync::entity::task;
use todosync::{methods, resolvers, RequestContext, TaskError, WriteKind};

use common::{fixture, tick};

#[tokio::test]
async fn test_task_writes_are_broadcast() {
    let fx = fixture().await;
    let mut rx = fx.store.change_rx();

    resolvers::add_task(&fx.store, &fx.alice, "Test notification")
        .await
        .expect("Failed to add task");

    let notification = rx.try_recv().expect("Should have received a change notification");
    assert_eq!(notification.table, "tasks");
    assert_eq!(notification.kind, WriteKind::Insert);
}

#[tokio::test]
async fn test_account_writes_are_not_broadcast() {
    let fx = fixture().await;
    let mut rx = fx.store.change_rx();

    fx.accounts
        .create_user("carol", "password")
        .await
        .expect("Failed to create carol");

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_anonymous_caller_gets_no_data_and_writes_nothing() {
    let fx = fixture().await;
    let anonymous = RequestContext::anonymous();

    let user = resolvers::logged_user(&fx.store, &anonymous).await.unwrap();
    assert!(user.is_none());

    let tasks = resolvers::tasks(&fx.store, &anonymous).await;
    assert!(matches!(tasks, Err(TaskError::Unauthenticated)));

    let added = resolvers::add_task(&fx.store, &anonymous, "buy milk").await;
    assert!(matches!(added, Err(TaskError::Unauthenticated)));

    let count = task::Entity::find().count(&fx.store).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_logged_user_returns_the_caller() {
    let fx = fixture().await;
    let user = resolvers::logged_user(&fx.store, &fx.alice)
        .await
        .unwrap()
        .expect("alice is logged in");
    assert_eq!(user.username, "alice");
    assert_eq!(Some(user.id.as_str()), fx.alice.user_id());
}

#[tokio::test]
async fn test_tasks_are_scoped_to_owner_newest_first() {
    let fx = fixture().await;
    for text in ["first", "second", "third"] {
        resolvers::add_task(&fx.store, &fx.alice, text).await.unwrap();
        tick().await;
    }
    resolvers::add_task(&fx.store, &fx.bob, "bob's").await.unwrap();

    let tasks = resolvers::tasks(&fx.store, &fx.alice).await.unwrap();
    let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(tasks.iter().all(|t| Some(t.user_id.as_str()) == fx.alice.user_id()));
    assert!(tasks.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let bobs = resolvers::tasks(&fx.store, &fx.bob).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].text, "bob's");
}

#[tokio::test]
async fn test_add_task_creates_one_unchecked_record() {
    let fx = fixture().await;
    let before = todosync::server_time();

    let created = resolvers::add_task(&fx.store, &fx.alice, "buy milk")
        .await
        .expect("Failed to add task");

    assert_eq!(created.text, "buy milk");
    assert!(!created.is_checked);
    assert_eq!(Some(created.user_id.as_str()), fx.alice.user_id());
    assert!(created.created_at >= before);
    assert!(!created.id.is_empty());

    let all = task::Entity::find().all(&fx.store).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], created);
}

#[tokio::test]
async fn test_add_task_trims_and_rejects_blank_text() {
    let fx = fixture().await;

    let created = resolvers::add_task(&fx.store, &fx.alice, "  walk dog \n")
        .await
        .unwrap();
    assert_eq!(created.text, "walk dog");

    let blank = resolvers::add_task(&fx.store, &fx.alice, "   ").await;
    assert!(matches!(blank, Err(TaskError::Validation(_))));
    assert_eq!(task::Entity::find().count(&fx.store).await.unwrap(), 1);
}

#[tokio::test]
async fn test_task_user_resolves_owner() {
    let fx = fixture().await;
    let created = resolvers::add_task(&fx.store, &fx.bob, "fix bike").await.unwrap();

    let owner = resolvers::task_user(&fx.store, &created).await.unwrap();
    assert_eq!(owner.username, "bob");
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let fx = fixture().await;
    let created = resolvers::add_task(&fx.store, &fx.alice, "water plants")
        .await
        .unwrap();

    let checked = methods::set_is_checked(&fx.store, &fx.alice, &created.id, !created.is_checked)
        .await
        .unwrap();
    assert!(checked.is_checked);

    let restored = methods::set_is_checked(&fx.store, &fx.alice, &checked.id, !checked.is_checked)
        .await
        .unwrap();
    assert_eq!(restored.is_checked, created.is_checked);
}

#[tokio::test]
async fn test_methods_enforce_ownership() {
    let fx = fixture().await;
    let created = resolvers::add_task(&fx.store, &fx.alice, "private").await.unwrap();

    let toggle = methods::set_is_checked(&fx.store, &fx.bob, &created.id, true).await;
    assert!(matches!(toggle, Err(TaskError::Forbidden(_))));

    let remove = methods::remove(&fx.store, &fx.bob, &created.id).await;
    assert!(matches!(remove, Err(TaskError::Forbidden(_))));

    let anonymous = methods::remove(&fx.store, &RequestContext::anonymous(), &created.id).await;
    assert!(matches!(anonymous, Err(TaskError::Unauthenticated)));

    let missing = methods::remove(&fx.store, &fx.alice, "no-such-task").await;
    assert!(matches!(missing, Err(TaskError::NotFound { .. })));

    let still_there = task::Entity::find_by_id(created.id.clone())
        .one(&fx.store)
        .await
        .unwrap()
        .expect("task should survive");
    assert!(!still_there.is_checked);
}

#[tokio::test]
async fn test_remove_deletes_and_broadcasts() {
    let fx = fixture().await;
    let created = resolvers::add_task(&fx.store, &fx.alice, "temp").await.unwrap();
    let mut rx = fx.store.change_rx();

    methods::remove(&fx.store, &fx.alice, &created.id).await.unwrap();

    assert_eq!(rx.try_recv().unwrap().kind, WriteKind::Delete);
    assert!(resolvers::tasks(&fx.store, &fx.alice).await.unwrap().is_empty());
}
