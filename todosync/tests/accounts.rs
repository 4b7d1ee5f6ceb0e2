mod common;

use std::time::Duration;

use todosync::TaskError;

#[tokio::test]
async fn test_login_opens_a_session() {
    let store = common::store().await;
    let accounts = common::accounts(store);
    let alice = accounts.create_user("alice", "s3cret").await.unwrap();

    let session = accounts.login("alice", "s3cret").await.expect("login should succeed");
    assert_eq!(session.user_id, alice.id);

    let ctx = accounts.context_for(Some(&session.token));
    assert_eq!(ctx.user_id(), Some(alice.id.as_str()));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let accounts = common::accounts(common::store().await);
    accounts.create_user("alice", "s3cret").await.unwrap();

    let wrong_password = accounts.login("alice", "guess").await;
    assert!(matches!(wrong_password, Err(TaskError::InvalidCredentials)));

    let unknown_user = accounts.login("mallory", "s3cret").await;
    assert!(matches!(unknown_user, Err(TaskError::InvalidCredentials)));
}

#[tokio::test]
async fn test_unknown_and_closed_tokens_are_anonymous() {
    let accounts = common::accounts(common::store().await);
    accounts.create_user("alice", "s3cret").await.unwrap();
    let session = accounts.login("alice", "s3cret").await.unwrap();

    assert!(!accounts.context_for(None).is_authenticated());
    assert!(!accounts.context_for(Some("not-a-token")).is_authenticated());

    assert!(accounts.logout(&session.token));
    assert!(!accounts.logout(&session.token));
    assert!(!accounts.context_for(Some(&session.token)).is_authenticated());
}

#[tokio::test]
async fn test_usernames_are_unique_and_required() {
    let accounts = common::accounts(common::store().await);
    accounts.create_user("alice", "s3cret").await.unwrap();

    let duplicate = accounts.create_user(" alice ", "other").await;
    assert!(matches!(duplicate, Err(TaskError::Validation(_))));

    let blank = accounts.create_user("   ", "pw").await;
    assert!(matches!(blank, Err(TaskError::Validation(_))));
}

#[tokio::test]
async fn test_ensure_user_keeps_existing_password() {
    let accounts = common::accounts(common::store().await);
    let first = accounts.ensure_user("meteorite", "password").await.unwrap();
    let second = accounts.ensure_user("meteorite", "changed").await.unwrap();
    assert_eq!(first.id, second.id);

    assert!(accounts.login("meteorite", "password").await.is_ok());
    assert!(accounts.login("meteorite", "changed").await.is_err());
}

#[tokio::test]
async fn test_expired_sessions_are_anonymous() {
    let accounts = common::accounts(common::store().await).with_session_ttl(Duration::ZERO);
    accounts.create_user("alice", "s3cret").await.unwrap();

    let session = accounts.login("alice", "s3cret").await.unwrap();
    assert!(!accounts.context_for(Some(&session.token)).is_authenticated());
}

#[tokio::test]
async fn test_stored_hash_is_bcrypt() {
    let accounts = common::accounts(common::store().await);
    let alice = accounts.create_user("alice", "s3cret").await.unwrap();

    assert!(alice.password_hash.starts_with("$2"));
    assert!(!alice.password_hash.contains("s3cret"));
}
