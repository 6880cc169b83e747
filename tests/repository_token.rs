use sqlx::PgPool;
use std::sync::Arc;
use tiny_url::domain::entities::OwnerId;
use tiny_url::domain::repositories::TokenRepository;
use tiny_url::infrastructure::persistence::PgTokenRepository;

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("test-token", &OwnerId::new("alice"), "hash123")
        .await
        .unwrap();

    assert_eq!(token.name, "test-token");
    assert_eq!(token.owner, OwnerId::new("alice"));
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("valid-token", &OwnerId::new("alice"), "validhash")
        .await
        .unwrap();

    let found = repo.find_active("validhash").await.unwrap().unwrap();
    assert_eq!(found.owner, OwnerId::new("alice"));

    assert!(repo.find_active("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_revoked_token_is_not_active(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("revoked-token", &OwnerId::new("alice"), "revokedhash")
        .await
        .unwrap();

    assert!(repo.revoke_token(token.id).await.unwrap());
    assert!(repo.find_active("revokedhash").await.unwrap().is_none());

    // Revoking twice changes nothing.
    assert!(!repo.revoke_token(token.id).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("used-token", &OwnerId::new("bob"), "usedhash")
        .await
        .unwrap();

    repo.update_last_used("usedhash").await.unwrap();

    let token = repo.find_by_name("used-token").await.unwrap().unwrap();
    assert!(token.last_used_at.is_some());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_tokens(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("token-1", &OwnerId::new("alice"), "hash1")
        .await
        .unwrap();
    repo.create_token("token-2", &OwnerId::new("bob"), "hash2")
        .await
        .unwrap();

    let tokens = repo.list_tokens().await.unwrap();

    assert_eq!(tokens.len(), 2);
    assert!(repo.find_by_name("token-3").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_name_fails(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("same", &OwnerId::new("alice"), "hash1")
        .await
        .unwrap();

    let result = repo
        .create_token("same", &OwnerId::new("bob"), "hash2")
        .await;

    assert!(result.is_err());
}
