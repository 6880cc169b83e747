use chrono::{Duration, SubsecRound, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tiny_url::domain::entities::{OwnerId, ShortUrl};
use tiny_url::domain::repositories::{StoreError, UrlRepository};
use tiny_url::infrastructure::persistence::PgUrlRepository;

fn short_url(alias: &str, original: &str, owner: &str, ttl: Duration) -> ShortUrl {
    ShortUrl::new(
        alias.to_string(),
        original.to_string(),
        OwnerId::new(owner),
        Utc::now().trunc_subsecs(0),
        ttl,
    )
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_and_get(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let url = short_url("abc12345", "https://example.com", "alice", Duration::hours(1));

    let alias = repo.create(url.clone()).await.unwrap();
    assert_eq!(alias, "abc12345");

    let stored = repo.get("abc12345").await.unwrap().unwrap();
    assert_eq!(stored, url);

    assert!(repo.get("missing").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_create_duplicate_alias(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(short_url("dup", "https://a.example.com", "alice", Duration::hours(1)))
        .await
        .unwrap();

    let result = repo
        .create(short_url("dup", "https://b.example.com", "bob", Duration::hours(1)))
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateAlias(alias)) if alias == "dup"));
    let stored = repo.get("dup").await.unwrap().unwrap();
    assert_eq!(stored.original, "https://a.example.com");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_get_by_original_and_owner(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(short_url("old", "https://example.com", "alice", Duration::hours(1)))
        .await
        .unwrap();
    repo.create(short_url("new", "https://example.com", "alice", Duration::hours(2)))
        .await
        .unwrap();
    repo.create(short_url("bobs", "https://example.com", "bob", Duration::hours(3)))
        .await
        .unwrap();

    let found = repo
        .get_by_original_and_owner("https://example.com", &OwnerId::new("alice"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.alias, "new");

    let none = repo
        .get_by_original_and_owner("https://other.example.com", &OwnerId::new("alice"))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_list_by_owner(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.create(short_url("a1", "https://a.example.com", "alice", Duration::hours(1)))
        .await
        .unwrap();
    repo.create(short_url("a2", "https://b.example.com", "alice", Duration::hours(1)))
        .await
        .unwrap();
    repo.create(short_url("b1", "https://a.example.com", "bob", Duration::hours(1)))
        .await
        .unwrap();

    let urls = repo.list_by_owner(&OwnerId::new("alice")).await.unwrap();

    let mut aliases: Vec<_> = urls.iter().map(|u| u.alias.as_str()).collect();
    aliases.sort();
    assert_eq!(aliases, ["a1", "a2"]);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_prolong(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    let url = short_url("p1", "https://example.com", "alice", Duration::hours(1));
    repo.create(url.clone()).await.unwrap();

    assert!(repo.prolong("p1", Duration::minutes(30)).await.unwrap());

    let stored = repo.get("p1").await.unwrap().unwrap();
    assert_eq!(stored.expired_at, url.expired_at + Duration::minutes(30));

    assert!(!repo.prolong("missing", Duration::minutes(30)).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_delete(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));
    repo.create(short_url("d1", "https://example.com", "alice", Duration::hours(1)))
        .await
        .unwrap();

    assert!(repo.delete("d1").await.unwrap());
    assert!(repo.get("d1").await.unwrap().is_none());
    assert!(!repo.delete("d1").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert!(repo.health_check().await);
}
