//! PostgreSQL repository tests
//!
//! These use a real database through testcontainers and need Docker:
//! `cargo test -p domain_users -- --ignored`

use domain_users::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

fn new_user(builder: &TestDataBuilder, label: &str, role: Role) -> User {
    User::new(
        builder.name("user", label),
        builder.email(label),
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        builder.address(),
        role,
    )
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_create_and_get");

    let created = repo
        .create(new_user(&builder, "owner", Role::StoreOwner))
        .await
        .unwrap();
    assert_eq!(created.role, Role::StoreOwner);

    let by_id = assert_some(repo.get_by_id(created.id).await.unwrap(), "user by id");
    assert_uuid_eq(by_id.id, created.id, "user id");

    let by_email = assert_some(
        repo.get_by_email(&builder.email("owner")).await.unwrap(),
        "user by email",
    );
    assert_uuid_eq(by_email.id, created.id, "user id by email");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_email_constraint() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_unique_email");

    repo.create(new_user(&builder, "dup", Role::User)).await.unwrap();
    let result = repo.create(new_user(&builder, "dup", Role::User)).await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_case_insensitively() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_list_filters");

    for (label, role) in [
        ("alpha", Role::User),
        ("bravo", Role::StoreOwner),
        ("charlie", Role::User),
    ] {
        repo.create(new_user(&builder, label, role)).await.unwrap();
    }

    let found = repo
        .list(UserFilter {
            email: Some("BRAVO".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].role, Role::StoreOwner);

    let users = repo
        .list(UserFilter {
            role: Some(Role::User),
            sort_by: Some(UserSortField::Email),
            order: Some(SortOrder::Desc),
            ..Default::default()
        })
        .await
        .unwrap();
    let emails: Vec<_> = users.iter().map(|u| u.email.clone()).collect();
    assert_eq!(emails, [builder.email("charlie"), builder.email("alpha")]);

    // LIKE wildcards in the term are matched literally
    let none = repo
        .list(UserFilter {
            name: Some("%".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_password() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_update_password");

    let created = repo.create(new_user(&builder, "pw", Role::User)).await.unwrap();
    repo.update_password(created.id, "$argon2id$new".into())
        .await
        .unwrap();

    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "user");
    assert_eq!(fetched.password_hash, "$argon2id$new");

    let missing = repo.update_password(Uuid::now_v7(), "x".into()).await;
    assert!(matches!(missing, Err(UserError::NotFound(_))));
}
