mod common;

use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};
use student_roster::entity::teacher;
use student_roster::Error;

#[tokio::test]
async fn register_stores_salted_hash_not_password() {
    let db = common::setup().await;
    let store = common::credentials(&db);

    let id = store.register("  mrs_k ", "hunter2", " Mrs K ").await.unwrap();
    let row = teacher::Entity::find_by_id(id).one(&db).await.unwrap().unwrap();

    assert_eq!(row.username, "mrs_k");
    assert_eq!(row.display_name, "Mrs K");
    assert_ne!(row.password_hash, "hunter2");
    assert_eq!(row.password_hash.len(), 64);
    assert_eq!(row.salt.len(), 32);
}

#[tokio::test]
async fn same_password_gets_different_hashes() {
    let db = common::setup().await;
    let store = common::credentials(&db);

    let a = store.register("a", "same", "A").await.unwrap();
    let b = store.register("b", "same", "B").await.unwrap();

    let a = teacher::Entity::find_by_id(a).one(&db).await.unwrap().unwrap();
    let b = teacher::Entity::find_by_id(b).one(&db).await.unwrap().unwrap();
    assert_ne!(a.password_hash, b.password_hash);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let db = common::setup().await;
    let store = common::credentials(&db);

    store.register("mrs_k", "one", "Mrs K").await.unwrap();
    let err = store.register("mrs_k", "two", "Other").await.unwrap_err();

    assert!(matches!(err, Error::DuplicateUsername(ref name) if name == "mrs_k"));
    assert_eq!(teacher::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn blank_fields_are_rejected() {
    let db = common::setup().await;
    let store = common::credentials(&db);

    for (username, password, name) in [("", "pw", "N"), ("u", "   ", "N"), ("u", "pw", "  ")] {
        let err = store.register(username, password, name).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
    assert_eq!(teacher::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn verify_accepts_only_the_right_password() {
    let db = common::setup().await;
    let store = common::credentials(&db);
    let id = store.register("mrs_k", "hunter2", "Mrs K").await.unwrap();

    let ok = store.verify("mrs_k", "hunter2").await.unwrap();
    assert_eq!(ok.map(|t| t.id), Some(id));

    assert!(store.verify("mrs_k", "hunter3").await.unwrap().is_none());
    assert!(store.verify("nobody", "hunter2").await.unwrap().is_none());
    // Usernames match exactly
    assert!(store.verify("MRS_K", "hunter2").await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_username_costs_a_full_hash() {
    let db = common::setup().await;
    let store = student_roster::CredentialStore::new(db.clone()).with_iterations(20_000);
    store.register("mrs_k", "hunter2", "Mrs K").await.unwrap();

    let started = std::time::Instant::now();
    assert!(store.verify("mrs_k", "wrong").await.unwrap().is_none());
    let wrong_password = started.elapsed();

    let started = std::time::Instant::now();
    assert!(store.verify("nobody", "wrong").await.unwrap().is_none());
    let unknown_user = started.elapsed();

    // Generous bound: only a skipped hash is off by orders of magnitude
    assert!(
        unknown_user * 4 >= wrong_password,
        "unknown user took {unknown_user:?}, wrong password took {wrong_password:?}"
    );
}
