mod common;

use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, ModelTrait, PaginatorTrait};
use student_roster::entity::{session_token, teacher};
use student_roster::{Error, SessionManager};
use time::Duration;

fn header(token: &str) -> String {
    format!("Token {token}")
}

#[tokio::test]
async fn issued_token_authenticates_its_teacher() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone());

    let issued = sessions.issue(teacher_id).await.unwrap();
    assert_eq!(issued.token.len(), 64);

    let ctx = sessions.authenticate(Some(header(&issued.token).as_str())).await.unwrap();
    assert_eq!(ctx.teacher.id, teacher_id);
    assert_eq!(ctx.teacher.username, "alice");
}

#[tokio::test]
async fn default_ttl_is_one_day() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone());

    let issued = sessions.issue(teacher_id).await.unwrap();
    let row = session_token::Entity::find_by_id(issued.token.clone())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.expires_at - row.created_at, chrono::Duration::hours(24));
    assert_eq!(row.expires_at, issued.expires_at);
}

#[tokio::test]
async fn teacher_may_hold_several_tokens() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone());

    let a = sessions.issue(teacher_id).await.unwrap();
    let b = sessions.issue(teacher_id).await.unwrap();
    assert_ne!(a.token, b.token);

    assert!(sessions.authenticate(Some(header(&a.token).as_str())).await.is_ok());
    assert!(sessions.authenticate(Some(header(&b.token).as_str())).await.is_ok());
}

#[tokio::test]
async fn malformed_headers_are_rejected() {
    let db = common::setup().await;
    let sessions = SessionManager::new(db.clone());

    assert!(matches!(sessions.authenticate(None).await, Err(Error::MissingHeader)));
    assert!(matches!(
        sessions.authenticate(Some("Bearer abc")).await,
        Err(Error::MissingHeader)
    ));
    assert!(matches!(
        sessions.authenticate(Some("Token   ")).await,
        Err(Error::MissingToken)
    ));
    assert!(matches!(
        sessions.authenticate(Some("Token not-a-real-token")).await,
        Err(Error::InvalidToken)
    ));
}

#[tokio::test]
async fn expired_token_is_deleted_on_first_use() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone()).with_ttl(Duration::ZERO);

    let issued = sessions.issue(teacher_id).await.unwrap();

    let first = sessions.authenticate(Some(header(&issued.token).as_str())).await;
    assert!(matches!(first, Err(Error::ExpiredToken)));
    assert_eq!(session_token::Entity::find().count(&db).await.unwrap(), 0);

    let second = sessions.authenticate(Some(header(&issued.token).as_str())).await;
    assert!(matches!(second, Err(Error::InvalidToken)));
}

#[tokio::test]
async fn revoke_is_idempotent() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone());

    let issued = sessions.issue(teacher_id).await.unwrap();
    let ctx = sessions.authenticate(Some(header(&issued.token).as_str())).await.unwrap();

    sessions.revoke(&ctx.session).await.unwrap();
    sessions.revoke(&ctx.session).await.unwrap();

    assert!(matches!(
        sessions.authenticate(Some(header(&issued.token).as_str())).await,
        Err(Error::InvalidToken)
    ));
}

#[tokio::test]
async fn purge_removes_only_expired_tokens() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;

    let live = SessionManager::new(db.clone());
    let dead = SessionManager::new(db.clone()).with_ttl(Duration::hours(-1));

    let kept = live.issue(teacher_id).await.unwrap();
    dead.issue(teacher_id).await.unwrap();
    dead.issue(teacher_id).await.unwrap();

    assert_eq!(live.purge_expired().await.unwrap(), 2);
    assert_eq!(session_token::Entity::find().count(&db).await.unwrap(), 1);
    assert!(live.authenticate(Some(header(&kept.token).as_str())).await.is_ok());
}

#[tokio::test]
async fn deleting_a_teacher_cascades_to_sessions() {
    let db = common::setup().await;
    let teacher_id = common::teacher(&db, "alice").await;
    let sessions = SessionManager::new(db.clone());
    let issued = sessions.issue(teacher_id).await.unwrap();

    let row = teacher::Entity::find_by_id(teacher_id).one(&db).await.unwrap().unwrap();
    row.delete(&db).await.unwrap();

    assert!(matches!(
        sessions.authenticate(Some(header(&issued.token).as_str())).await,
        Err(Error::InvalidToken)
    ));
}
