#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryOrder};
use sea_orm_migration::MigratorTrait;
use student_roster::entity::audit_log;
use student_roster::migration::Migrator;
use student_roster::CredentialStore;

/// Fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
pub async fn setup() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

/// File-backed SQLite database with a pool of `connections`, so concurrent
/// transactions really run on separate connections. Lives as long as `dir`.
pub async fn setup_pooled(dir: &tempfile::TempDir, connections: u32) -> DatabaseConnection {
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("roster.db").display());
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(connections)
        .min_connections(connections)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect to sqlite file");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

/// Credential store cheap enough for tests.
pub fn credentials(db: &DatabaseConnection) -> CredentialStore {
    CredentialStore::new(db.clone()).with_iterations(10)
}

/// Registers a teacher and returns its id.
pub async fn teacher(db: &DatabaseConnection, username: &str) -> i32 {
    credentials(db)
        .register(username, "correct horse", "Test Teacher")
        .await
        .expect("register teacher")
}

pub async fn audit_rows(db: &DatabaseConnection) -> Vec<audit_log::Model> {
    audit_log::Entity::find()
        .order_by_asc(audit_log::Column::Id)
        .all(db)
        .await
        .expect("load audit rows")
}
