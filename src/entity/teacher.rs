//! Teacher entity model.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing a registered teacher.
///
/// | Column        | Type               | Description                          |
/// |---------------|--------------------|--------------------------------------|
/// | id            | INTEGER (PK)       | Teacher ID                           |
/// | username      | TEXT (unique)      | Login name, matched exactly          |
/// | display_name  | TEXT               | Name given at registration           |
/// | password_hash | TEXT               | Hex PBKDF2-HMAC-SHA256 digest        |
/// | salt          | TEXT               | Hex salt used for `password_hash`    |
/// | created_at    | TIMESTAMPTZ        | Registration time                    |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_token::Entity")]
    SessionToken,
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLog,
}

impl Related<super::session_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionToken.def()
    }
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
