//! Session token entity model.
//!
//! Maps to the `session_token` table. A row exists for every token that has
//! been issued and not yet revoked or lazily removed after expiry.

use sea_orm::entity::prelude::*;

/// Sea-ORM entity model representing an issued bearer token.
///
/// # Database Schema
///
/// | Column     | Type               | Description                          |
/// |------------|--------------------|--------------------------------------|
/// | token      | TEXT (Primary Key) | URL-safe base64 bearer token         |
/// | teacher_id | INTEGER (FK)       | Owning teacher, cascades on delete   |
/// | created_at | TIMESTAMPTZ        | Issuance time                        |
/// | expires_at | TIMESTAMPTZ        | First instant the token is invalid   |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "session_token")]
pub struct Model {
    /// The opaque token string handed to the client.
    ///
    /// Serves as the primary key, so lookups during authentication are a
    /// single indexed read.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub token: String,

    pub teacher_id: i32,

    pub created_at: DateTimeWithTimeZone,

    /// The token is valid on `[created_at, expires_at)`.
    pub expires_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether the token is no longer usable at `now`.
    pub fn is_expired(&self, now: DateTimeWithTimeZone) -> bool {
        now >= self.expires_at
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Cascade"
    )]
    Teacher,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
