//! Student entity model.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One roster row: a student's marks in one subject.
///
/// The storage layer enforces uniqueness of `(name, subject)` exactly as
/// written. The roster engine additionally matches identities
/// case-insensitively when accumulating marks.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub subject: String,
    /// Always within `0..=100`.
    pub marks: i32,
    #[serde(skip)]
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Human-readable `name - subject - marks` snapshot used by the audit trail.
    pub fn snapshot(&self) -> String {
        format!("{} - {} - {}", self.name, self.subject, self.marks)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::audit_log::Entity")]
    AuditLog,
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
