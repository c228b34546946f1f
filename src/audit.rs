//! Append-only audit trail of student mutations.
//!
//! Entries are written through whatever connection the caller hands in, which
//! for every roster mutation is the open transaction carrying the change, so
//! the audit row commits or rolls back with it.

use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, Set};

use crate::clock;
use crate::entity::audit_log::{self, ActiveModel as AuditLogActiveModel, AuditAction};
use crate::entity::student;

/// Field name recorded for marks changes.
pub const MARKS_FIELD: &str = "marks";

/// One audit row waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    pub teacher_id: Option<i32>,
    pub student_id: Option<i32>,
    pub action: AuditAction,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl AuditEntry {
    /// A student was created; the new row is captured as a snapshot.
    pub fn inserted(teacher_id: i32, student: &student::Model) -> Self {
        Self {
            teacher_id: Some(teacher_id),
            student_id: Some(student.id),
            action: AuditAction::Insert,
            field: None,
            old_value: None,
            new_value: Some(student.snapshot()),
        }
    }

    /// A student's marks changed from `old` to `new`.
    pub fn marks_changed(teacher_id: i32, student_id: i32, old: i32, new: i32) -> Self {
        Self {
            teacher_id: Some(teacher_id),
            student_id: Some(student_id),
            action: AuditAction::Update,
            field: Some(MARKS_FIELD.to_string()),
            old_value: Some(old.to_string()),
            new_value: Some(new.to_string()),
        }
    }

    /// A student is about to be removed; `student` is the pre-delete row.
    pub fn deleted(teacher_id: i32, student: &student::Model) -> Self {
        Self {
            teacher_id: Some(teacher_id),
            student_id: Some(student.id),
            action: AuditAction::Delete,
            field: None,
            old_value: Some(student.snapshot()),
            new_value: None,
        }
    }
}

/// Appends `entry` using `conn`, normally the mutation's own transaction.
pub async fn record<C>(conn: &C, entry: AuditEntry) -> Result<audit_log::Model, DbErr>
where
    C: ConnectionTrait,
{
    AuditLogActiveModel {
        teacher_id: Set(entry.teacher_id),
        student_id: Set(entry.student_id),
        action: Set(entry.action),
        field: Set(entry.field),
        old_value: Set(entry.old_value),
        new_value: Set(entry.new_value),
        timestamp: Set(clock::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
}
