//! The roster engine: every read and write of `student` rows.
//!
//! Each mutation runs in its own transaction that first takes an exclusive
//! lock on the affected identity or row, applies the change, appends the
//! matching audit row and commits. Any error before the commit drops the
//! transaction, which rolls back both the change and its audit row.

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, Statement, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use crate::audit::{self, AuditEntry};
use crate::clock;
use crate::entity::student::{self, ActiveModel as StudentActiveModel, Entity as StudentEntity};
use crate::error::{Error, Result};

/// Upper bound of a student's marks. The lower bound is zero.
pub const MAX_MARKS: i32 = 100;

/// What [`RosterEngine::add_or_accumulate`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AddAction {
    Inserted,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub action: AddAction,
    pub student_id: i32,
}

/// Applies roster reads and mutations against the database.
///
/// Concurrency control is entirely pessimistic and lives in the store: writers
/// on the same identity or row queue on a lock held until commit. There is no
/// in-process locking or caching.
#[derive(Debug, Clone)]
pub struct RosterEngine {
    conn: DatabaseConnection,
}

impl RosterEngine {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All students ordered by name, then subject. Takes no locks.
    pub async fn list(&self) -> Result<Vec<student::Model>> {
        let students = StudentEntity::find()
            .order_by_asc(student::Column::Name)
            .order_by_asc(student::Column::Subject)
            .all(&self.conn)
            .await?;
        Ok(students)
    }

    /// Adds `marks_to_add` to the student matching `(name, subject)`
    /// case-insensitively, or creates that student with those marks.
    ///
    /// Accumulating past [`MAX_MARKS`] fails with [`Error::MarksOverflow`] and
    /// writes nothing; the total is never clamped.
    pub async fn add_or_accumulate(
        &self,
        name: &str,
        subject: &str,
        marks_to_add: i32,
        teacher_id: i32,
    ) -> Result<AddOutcome> {
        let name = name.trim();
        let subject = subject.trim();
        if name.is_empty() || subject.is_empty() {
            return Err(Error::validation("Name and subject are required"));
        }
        check_marks(marks_to_add)?;

        let txn = self.conn.begin().await?;

        lock_identity(&txn, name, subject).await?;

        let existing = StudentEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(student::Column::Name))).eq(name.to_lowercase()))
            .filter(
                Expr::expr(Func::lower(Expr::col(student::Column::Subject)))
                    .eq(subject.to_lowercase()),
            )
            .order_by_asc(student::Column::Id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let outcome = match existing {
            Some(existing) => {
                let old_marks = existing.marks;
                let new_marks = old_marks + marks_to_add;
                if new_marks > MAX_MARKS {
                    txn.rollback().await?;
                    return Err(Error::MarksOverflow {
                        current: old_marks,
                        adding: marks_to_add,
                    });
                }

                let student_id = existing.id;
                let mut active_model = existing.into_active_model();
                active_model.marks = Set(new_marks);
                active_model.update(&txn).await?;

                audit::record(
                    &txn,
                    AuditEntry::marks_changed(teacher_id, student_id, old_marks, new_marks),
                )
                .await?;

                info!(student_id, old_marks, new_marks, teacher_id, "marks accumulated");
                AddOutcome {
                    action: AddAction::Updated,
                    student_id,
                }
            }
            None => {
                let inserted = StudentActiveModel {
                    name: Set(name.to_string()),
                    subject: Set(subject.to_string()),
                    marks: Set(marks_to_add),
                    created_at: Set(clock::now()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;

                audit::record(&txn, AuditEntry::inserted(teacher_id, &inserted)).await?;

                info!(student_id = inserted.id, marks = inserted.marks, teacher_id, "student inserted");
                AddOutcome {
                    action: AddAction::Inserted,
                    student_id: inserted.id,
                }
            }
        };

        txn.commit().await?;
        Ok(outcome)
    }

    /// Overwrites a student's marks.
    ///
    /// Unlike [`add_or_accumulate`](Self::add_or_accumulate) this is a direct
    /// set: only the `0..=100` bound is checked.
    pub async fn set_marks(&self, student_id: i32, marks: i32, teacher_id: i32) -> Result<student::Model> {
        check_marks(marks)?;

        let txn = self.conn.begin().await?;

        let existing = find_locked(&txn, student_id).await?.ok_or(Error::NotFound)?;

        let old_marks = existing.marks;
        let mut active_model = existing.into_active_model();
        active_model.marks = Set(marks);
        let updated = active_model.update(&txn).await?;

        audit::record(
            &txn,
            AuditEntry::marks_changed(teacher_id, student_id, old_marks, marks),
        )
        .await?;

        txn.commit().await?;

        info!(student_id, old_marks, new_marks = marks, teacher_id, "marks set");
        Ok(updated)
    }

    /// Deletes a student, recording a snapshot of the row first.
    pub async fn delete(&self, student_id: i32, teacher_id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        let existing = find_locked(&txn, student_id).await?.ok_or(Error::NotFound)?;

        audit::record(&txn, AuditEntry::deleted(teacher_id, &existing)).await?;
        existing.delete(&txn).await?;

        txn.commit().await?;

        info!(student_id, teacher_id, "student deleted");
        Ok(())
    }
}

fn check_marks(marks: i32) -> Result<()> {
    if (0..=MAX_MARKS).contains(&marks) {
        Ok(())
    } else {
        Err(Error::validation("Marks should be between 0 and 100"))
    }
}

async fn find_locked(txn: &DatabaseTransaction, student_id: i32) -> Result<Option<student::Model>, DbErr> {
    StudentEntity::find_by_id(student_id)
        .lock_exclusive()
        .one(txn)
        .await
}

/// Serializes writers on one case-insensitive `(name, subject)` identity.
///
/// A row lock alone cannot do this for an identity with no row yet, so two
/// first-time adds would both insert. PostgreSQL gets a transaction-scoped
/// advisory lock keyed by the identity. SQLite has no row locks; the
/// transaction instead claims the database write lock up front.
async fn lock_identity(txn: &DatabaseTransaction, name: &str, subject: &str) -> Result<(), DbErr> {
    let backend = txn.get_database_backend();
    match backend {
        DbBackend::Postgres => {
            let key = format!("student\u{1f}{}\u{1f}{}", name.to_lowercase(), subject.to_lowercase());
            txn.execute(Statement::from_sql_and_values(
                backend,
                "SELECT pg_advisory_xact_lock(hashtext($1))",
                [key.into()],
            ))
            .await?;
        }
        DbBackend::Sqlite => {
            txn.execute_unprepared("UPDATE student SET marks = marks WHERE 0 = 1")
                .await?;
        }
        // Only the postgres and sqlite backends are built
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_bounds_are_inclusive() {
        assert!(check_marks(0).is_ok());
        assert!(check_marks(100).is_ok());
        assert!(matches!(check_marks(-1), Err(Error::Validation(_))));
        assert!(matches!(check_marks(101), Err(Error::Validation(_))));
    }

    #[test]
    fn add_action_renders_lowercase() {
        assert_eq!(
            serde_json::to_value(AddAction::Inserted).ok(),
            Some(serde_json::json!("inserted"))
        );
        assert_eq!(
            serde_json::to_value(AddAction::Updated).ok(),
            Some(serde_json::json!("updated"))
        );
    }
}
