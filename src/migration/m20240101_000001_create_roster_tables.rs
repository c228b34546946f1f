use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teacher::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Teacher::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Teacher::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Teacher::DisplayName).string_len(200).not_null())
                    .col(ColumnDef::new(Teacher::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(Teacher::Salt).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Teacher::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Student::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Student::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Student::Subject).string_len(100).not_null())
                    .col(ColumnDef::new(Student::Marks).integer().not_null())
                    .col(
                        ColumnDef::new(Student::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_name_subject")
                    .table(Student::Table)
                    .col(Student::Name)
                    .col(Student::Subject)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SessionToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionToken::Token)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SessionToken::TeacherId).integer().not_null())
                    .col(
                        ColumnDef::new(SessionToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SessionToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_token_teacher")
                            .from(SessionToken::Table, SessionToken::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLog::TeacherId).integer().null())
                    .col(ColumnDef::new(AuditLog::StudentId).integer().null())
                    .col(ColumnDef::new(AuditLog::Action).string_len(10).not_null())
                    .col(ColumnDef::new(AuditLog::Field).string_len(100).null())
                    .col(ColumnDef::new(AuditLog::OldValue).text().null())
                    .col(ColumnDef::new(AuditLog::NewValue).text().null())
                    .col(
                        ColumnDef::new(AuditLog::Timestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_log_teacher")
                            .from(AuditLog::Table, AuditLog::TeacherId)
                            .to(Teacher::Table, Teacher::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_log_student")
                            .from(AuditLog::Table, AuditLog::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SessionToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teacher::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Teacher {
    Table,
    Id,
    Username,
    DisplayName,
    PasswordHash,
    Salt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    Name,
    Subject,
    Marks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SessionToken {
    Table,
    Token,
    TeacherId,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    Id,
    TeacherId,
    StudentId,
    Action,
    Field,
    OldValue,
    NewValue,
    Timestamp,
}
