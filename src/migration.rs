pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_roster_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Keep our bookkeeping apart from any other migrator sharing the database
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("student_roster_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_roster_tables::Migration)]
    }
}
