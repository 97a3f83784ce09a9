pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

mod m20250830_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250830_000001_init::Migration)]
    }
}

/// Bring the schema up to date. Called from each service's bootstrap path
/// and from test setup.
pub async fn migrate_up(db: &DatabaseConnection) -> Result<(), DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    tracing::info!("▶ running migrations: {pending} pending");

    match Migrator::up(db, None).await {
        Ok(()) => {
            tracing::info!("✅ migrations up to date");
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ migration failed: {e}");
            Err(e)
        }
    }
}
