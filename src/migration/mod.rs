use sea_orm::SqlxPostgresConnector;
use sea_orm_migration::prelude::*;

use crate::db::{DbError, PoolManager};

mod m20250101_000001_create_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_schema::Migration)]
    }
}

/// Applies every pending migration over the managed pool.
pub async fn run_migrations(db: &PoolManager) -> Result<(), DbError> {
    let conn = SqlxPostgresConnector::from_sqlx_postgres_pool(db.handle()?);
    Migrator::up(&conn, None).await?;
    tracing::info!("migrations applied");
    Ok(())
}

/// Rolls back every applied migration, dropping all tables and types.
pub async fn reset(db: &PoolManager) -> Result<(), DbError> {
    let conn = SqlxPostgresConnector::from_sqlx_postgres_pool(db.handle()?);
    Migrator::down(&conn, None).await?;
    tracing::warn!("all migrations rolled back");
    Ok(())
}
