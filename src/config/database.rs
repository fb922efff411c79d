use migration::{BlogMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connect to the configured database
///
/// Does NOT run migrations - call `migrate_database` separately.
pub async fn connect_database(settings: &BootstrapSettings) -> Result<DatabaseConnection, InternalError> {
    let database_url = settings.database_url();

    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Apply every pending migration
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    BlogMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}

/// Connect and migrate in one step
pub async fn init_database(settings: &BootstrapSettings) -> Result<DatabaseConnection, InternalError> {
    let db = connect_database(settings).await?;
    migrate_database(&db).await?;
    Ok(db)
}
