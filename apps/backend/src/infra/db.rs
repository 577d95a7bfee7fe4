use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;
use crate::state::app_state::AppState;

/// Unified database connector that supports different profiles and owners.
/// This function does NOT run any migrations.
pub async fn connect_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile, owner)?;

    let conn = Database::connect(&database_url)
        .await
        .map_err(|e| AppError::db(format!("Failed to connect to database: {e}")))?;
    Ok(conn)
}

/// Connect and bring the schema up to date. Single entrypoint used by the
/// state builder.
pub async fn bootstrap_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile, owner).await?;
    migration::Migrator::up(&conn, None)
        .await
        .map_err(|e| AppError::db(format!("Migration failed: {e}")))?;
    Ok(conn)
}

/// Centralized helper to access the database connection from AppState.
///
/// This is the canonical way to access the database from application code.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state.db().ok_or_else(AppError::db_unavailable)
}
