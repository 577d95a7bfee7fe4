use backend::error::AppError;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;
use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database};

/// Build an AppState over a fresh in-memory SQLite database with the schema
/// migrated.
///
/// Capped at a single connection: every in-memory SQLite connection is its
/// own database, so a pool of them would not see the migrated schema.
pub async fn build_test_state(security: SecurityConfig) -> Result<AppState, AppError> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .map_err(|e| AppError::db(format!("Failed to open test database: {e}")))?;

    migrate(&db, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::db(format!("Test migration failed: {e}")))?;

    Ok(AppState::new(db, security))
}
