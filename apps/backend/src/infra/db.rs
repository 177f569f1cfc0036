use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Open a pooled Postgres connection. Does not touch the schema.
pub async fn connect_db(url: &str, timeout: Duration) -> Result<DatabaseConnection, DomainError> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(num_cpus::get() as u32 * 2)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    Database::connect(options).await.map_err(map_db_err)
}

/// Create the tables this service owns when they are missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DomainError> {
    let backend = db.get_database_backend();
    let mut create_users = Schema::new(backend).create_table_from_entity(users::Entity);
    create_users.if_not_exists();

    db.execute(backend.build(&create_users))
        .await
        .map_err(map_db_err)?;
    info!(table = "users", "schema ready");
    Ok(())
}

/// Single entrypoint: connect, then make sure the schema exists.
pub async fn bootstrap_db(url: &str, timeout: Duration) -> Result<DatabaseConnection, DomainError> {
    let db = connect_db(url, timeout).await?;
    ensure_schema(&db).await?;
    Ok(db)
}
