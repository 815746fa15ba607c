use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfig(String),

    #[error("Failed to talk to the database: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),
}
