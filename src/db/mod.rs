//! Data access.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     DatabaseConfig → connection URL → AnyPool (opened once)
//!     → Database handle cloned into controller factories / models
//!
//! Shutdown:
//!     Database::close() drains and closes the pool
//! ```
//!
//! # Design Decisions
//! - No process-wide connection; whoever needs data access is handed a
//!   `Database`
//! - Handles are cheap clones sharing one pool
//! - Query building is left to the application (plain sqlx queries)

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Errors from the data access layer.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The configuration cannot produce a connection URL.
    #[error("incomplete database configuration: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// An open connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    dbms: String,
}

impl Database {
    /// Open a pool for the configured database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        sqlx::any::install_default_drivers();

        let url = connection_url(config)?;
        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await?;

        let dbms = url.split(':').next().unwrap_or_default().to_string();
        tracing::info!(
            dbms = %dbms,
            max_connections = config.max_connections,
            "Database pool opened"
        );

        Ok(Self { pool, dbms })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// URL scheme of the backing database (`sqlite`, `postgres`, ...).
    pub fn dbms(&self) -> &str {
        &self.dbms
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(dbms = %self.dbms, "Database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Base capability for data models: access to an injected database.
pub trait Model {
    fn database(&self) -> &Database;

    fn pool(&self) -> &AnyPool {
        self.database().pool()
    }
}

/// Build the connection URL: the explicit `url`, or one assembled from
/// `dbms`, `host`, `name`, `user` and `password`.
pub fn connection_url(config: &DatabaseConfig) -> Result<String, DatabaseError> {
    if let Some(url) = config.url.as_deref().filter(|u| !u.is_empty()) {
        return Ok(url.to_string());
    }

    if config.name.is_empty() {
        return Err(DatabaseError::Config("database name is empty".into()));
    }

    if config.dbms == "sqlite" {
        return Ok(format!("sqlite:{}", config.name));
    }

    if config.host.is_empty() {
        return Err(DatabaseError::Config(format!("host is required for {}", config.dbms)));
    }

    let credentials = match (config.user.is_empty(), config.password.is_empty()) {
        (true, _) => String::new(),
        (false, true) => format!("{}@", config.user),
        (false, false) => format!("{}:{}@", config.user, config.password),
    };

    Ok(format!(
        "{}://{}{}/{}",
        config.dbms, credentials, config.host, config.name
    ))
}
