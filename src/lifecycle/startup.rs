//! Startup orchestration.
//!
//! # Responsibilities
//! - Open shared services (database pool, view directory) from config
//! - Close them again on shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Services initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use thiserror::Error;

use crate::config::AppConfig;
use crate::db::{Database, DatabaseError};
use crate::view::Views;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(#[from] DatabaseError),
}

/// Services handed to controller factories.
#[derive(Debug, Clone)]
pub struct Services {
    pub database: Option<Database>,
    pub views: Views,
}

impl Services {
    /// Open every configured service.
    pub async fn start(config: &AppConfig) -> Result<Self, StartupError> {
        let database = match &config.database {
            Some(db) => {
                let database = Database::connect(db).await?;
                database.ping().await?;
                Some(database)
            }
            None => {
                tracing::info!("No database configured");
                None
            }
        };

        let views = Views::from_config(&config.views);
        if !views.root().is_dir() {
            tracing::warn!(dir = %views.root().display(), "View directory does not exist");
        }

        Ok(Self { database, views })
    }

    /// Release services in reverse order of startup.
    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
    }
}
