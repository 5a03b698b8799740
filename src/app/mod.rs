//! Bundled application: the controllers the server binary serves.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Services (database, views)
//!     → prepare() (schema)
//!     → controllers() (factories capture cloned services)
//!
//! Per request:
//!     Router::dispatch → Home | Notes → Reply
//! ```

pub mod home;
pub mod notes;

use crate::controller::{ControllerRegistry, RequestContext};
use crate::db::DatabaseError;
use crate::lifecycle::Services;

pub use home::Home;
pub use notes::{Note, NoteStore, Notes};

/// Registry with every bundled controller the services allow.
///
/// `Notes` needs a database and is left out without one.
pub fn controllers(services: &Services) -> ControllerRegistry {
    let mut registry = ControllerRegistry::new();

    let views = services.views.clone();
    registry.register("home", move |context: &RequestContext| {
        Home::new(views.clone(), context.params.clone())
    });

    if let Some(database) = services.database.clone() {
        registry.register("notes", move |context: &RequestContext| {
            Notes::new(NoteStore::new(database.clone()), context)
        });
    }

    registry
}

/// Create the tables the bundled controllers use.
pub async fn prepare(services: &Services) -> Result<(), DatabaseError> {
    if let Some(database) = &services.database {
        NoteStore::new(database.clone()).migrate().await?;
    }
    Ok(())
}
