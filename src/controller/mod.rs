//! Controller subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ControllerRegistry::register(name, factory)
//!     → action.rs (Controller::actions() built once, shared via Arc)
//!
//! Per request (from Router::dispatch):
//!     registry.rs (resolve capitalized name → fresh controller)
//!     → action.rs (look up <action>_do, else <action>)
//!     → before → <action>_do → after   |   <action>
//!     → reply.rs (Reply handed to the HTTP layer)
//! ```

pub mod action;
pub mod error;
pub mod registry;
pub mod reply;

pub use action::{ActionFn, ActionResult, ActionTable, Controller, EntryKind, Handler, HOOKED_SUFFIX};
pub use error::ControllerError;
pub use registry::{ControllerRegistry, ControllerResolver, RequestContext};
pub use reply::Reply;
