//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     add(path spec, controller ref, action ref, verb)
//!     → matcher.rs (compile spec: raw /regex/ or templated [name] path)
//!     → target.rs (parse literal / $capture references)
//!     → router.rs (append entry or merge verb into existing entry)
//!
//! Incoming Request (url, verb)
//!     → router.rs (scan entries in registration order)
//!     → matcher.rs (regex match, collect captures)
//!     → target.rs (resolve controller/action back-references)
//!     → Return: MatchResult or no-match
//!     → dispatch: clean args → controller resolver → action
//! ```
//!
//! # Design Decisions
//! - Routes compiled at registration, immutable while serving
//! - Deterministic: first registered match wins
//! - Matching is case-insensitive
//! - `before`/`after` are never valid action names

pub mod error;
pub mod matcher;
pub mod router;
pub mod target;

pub use error::RouterError;
pub use matcher::{Args, PatternKind, RoutePattern};
pub use router::{clean_arguments, parse_verb, MatchResult, RouteInfo, Router, RESERVED_ACTIONS};
pub use target::{CaptureKey, Reference, Target};
