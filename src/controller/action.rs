//! Controller capability and action tables.
//!
//! # Responsibilities
//! - Declare a controller's actions as an explicit name → entry point table
//! - Run `_do` entries between the `before` and `after` hooks
//! - Run plain entries directly, without hooks
//!
//! # Design Decisions
//! - The hooked `<action>_do` entry is looked up first; the plain entry is
//!   the fallback
//! - A failing `before` hook stops the action and skips `after`
//! - Names ending in `_do` never resolve directly
//! - Entry points are plain `fn` pointers so the table is built once per
//!   controller type and shared across requests

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::controller::{ControllerError, Reply};
use crate::routing::{Args, RouterError};

/// Suffix marking an action that runs between the hooks.
pub const HOOKED_SUFFIX: &str = "_do";

/// Result of running an action.
pub type ActionResult = Result<Reply, ControllerError>;

/// An action entry point.
///
/// Written as an ordinary method:
///
/// ```ignore
/// fn show_do(&mut self, args: Args) -> BoxFuture<'_, ActionResult> {
///     Box::pin(async move { Ok(Reply::Text(args["id"].clone())) })
/// }
/// ```
pub type ActionFn<C> = for<'a> fn(&'a mut C, Args) -> BoxFuture<'a, ActionResult>;

/// How an action name resolves against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// `<action>_do`, bracketed by `before`/`after`.
    Hooked,
    /// `<action>`, called directly.
    Plain,
}

/// Mapping from action name to entry point.
pub struct ActionTable<C> {
    entries: HashMap<String, ActionFn<C>>,
}

impl<C> ActionTable<C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add an entry. Name it `<action>_do` to have it run between the hooks.
    ///
    /// Names are case-insensitive; they are stored ASCII-lowercased.
    pub fn with(mut self, name: &str, entry: ActionFn<C>) -> Self {
        self.entries.insert(name.to_ascii_lowercase(), entry);
        self
    }

    /// Resolve an action name, ignoring ASCII case, preferring the hooked entry.
    ///
    /// Hooked entries are only reachable through their base name, so a
    /// request for `index_do` cannot sidestep the hooks.
    pub fn lookup(&self, action: &str) -> Option<(EntryKind, ActionFn<C>)> {
        let action = action.to_ascii_lowercase();
        if action.ends_with(HOOKED_SUFFIX) {
            return None;
        }
        let hooked = format!("{}{}", action, HOOKED_SUFFIX);
        if let Some(entry) = self.entries.get(&hooked) {
            return Some((EntryKind::Hooked, *entry));
        }
        self.entries.get(&action).map(|entry| (EntryKind::Plain, *entry))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for ActionTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

// fn pointers are Clone for any C; derive would demand C: Clone.
impl<C> Clone for ActionTable<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// An application controller.
///
/// One instance is built per request by the registry factory, so state
/// set in `before` is visible to the action and to `after`.
pub trait Controller: Send + Sized + 'static {
    /// The action table for this controller type.
    fn actions() -> ActionTable<Self>;

    /// Runs before every `_do` action. May rewrite the arguments.
    fn before(&mut self, _args: &mut Args) -> Result<(), ControllerError> {
        Ok(())
    }

    /// Runs after every `_do` action that succeeded.
    fn after(&mut self) -> Result<(), ControllerError> {
        Ok(())
    }
}

/// A controller instance ready to run one action; the type-erased form the
/// router dispatches to.
pub trait Handler: Send {
    /// Controller name, for errors and logs.
    fn name(&self) -> &str;

    /// How `action` would be run, if at all.
    fn entry(&self, action: &str) -> Option<EntryKind>;

    /// Run `action` with the given arguments.
    fn invoke<'a>(&'a mut self, action: &'a str, args: Args) -> BoxFuture<'a, Result<Reply, RouterError>>;
}

/// A controller bound to its shared action table.
pub struct Bound<C: Controller> {
    name: String,
    controller: C,
    actions: Arc<ActionTable<C>>,
}

impl<C: Controller> Bound<C> {
    pub fn new(name: impl Into<String>, controller: C, actions: Arc<ActionTable<C>>) -> Self {
        Self {
            name: name.into(),
            controller,
            actions,
        }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }
}

impl<C: Controller> Handler for Bound<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entry(&self, action: &str) -> Option<EntryKind> {
        self.actions.lookup(action).map(|(kind, _)| kind)
    }

    fn invoke<'a>(&'a mut self, action: &'a str, args: Args) -> BoxFuture<'a, Result<Reply, RouterError>> {
        Box::pin(async move {
            let Some((kind, entry)) = self.actions.lookup(action) else {
                return Err(RouterError::ActionNotFound {
                    controller: self.name.clone(),
                    action: action.to_string(),
                });
            };

            match kind {
                EntryKind::Hooked => {
                    let mut args = args;
                    self.controller.before(&mut args)?;
                    let reply = entry(&mut self.controller, args).await?;
                    self.controller.after()?;
                    Ok(reply)
                }
                EntryKind::Plain => Ok(entry(&mut self.controller, args).await?),
            }
        })
    }
}
