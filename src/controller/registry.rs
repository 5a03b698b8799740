//! Controller registry.
//!
//! # Responsibilities
//! - Map controller names to factories, built once at startup
//! - Build a fresh controller per request and bind it to its action table
//!
//! # Design Decisions
//! - Names are stored capitalized (`home` → `Home`), the form the router
//!   resolves with
//! - Services (database, views) are captured by the factory closures, not
//!   looked up globally

use std::collections::HashMap;
use std::sync::Arc;

use crate::controller::action::{Bound, Controller, Handler};
use crate::http::params::RequestParams;
use crate::routing::router::capitalize;

/// Per-request data handed to controller factories.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: String,
    pub params: RequestParams,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>, params: RequestParams) -> Self {
        Self {
            request_id: request_id.into(),
            params,
        }
    }
}

/// Looks up a controller by its capitalized name.
pub trait ControllerResolver: Send + Sync {
    /// Build a handler for `class`, or `None` if no such controller exists.
    fn resolve(&self, class: &str, context: &RequestContext) -> Option<Box<dyn Handler>>;
}

type Factory = Box<dyn Fn(&RequestContext) -> Box<dyn Handler> + Send + Sync>;

/// Static controller registry.
#[derive(Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Factory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller under `name`.
    ///
    /// The action table is built here, once; `factory` runs per request.
    pub fn register<C, F>(&mut self, name: &str, factory: F) -> &mut Self
    where
        C: Controller,
        F: Fn(&RequestContext) -> C + Send + Sync + 'static,
    {
        let class = capitalize(name);
        let actions = Arc::new(C::actions());

        tracing::debug!(
            controller = %class,
            actions = actions.len(),
            "Controller registered"
        );

        let label = class.clone();
        self.factories.insert(
            class,
            Box::new(move |context: &RequestContext| -> Box<dyn Handler> {
                Box::new(Bound::new(label.clone(), factory(context), actions.clone()))
            }),
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&capitalize(name))
    }

    /// Registered controller names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ControllerResolver for ControllerRegistry {
    fn resolve(&self, class: &str, context: &RequestContext) -> Option<Box<dyn Handler>> {
        self.factories.get(class).map(|factory| factory(context))
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("controllers", &self.names())
            .finish()
    }
}
