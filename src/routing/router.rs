//! Route table, lookup and dispatch.
//!
//! # Responsibilities
//! - Register patterns with per-verb controller/action targets
//! - Look up the first route matching a URL and verb
//! - Resolve back-references and extract arguments
//! - Hand the cleaned arguments to the resolved controller
//!
//! # Design Decisions
//! - Registration order is precedence; no best-match search
//! - A miss in `match_and_parse` is `Ok(None)`, not an error
//! - The table is built before serving and only read afterwards; reloads
//!   replace the whole router

use axum::http::Method;
use serde::Serialize;

use crate::config::RouteConfig;
use crate::controller::{ControllerResolver, Reply, RequestContext};
use crate::routing::error::RouterError;
use crate::routing::matcher::{Args, RoutePattern};
use crate::routing::target::{Reference, Target};

/// Hook names that can never be dispatched to as actions.
pub const RESERVED_ACTIONS: [&str; 2] = ["before", "after"];

fn is_reserved(action: &str) -> bool {
    RESERVED_ACTIONS.contains(&action)
}

/// One pattern with its verb → target mapping.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pattern: RoutePattern,
    targets: Vec<(Method, Target)>,
}

impl RouteEntry {
    fn new(pattern: RoutePattern) -> Self {
        Self {
            pattern,
            targets: Vec::new(),
        }
    }

    /// Set the target for a verb, replacing any previous one for that verb.
    fn set(&mut self, verb: Method, target: Target) {
        match self.targets.iter_mut().find(|(m, _)| *m == verb) {
            Some(slot) => slot.1 = target,
            None => self.targets.push((verb, target)),
        }
    }

    pub fn target(&self, verb: &Method) -> Option<&Target> {
        self.targets.iter().find(|(m, _)| m == verb).map(|(_, t)| t)
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub controller: String,
    pub action: String,
    /// Every participating capture, positional slots included.
    pub args: Args,
}

/// A flattened view of one registered (pattern, verb) pair.
#[derive(Debug, Clone, Copy)]
pub struct RouteInfo<'a> {
    pub spec: &'a str,
    pub source: &'a str,
    pub verb: &'a Method,
    pub target: &'a Target,
}

/// The route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    entries: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a router from configured routes, in configuration order.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouterError> {
        let mut router = Self::new();
        for route in routes {
            let verb = parse_verb(&route.verb)?;
            router.add(&route.path, &route.controller, &route.action, verb)?;
        }
        Ok(router)
    }

    /// Register a route.
    ///
    /// `controller` and `action` may be `$` back-references into the
    /// pattern's captures. If the compiled pattern is already registered,
    /// only this verb's target is added or replaced.
    pub fn add(
        &mut self,
        path: &str,
        controller: &str,
        action: &str,
        verb: Method,
    ) -> Result<(), RouterError> {
        if is_reserved(action) {
            return Err(RouterError::ReservedAction {
                action: action.to_string(),
            });
        }

        let pattern = RoutePattern::compile(path)?;
        let target = Target::new(controller, action);
        target.check(&pattern)?;

        tracing::debug!(
            path = %path,
            pattern = %pattern.source(),
            verb = %verb,
            controller = %target.controller,
            action = %target.action,
            "Route registered"
        );

        let position = self
            .entries
            .iter()
            .position(|e| e.pattern.source() == pattern.source());
        let entry = match position {
            Some(index) => &mut self.entries[index],
            None => {
                self.entries.push(RouteEntry::new(pattern));
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        };
        entry.set(verb, target);

        Ok(())
    }

    pub fn get(&mut self, path: &str, controller: &str, action: &str) -> Result<(), RouterError> {
        self.add(path, controller, action, Method::GET)
    }

    pub fn post(&mut self, path: &str, controller: &str, action: &str) -> Result<(), RouterError> {
        self.add(path, controller, action, Method::POST)
    }

    pub fn put(&mut self, path: &str, controller: &str, action: &str) -> Result<(), RouterError> {
        self.add(path, controller, action, Method::PUT)
    }

    pub fn patch(&mut self, path: &str, controller: &str, action: &str) -> Result<(), RouterError> {
        self.add(path, controller, action, Method::PATCH)
    }

    pub fn delete(&mut self, path: &str, controller: &str, action: &str) -> Result<(), RouterError> {
        self.add(path, controller, action, Method::DELETE)
    }

    /// Find the first entry whose pattern matches `url` and which has a
    /// target for `verb`.
    ///
    /// Returns `Ok(None)` when nothing matches. Fails with
    /// `ReservedAction` when a back-reference resolves to a hook name.
    pub fn match_and_parse(
        &self,
        url: &str,
        verb: &Method,
    ) -> Result<Option<MatchResult>, RouterError> {
        for entry in &self.entries {
            let Some(target) = entry.target(verb) else {
                continue;
            };
            let Some(args) = entry.pattern.captures(url) else {
                continue;
            };

            let resolve = |reference: &Reference| {
                reference
                    .resolve(&args)
                    .ok_or_else(|| RouterError::UnresolvedCapture {
                        reference: reference.to_string(),
                        url: url.to_string(),
                    })
            };
            let controller = resolve(&target.controller)?;
            let action = resolve(&target.action)?;

            if is_reserved(&action) {
                return Err(RouterError::ReservedAction { action });
            }

            return Ok(Some(MatchResult {
                controller,
                action,
                args,
            }));
        }

        Ok(None)
    }

    /// Drop positional capture slots, keeping named ones.
    pub fn clean_arguments(args: &Args) -> Args {
        clean_arguments(args)
    }

    /// Match `url` and run the resolved controller action.
    ///
    /// The URL gains a leading `/` if it lacks one. The controller name is
    /// capitalized (`home` → `Home`) before being handed to `resolver`.
    pub async fn dispatch<R>(
        &self,
        url: &str,
        verb: &Method,
        resolver: &R,
        context: RequestContext,
    ) -> Result<Reply, RouterError>
    where
        R: ControllerResolver + ?Sized,
    {
        let url = normalize_url(url);
        let not_found = || RouterError::RouteNotFound {
            verb: verb.to_string(),
            url: url.clone(),
        };

        let matched = self.match_and_parse(&url, verb)?.ok_or_else(not_found)?;
        let class = capitalize(&matched.controller);

        let mut handler = resolver.resolve(&class, &context).ok_or_else(|| {
            tracing::debug!(controller = %class, "Controller not registered");
            not_found()
        })?;

        tracing::debug!(
            request_id = %context.request_id,
            controller = %class,
            action = %matched.action,
            "Dispatching"
        );

        let args = clean_arguments(&matched.args);
        handler.invoke(&matched.action, args).await
    }

    /// Every registered (pattern, verb) pair in registration order.
    pub fn routes(&self) -> impl Iterator<Item = RouteInfo<'_>> {
        self.entries.iter().flat_map(|entry| {
            entry.targets.iter().map(move |(verb, target)| RouteInfo {
                spec: entry.pattern.spec(),
                source: entry.pattern.source(),
                verb,
                target,
            })
        })
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keep only arguments whose key is not numeric.
pub fn clean_arguments(args: &Args) -> Args {
    args.iter()
        .filter(|(key, _)| !is_numeric(key))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Parse a configured verb, accepting any case.
pub fn parse_verb(verb: &str) -> Result<Method, RouterError> {
    Method::from_bytes(verb.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
        RouterError::InvalidVerb {
            verb: verb.to_string(),
        }
    })
}

/// Numeric in the loose sense: integers, decimals and exponents, with
/// surrounding whitespace.
fn is_numeric(key: &str) -> bool {
    let key = key.trim();
    key.bytes().any(|b| b.is_ascii_digit()) && key.parse::<f64>().is_ok()
}

fn normalize_url(url: &str) -> String {
    if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    }
}

/// Upper-case the first character.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> Args {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_literal_match_only() {
        let mut router = Router::new();
        router.get("/", "home", "index").unwrap();
        router.get("/contact", "home", "contact").unwrap();

        let m = router.match_and_parse("/CONTACT", &Method::GET).unwrap().unwrap();
        assert_eq!(m.controller, "home");
        assert_eq!(m.action, "contact");

        assert!(router.match_and_parse("/contact/", &Method::GET).unwrap().is_none());
        assert!(router.match_and_parse("/contacts", &Method::GET).unwrap().is_none());
        assert!(router.match_and_parse("/", &Method::GET).unwrap().is_some());
    }

    #[test]
    fn test_placeholder_args() {
        let mut router = Router::new();
        router.get("/about/addNew/[id]", "about", "addnew").unwrap();

        let m = router
            .match_and_parse("/about/addNew/12345hello", &Method::GET)
            .unwrap()
            .unwrap();
        assert_eq!(m.controller, "about");
        assert_eq!(m.action, "addnew");
        assert_eq!(clean_arguments(&m.args), args(&[("id", "12345hello")]));
        // Positional slots stay in the raw match.
        assert_eq!(m.args.get("1").map(String::as_str), Some("12345hello"));

        assert!(router.match_and_parse("/about/addnew/", &Method::GET).unwrap().is_none());
    }

    #[test]
    fn test_named_back_references() {
        let mut router = Router::new();
        router
            .get("/login/[controller]/[action]/[id]", "$controller", "$action")
            .unwrap();

        let m = router
            .match_and_parse("/login/index/addnew/123", &Method::GET)
            .unwrap()
            .unwrap();
        assert_eq!(m.controller, "index");
        assert_eq!(m.action, "addnew");
        assert_eq!(m.args.get("id").map(String::as_str), Some("123"));
    }

    #[test]
    fn test_positional_back_references() {
        let mut router = Router::new();
        router.get("/login/[controller]/[action]/[id]", "$1", "$2").unwrap();
        router.get(r"/^\/(\d{3})\/(\w+)$/", "api", "$2").unwrap();

        let m = router
            .match_and_parse("/login/index/addnew/123", &Method::GET)
            .unwrap()
            .unwrap();
        assert_eq!((m.controller.as_str(), m.action.as_str()), ("index", "addnew"));

        let m = router.match_and_parse("/123/delete", &Method::GET).unwrap().unwrap();
        assert_eq!((m.controller.as_str(), m.action.as_str()), ("api", "delete"));
        assert!(clean_arguments(&m.args).is_empty());
    }

    #[test]
    fn test_verbs_are_kept_apart() {
        let mut router = Router::new();
        router.get("/login", "login", "form").unwrap();
        router.post("/login", "login", "dologin").unwrap();
        assert_eq!(router.len(), 1);

        let get = router.match_and_parse("/login", &Method::GET).unwrap().unwrap();
        let post = router.match_and_parse("/login", &Method::POST).unwrap().unwrap();
        assert_eq!(get.action, "form");
        assert_eq!(post.action, "dologin");

        assert!(router.match_and_parse("/login", &Method::DELETE).unwrap().is_none());
    }

    #[test]
    fn test_same_verb_overwrites() {
        let mut router = Router::new();
        router.get("/login", "login", "form").unwrap();
        router.get("/login", "login", "form2").unwrap();

        let m = router.match_and_parse("/login", &Method::GET).unwrap().unwrap();
        assert_eq!(m.action, "form2");
        assert_eq!(router.routes().count(), 1);
    }

    #[test]
    fn test_verb_mismatch_falls_through_to_later_entry() {
        let mut router = Router::new();
        router.post("/items/[id]", "items", "update").unwrap();
        router.get("/items/[slug]", "items", "show").unwrap();

        let m = router.match_and_parse("/items/7", &Method::GET).unwrap().unwrap();
        assert_eq!(m.action, "show");
        assert_eq!(m.args.get("slug").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_first_registered_wins() {
        let mut router = Router::new();
        router.get("/posts/[id]", "posts", "show").unwrap();
        router.get("/posts/latest", "posts", "latest").unwrap();

        let m = router.match_and_parse("/posts/latest", &Method::GET).unwrap().unwrap();
        assert_eq!(m.action, "show");
    }

    #[test]
    fn test_reserved_action_rejected_without_mutation() {
        let mut router = Router::new();
        router.get("/", "home", "index").unwrap();

        for reserved in ["before", "after"] {
            let err = router.get("/hooks", "home", reserved).unwrap_err();
            assert!(matches!(err, RouterError::ReservedAction { .. }));
        }
        assert_eq!(router.len(), 1);
        assert!(router.match_and_parse("/hooks", &Method::GET).unwrap().is_none());
    }

    #[test]
    fn test_reserved_action_rechecked_after_resolution() {
        let mut router = Router::new();
        router.get("/run/[action]", "tasks", "$action").unwrap();

        let err = router.match_and_parse("/run/before", &Method::GET).unwrap_err();
        assert!(matches!(err, RouterError::ReservedAction { ref action } if action == "before"));

        assert!(router.match_and_parse("/run/backup", &Method::GET).unwrap().is_some());
    }

    #[test]
    fn test_unknown_capture_rejected() {
        let mut router = Router::new();
        let err = router.get("/users/[id]", "$controller", "show").unwrap_err();
        assert!(matches!(err, RouterError::UnknownCapture { .. }));
        assert!(router.is_empty());
    }

    #[test]
    fn test_unresolved_capture() {
        let mut router = Router::new();
        router.get(r"/^\/page(\/(\w+))?$/", "pages", "$2").unwrap();

        assert!(router.match_and_parse("/page/intro", &Method::GET).unwrap().is_some());
        let err = router.match_and_parse("/page", &Method::GET).unwrap_err();
        assert!(matches!(err, RouterError::UnresolvedCapture { .. }));
    }

    #[test]
    fn test_clean_arguments() {
        let raw = args(&[("0", "first"), ("1", "second"), ("prop", "third")]);
        assert_eq!(clean_arguments(&raw), args(&[("prop", "third")]));
        assert_eq!(Router::clean_arguments(&raw), args(&[("prop", "third")]));

        let loose = args(&[("1.5", "a"), ("1e3", "b"), (" 2 ", "c"), ("inf", "d"), ("x1", "e")]);
        assert_eq!(clean_arguments(&loose), args(&[("inf", "d"), ("x1", "e")]));
    }

    #[test]
    fn test_routes_listing() {
        let mut router = Router::new();
        router.get("/", "home", "index").unwrap();
        router.post("/login", "login", "dologin").unwrap();
        router.get("/login", "login", "form").unwrap();

        let rows: Vec<(String, String, String)> = router
            .routes()
            .map(|r| (r.spec.to_string(), r.verb.to_string(), r.target.action.to_string()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("/".into(), "GET".into(), "index".into()),
                ("/login".into(), "POST".into(), "dologin".into()),
                ("/login".into(), "GET".into(), "form".into()),
            ]
        );
    }

    #[test]
    fn test_from_config() {
        let routes = vec![
            RouteConfig {
                path: "/".into(),
                controller: "home".into(),
                action: "index".into(),
                verb: "get".into(),
            },
            RouteConfig {
                path: "/notes/[id]".into(),
                controller: "notes".into(),
                action: "remove".into(),
                verb: "DELETE".into(),
            },
        ];
        let router = Router::from_config(&routes).unwrap();
        assert!(router.match_and_parse("/", &Method::GET).unwrap().is_some());
        assert!(router.match_and_parse("/notes/3", &Method::DELETE).unwrap().is_some());

        let bad = vec![RouteConfig {
            path: "/".into(),
            controller: "home".into(),
            action: "index".into(),
            verb: "G ET".into(),
        }];
        assert!(matches!(Router::from_config(&bad), Err(RouterError::InvalidVerb { .. })));
    }

    struct About;

    impl About {
        fn show_do(&mut self, args: Args) -> futures_util::future::BoxFuture<'_, crate::controller::ActionResult> {
            Box::pin(async move { Reply::json(&args) })
        }
    }

    impl crate::controller::Controller for About {
        fn actions() -> crate::controller::ActionTable<Self> {
            crate::controller::ActionTable::<Self>::new().with("show_do", About::show_do)
        }
    }

    #[tokio::test]
    async fn test_dispatch() {
        let mut router = Router::new();
        router.get("/[controller]/[action]/[id]", "$controller", "$action").unwrap();

        let mut registry = crate::controller::ControllerRegistry::new();
        registry.register("about", |_: &RequestContext| About);

        let reply = router
            .dispatch("about/show/7", &Method::GET, &registry, RequestContext::default())
            .await
            .unwrap();
        assert_eq!(
            reply,
            Reply::Json(serde_json::json!({"action": "show", "controller": "about", "id": "7"}))
        );

        // The URL segment picks the action regardless of case.
        let reply = router
            .dispatch("/about/SHOW/7", &Method::GET, &registry, RequestContext::default())
            .await
            .unwrap();
        assert!(matches!(reply, Reply::Json(ref v) if v["action"] == "SHOW"));

        let err = router
            .dispatch("/missing/show/7", &Method::GET, &registry, RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { ref url, .. } if url == "/missing/show/7"));

        let err = router
            .dispatch("/about/show/7", &Method::POST, &registry, RequestContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { .. }));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(normalize_url("about"), "/about");
        assert_eq!(normalize_url("/about"), "/about");
        assert_eq!(normalize_url("/"), "/");
        assert_eq!(normalize_url(""), "/");
        assert_eq!(capitalize("home"), "Home");
        assert_eq!(capitalize("Home"), "Home");
        assert_eq!(capitalize(""), "");
    }
}
