//! Landing pages.

use futures_util::future::BoxFuture;

use crate::controller::{ActionResult, ActionTable, Controller, ControllerError, Reply};
use crate::http::params::RequestParams;
use crate::routing::Args;
use crate::view::{ViewVars, Views};

pub struct Home {
    views: Views,
    params: RequestParams,
    vars: ViewVars,
}

impl Home {
    pub fn new(views: Views, params: RequestParams) -> Self {
        Self {
            views,
            params,
            vars: ViewVars::new(),
        }
    }

    fn index_do(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let html = self.views.render("home", &self.vars).await?;
            Ok(Reply::Html(html))
        })
    }

    fn about(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move { Ok(Reply::Text(format!("mvc-router {}", env!("CARGO_PKG_VERSION")))) })
    }

    fn greet_do(&mut self, args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let name = args
                .get("name")
                .ok_or_else(|| ControllerError::BadRequest("name is required".into()))?;
            Ok(Reply::Text(format!("Hello, {}!", name)))
        })
    }
}

impl Controller for Home {
    fn actions() -> ActionTable<Self> {
        ActionTable::<Self>::new()
            .with("index_do", Home::index_do)
            .with("about", Home::about)
            .with("greet_do", Home::greet_do)
    }

    /// Seeds view variables; a `name` query parameter fills in for a
    /// missing path argument.
    fn before(&mut self, args: &mut Args) -> Result<(), ControllerError> {
        if !args.contains_key("name") {
            if let Some(name) = self.params.get("name") {
                args.insert("name".into(), name.to_string());
            }
        }

        let name = args.get("name").cloned().unwrap_or_else(|| "stranger".into());
        self.vars.insert("title".into(), "Home".into());
        self.vars.insert("name".into(), name);
        Ok(())
    }
}
