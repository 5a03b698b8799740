//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use mvc_router::config::{AppConfig, RouteConfig};
use mvc_router::controller::{
    ActionResult, ActionTable, Controller, ControllerError, ControllerRegistry, Reply, RequestContext,
};
use mvc_router::http::HttpServer;
use mvc_router::lifecycle::Shutdown;
use mvc_router::routing::{Args, Router};

/// Hook and action calls, in order, shared across requests.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// A running server.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<AppConfig>,
    pub calls: CallLog,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

pub fn route(path: &str, controller: &str, action: &str, verb: &str) -> RouteConfig {
    RouteConfig {
        path: path.into(),
        controller: controller.into(),
        action: action.into(),
        verb: verb.into(),
    }
}

/// Controller that records what ran.
pub struct Recorder {
    calls: CallLog,
    title: Option<String>,
}

impl Recorder {
    fn record(&self, entry: &str) {
        self.calls.lock().unwrap().push(entry.to_string());
    }

    fn visit_do(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            self.record("visit_do");
            Ok(Reply::Text("visited".into()))
        })
    }

    fn plain(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            self.record("plain");
            Ok(Reply::Text("plain".into()))
        })
    }

    fn echo(&mut self, args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            self.record("echo");
            Reply::json(&args)
        })
    }

    fn submit_do(&mut self, args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            self.record("submit_do");
            let title = self.title.clone().unwrap_or_default();
            let id = args.get("id").cloned().unwrap_or_default();
            Ok(Reply::Text(format!("saved {} as {}", title, id)))
        })
    }
}

impl Controller for Recorder {
    fn actions() -> ActionTable<Self> {
        ActionTable::<Self>::new()
            .with("visit_do", Recorder::visit_do)
            .with("plain", Recorder::plain)
            .with("echo", Recorder::echo)
            .with("submit_do", Recorder::submit_do)
    }

    fn before(&mut self, args: &mut Args) -> Result<(), ControllerError> {
        self.record("before");
        if self.title.as_deref() == Some("forbidden") {
            return Err(ControllerError::Forbidden("not allowed".into()));
        }
        args.insert("seen".into(), "yes".into());
        Ok(())
    }

    fn after(&mut self) -> Result<(), ControllerError> {
        self.record("after");
        Ok(())
    }
}

/// Routes most tests share.
pub fn recorder_routes() -> Vec<RouteConfig> {
    vec![
        route("/", "recorder", "plain", "GET"),
        route("/items/[id]", "recorder", "echo", "GET"),
        route("/items/[id]", "recorder", "submit", "POST"),
        route(r"/^/raw/(\d+)$/", "recorder", "echo", "GET"),
        route("/[controller]/[action]", "$controller", "$action", "GET"),
    ]
}

/// Start a server on an ephemeral port serving the `Recorder` controller.
pub async fn start_server(routes: Vec<RouteConfig>) -> TestServer {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes = routes;

    let calls = CallLog::default();
    let mut controllers = ControllerRegistry::new();
    let log = calls.clone();
    controllers.register("recorder", move |context: &RequestContext| Recorder {
        calls: log.clone(),
        title: context.params.get("title").map(str::to_string),
    });

    let router = Router::from_config(&config.routes).unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config, router, controllers);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        config_updates,
        calls,
    }
}
