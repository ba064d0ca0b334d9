use std::sync::Arc;

use tracing::{debug, info};

use crate::context::Context;
use crate::middleware::{HandlerChain, HandlerResult, Middleware, Next};

use super::radix::{Method, RouteNode};

/// Route registration surface.
///
/// A `Router` is populated sequentially during a build phase: global
/// middleware via [`add_middleware`](Router::add_middleware), routes via
/// [`get`](Router::get) / [`post`](Router::post) / [`put`](Router::put) /
/// [`delete`](Router::delete). [`into_service`](Router::into_service)
/// consumes the router and yields the immutable [`RouterService`] used
/// during the serving phase, so no route can be registered once serving has
/// begun.
pub struct Router {
    base_path: String,
    middleware: Vec<Arc<dyn Middleware>>,
    root: RouteNode,
}

impl Router {
    /// Create an empty router.
    ///
    /// `base_path` is carried as metadata only; it is never consulted during
    /// matching or chain composition.
    #[must_use]
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            middleware: Vec::new(),
            root: RouteNode::default(),
        }
    }

    /// The base path given at construction.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Append a middleware to the global list.
    ///
    /// A route's chain snapshots the global list at registration time, so
    /// middleware added here applies only to routes registered afterwards.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middleware.push(middleware);
    }

    /// Register a GET route.
    ///
    /// `handlers` run after the global middleware, in the given order. An
    /// empty list is allowed: the route then consists of the global
    /// middleware alone.
    pub fn get(&mut self, path: &str, handlers: Vec<Arc<dyn Middleware>>) {
        self.register(Method::Get, path, handlers);
    }

    /// Register a POST route.
    pub fn post(&mut self, path: &str, handlers: Vec<Arc<dyn Middleware>>) {
        self.register(Method::Post, path, handlers);
    }

    /// Register a PUT route.
    pub fn put(&mut self, path: &str, handlers: Vec<Arc<dyn Middleware>>) {
        self.register(Method::Put, path, handlers);
    }

    /// Register a DELETE route.
    pub fn delete(&mut self, path: &str, handlers: Vec<Arc<dyn Middleware>>) {
        self.register(Method::Delete, path, handlers);
    }

    fn register(&mut self, method: Method, path: &str, handlers: Vec<Arc<dyn Middleware>>) {
        let chain = HandlerChain::compose(&self.middleware, handlers);
        debug!(method = %method, path = %path, units = chain.len(), "route registered");
        self.root.insert(method, path, chain);
    }

    /// Finish the build phase and produce the serving-phase matcher.
    #[must_use]
    pub fn into_service(self) -> RouterService {
        let service = RouterService {
            base_path: self.base_path,
            root: self.root,
        };
        info!(
            routes_count = service.routes().len(),
            base_path = %service.base_path,
            "routing table built"
        );
        service
    }
}

/// The serving-phase router: immutable, `Send + Sync`, and cheap to clone
/// (handler chains are shared by reference count).
///
/// Implements [`Middleware`] so it installs directly into a host framework's
/// chain: on a match the composed route chain runs, then the host
/// continuation (unless the chain short-circuited with an error); on a miss
/// the host continuation runs alone. A miss is never an error.
#[derive(Clone)]
pub struct RouterService {
    base_path: String,
    root: RouteNode,
}

impl RouterService {
    /// The base path given at construction. Metadata only.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Look up the handler chain registered for `method` + `path`.
    #[must_use]
    pub fn find(&self, method: Method, path: &str) -> Option<&HandlerChain> {
        self.root.find(method, path)
    }

    /// All registered routes as (method, full path) pairs, sorted by path
    /// then method for stable output.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut routes = Vec::new();
        self.root.collect_routes(b"", &mut routes);
        routes.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
        routes
    }

    /// Print all registered routes to stdout.
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        println!(
            "[routes] base_path={} count={}",
            self.base_path,
            routes.len()
        );
        for (method, path) in routes {
            println!("[route] {method} {path}");
        }
    }
}

impl Middleware for RouterService {
    /// Route one request: run the matched chain, then fall through to the
    /// host continuation for whatever the chain did not short-circuit.
    fn handle(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult {
        let Ok(method) = Method::try_from(&ctx.method) else {
            debug!(method = %ctx.method, path = %ctx.path, "unsupported method, passing through");
            return next(ctx);
        };
        match self.root.find(method, &ctx.path) {
            Some(chain) => {
                debug!(method = %method, path = %ctx.path, "route matched");
                chain.call(ctx)?;
                next(ctx)
            }
            None => {
                debug!(method = %method, path = %ctx.path, "no route matched, passing through");
                next(ctx)
            }
        }
    }
}
