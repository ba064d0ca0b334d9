//! # radixmux
//!
//! A compressed-prefix-tree (radix trie) HTTP request router with
//! continuation-passing middleware chains.
//!
//! radixmux is a library component, not a server: it is embedded inside a
//! surrounding HTTP framework that supplies the request [`Context`] and the
//! final fallback behavior. Given a request's method and path it resolves,
//! in time proportional to the path length, the chain of handlers to run,
//! sharing common path prefixes across routes to keep memory and lookup
//! cost low.
//!
//! ## Architecture
//!
//! - **[`router`]**: the radix tree, route registration, and the
//!   serving-phase matcher
//! - **[`middleware`]**: the continuation-passing [`Middleware`] trait,
//!   chain composition, and the built-in metrics/tracing middleware
//! - **[`context`]**: the request/response state threaded through chains
//!
//! ## Quick start
//!
//! ```
//! use radixmux::{middleware, Context, Middleware, Response, Router};
//!
//! let mut router = Router::new("");
//!
//! // Global middleware runs ahead of every route chain registered after it.
//! router.add_middleware(middleware::from_fn(|ctx, next| next(ctx)));
//!
//! router.get(
//!     "/pets",
//!     vec![middleware::from_fn(|ctx, next| {
//!         ctx.reply(Response::json(200, serde_json::json!({ "pets": [] })));
//!         next(ctx)
//!     })],
//! );
//!
//! // Finishing the build phase yields an immutable, shareable service.
//! let service = router.into_service();
//!
//! let mut ctx = Context::new(http::Method::GET, "/pets");
//! service.handle(&mut ctx, &|_ctx| Ok(()))?;
//! assert_eq!(ctx.response.map(|r| r.status), Some(200));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Phases and concurrency
//!
//! Registration is a single-threaded build phase; `Router::into_service`
//! consumes the router, so no route can be added once serving has begun.
//! The resulting [`RouterService`] performs no mutation and no locking:
//! clone it freely and look up from as many threads as the host runs.
//!
//! ## What it deliberately does not do
//!
//! No pattern, parameter, or wildcard segments: paths match literally,
//! byte for byte. A lookup miss is not an error: the service defers to the
//! host framework's own continuation, which owns the 404 (or any other
//! fallback) behavior. Handler errors propagate to the host untouched.

pub mod context;
pub mod middleware;
pub mod router;

pub use context::{Context, HeaderVec, Response};
pub use middleware::{HandlerChain, HandlerResult, Middleware, Next};
pub use router::{Method, Router, RouterService, UnsupportedMethod};
