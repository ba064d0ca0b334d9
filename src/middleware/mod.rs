mod core;
mod metrics;
mod tracing;

pub use core::{from_fn, HandlerChain, HandlerResult, Middleware, Next};
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
