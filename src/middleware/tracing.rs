use tracing::{field, info_span};

use super::{HandlerResult, Middleware, Next};
use crate::context::Context;

/// Opens an `info_span` around the downstream continuation so everything a
/// handler logs is attributed to its request. Records the response status
/// once the chain has run, if one was produced.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn handle(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult {
        let span = info_span!(
            "request",
            method = %ctx.method,
            path = %ctx.path,
            status = field::Empty,
        );
        let _guard = span.enter();
        let result = next(ctx);
        if let Some(response) = ctx.response.as_ref() {
            span.record("status", u64::from(response.status));
        }
        result
    }
}
