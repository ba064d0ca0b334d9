use std::fmt;
use std::sync::Arc;

use crate::context::Context;

/// Outcome of a middleware or handler invocation.
pub type HandlerResult = anyhow::Result<()>;

/// The downstream continuation handed to each middleware unit.
pub type Next<'a> = &'a dyn Fn(&mut Context) -> HandlerResult;

/// A single unit in a handler chain.
///
/// A unit may invoke `next` zero or more times (normally exactly once), or
/// return an error without invoking it, which aborts the remainder of the
/// chain and propagates the error to the caller unchanged.
pub trait Middleware: Send + Sync {
    fn handle(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult;
}

impl<F> Middleware for F
where
    F: Fn(&mut Context, Next<'_>) -> HandlerResult + Send + Sync,
{
    fn handle(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult {
        self(ctx, next)
    }
}

/// Wrap a closure as a shareable middleware unit.
pub fn from_fn<F>(f: F) -> Arc<dyn Middleware>
where
    F: Fn(&mut Context, Next<'_>) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An ordered sequence of middleware composed into one callable.
///
/// Composition is continuation-passing: each unit receives the rest of the
/// chain as its `next` argument. The chain is immutable once composed and
/// walking is by index into a shared slice, so cloning one is a
/// reference-count bump.
#[derive(Clone)]
pub struct HandlerChain {
    units: Arc<[Arc<dyn Middleware>]>,
}

impl HandlerChain {
    /// Compose global middleware followed by a route's own handlers, both in
    /// registration order.
    #[must_use]
    pub fn compose(global: &[Arc<dyn Middleware>], handlers: Vec<Arc<dyn Middleware>>) -> Self {
        let mut units = Vec::with_capacity(global.len() + handlers.len());
        units.extend(global.iter().map(Arc::clone));
        units.extend(handlers);
        Self {
            units: units.into(),
        }
    }

    /// Invoke the chain against `ctx`.
    ///
    /// The continuation past the final unit succeeds unconditionally, so a
    /// route registered with no handlers of its own still runs the global
    /// middleware and then completes.
    pub fn call(&self, ctx: &mut Context) -> HandlerResult {
        self.call_from(0, ctx)
    }

    fn call_from(&self, index: usize, ctx: &mut Context) -> HandlerResult {
        match self.units.get(index) {
            Some(unit) => unit.handle(ctx, &|ctx| self.call_from(index + 1, ctx)),
            None => Ok(()),
        }
    }

    /// Number of units in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("units", &self.units.len())
            .finish()
    }
}
