//! Route registration and matching.
//!
//! The router has two phases. During the **build phase** a [`Router`] is
//! populated: global middleware, then routes per HTTP method, each route
//! composed into a single handler chain at registration time. During the
//! **serving phase** the immutable [`RouterService`] produced by
//! [`Router::into_service`] matches incoming (method, path) pairs against a
//! compressed prefix tree and invokes the composed chain.
//!
//! Matching is byte-wise over the stored edge prefixes: lookup cost grows
//! with the path length, not the number of registered routes, and common
//! prefixes are stored once. There is no pattern or parameter matching;
//! paths are matched literally.

mod core;
mod radix;

pub use core::{Router, RouterService};
pub use radix::{Method, UnsupportedMethod};
