//! Radix tree storage for route registration and matching.
//!
//! Routes are stored in a compressed prefix tree: each edge carries a
//! multi-byte string rather than a single byte, so paths with common
//! prefixes (e.g. `/api/v1/`) share nodes and lookup cost is proportional
//! to the path length, not the number of registered routes.
//!
//! Two operations work on the tree:
//!
//! - **insert** registers a (method, path, chain) triple, splitting an
//!   existing node whenever the new path only partially overlaps its edge
//!   prefix.
//! - **find** walks the tree consuming path bytes and returns the matched
//!   node's chain for the requested method, or nothing.
//!
//! Both are iterative, top-down, and never backtrack: among the children of
//! any node every first byte is distinct, so there is at most one candidate
//! edge per step.

use std::fmt;

use crate::middleware::HandlerChain;

/// The closed set of HTTP methods the router dispatches on.
///
/// Kept as an enumeration rather than matching on method strings so the
/// per-node handler table is a fixed-size array and an unsupported method
/// cannot be represented past the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(crate) const COUNT: usize = 4;

    /// All supported methods, in table order.
    pub const ALL: [Method; Method::COUNT] =
        [Method::Get, Method::Post, Method::Put, Method::Delete];

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Error returned when converting an HTTP method outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedMethod;

impl fmt::Display for UnsupportedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unsupported HTTP method")
    }
}

impl std::error::Error for UnsupportedMethod {}

impl TryFrom<&http::Method> for Method {
    type Error = UnsupportedMethod;

    fn try_from(method: &http::Method) -> Result<Self, Self::Error> {
        match method.as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(UnsupportedMethod),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> http::Method {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

/// Per-node handler storage, one slot per supported method.
#[derive(Clone, Default)]
pub(crate) struct MethodTable([Option<HandlerChain>; Method::COUNT]);

impl MethodTable {
    pub(super) fn get(&self, method: Method) -> Option<&HandlerChain> {
        self.0[method.index()].as_ref()
    }

    /// Registering a method that already has a chain replaces it.
    pub(super) fn set(&mut self, method: Method, chain: HandlerChain) {
        self.0[method.index()] = Some(chain);
    }

    pub(super) fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (Method, &HandlerChain)> {
        Method::ALL
            .iter()
            .filter_map(|&m| self.0[m.index()].as_ref().map(|chain| (m, chain)))
    }
}

/// A node in the compressed prefix tree.
///
/// `prefix` is the byte string consumed when descending into this node from
/// its parent; it is non-empty everywhere except possibly at the root.
/// Children are owned directly and keyed by `label`, the first byte of their
/// prefix, which is unique among siblings. Concatenating `prefix` values
/// from the root down to any node yields exactly the registered path.
///
/// Prefixes are raw bytes, not `String`: a split may land inside a UTF-8
/// sequence. Only full root-to-node concatenations are surfaced as text.
#[derive(Clone, Default)]
pub(crate) struct RouteNode {
    pub(super) prefix: Vec<u8>,
    pub(super) label: u8,
    pub(super) children: Vec<RouteNode>,
    pub(super) handlers: MethodTable,
}

/// Length of the longest common prefix of `a` and `b`.
fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

impl RouteNode {
    /// Register `chain` for `method` at `path`, growing or splitting the
    /// tree as needed. Never fails; re-registering an existing method+path
    /// replaces that method's chain without structural changes.
    pub(super) fn insert(&mut self, method: Method, path: &str, chain: HandlerChain) {
        let mut node = self;
        let mut path = path.as_bytes();
        loop {
            let common = common_prefix_len(&node.prefix, path);

            if common < node.prefix.len() {
                // Partial overlap: the edge must be split before anything
                // can hang below it.
                node.split_at(common);
                if common == path.len() {
                    node.handlers.set(method, chain);
                } else {
                    node.children
                        .push(RouteNode::leaf(&path[common..], method, chain));
                }
                return;
            }

            if common == path.len() {
                // Edge and path both exhausted: this is the node.
                node.handlers.set(method, chain);
                return;
            }

            // Edge fully consumed, path remains.
            path = &path[common..];

            if node.prefix.is_empty() && node.children.is_empty() && node.handlers.is_empty() {
                // Untouched root: take the whole path as its edge.
                node.prefix = path.to_vec();
                node.label = path[0];
                node.handlers.set(method, chain);
                return;
            }

            match node.children.iter().position(|c| c.label == path[0]) {
                Some(i) => node = &mut node.children[i],
                None => {
                    node.children.push(RouteNode::leaf(path, method, chain));
                    return;
                }
            }
        }
    }

    /// Split this node's edge at byte offset `at`: the suffix moves into a
    /// new child which inherits the node's children and handler table, and
    /// the node keeps only the common prefix.
    fn split_at(&mut self, at: usize) {
        debug_assert!(at < self.prefix.len());
        let suffix = self.prefix.split_off(at);
        let child = RouteNode {
            label: suffix[0],
            prefix: suffix,
            children: std::mem::take(&mut self.children),
            handlers: std::mem::take(&mut self.handlers),
        };
        self.children.push(child);
        if at == 0 {
            // Only the root can diverge at byte zero; it degrades to an
            // empty-prefix branch node.
            self.label = 0;
        }
    }

    fn leaf(path: &[u8], method: Method, chain: HandlerChain) -> Self {
        let mut handlers = MethodTable::default();
        handlers.set(method, chain);
        RouteNode {
            label: path[0],
            prefix: path.to_vec(),
            children: Vec::new(),
            handlers,
        }
    }

    /// Look up the chain registered for `method` at `path`.
    ///
    /// Read-only and lock-free; safe for any number of concurrent callers.
    /// Returns `None` both when no node matches and when the matched node
    /// has no chain for this method.
    pub(super) fn find(&self, method: Method, path: &str) -> Option<&HandlerChain> {
        let mut node = self;
        let mut path = path.as_bytes();
        loop {
            let matched = common_prefix_len(&node.prefix, path);
            path = &path[matched..];
            if path.is_empty() {
                return node.handlers.get(method);
            }
            node = node.children.iter().find(|c| c.label == path[0])?;
        }
    }

    /// Depth-first enumeration of registered (method, full path) pairs.
    pub(super) fn collect_routes(&self, parent: &[u8], out: &mut Vec<(Method, String)>) {
        let mut full = parent.to_vec();
        full.extend_from_slice(&self.prefix);
        for (method, _) in self.handlers.iter() {
            out.push((method, String::from_utf8_lossy(&full).into_owned()));
        }
        for child in &self.children {
            child.collect_routes(&full, out);
        }
    }
}
