//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection, header
//! inspection. A middleware receives the request and a [`Next`] handle to the
//! rest of the pipeline; it may answer on its own or call `next.run(req)`.
//!
//! ```rust
//! use verso::{Api, Request};
//! use verso::middleware::Next;
//!
//! let mut api = Api::new();
//! api.use_middleware("powered-by", |req: Request, next: Next| async move {
//!     let mut res = next.run(req).await;
//!     res.set_header("x-powered-by", "verso");
//!     res
//! });
//! ```
//!
//! The authentication and format stages every route gets are middlewares too;
//! they live in [`auth`] and [`format`].

pub mod auth;
pub mod format;
mod trace;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::handler::BoxFuture;
use crate::pipeline::Chain;
use crate::request::Request;
use crate::response::Response;

pub use trace::Trace;

/// A processing stage wrapped around a route's handler.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self)(req, next))
    }
}

/// The remainder of a pipeline, handed to each middleware.
pub struct Next {
    pub(crate) chain: Arc<Chain>,
    pub(crate) index: usize,
}

impl Next {
    /// Runs the remaining stages and the handler.
    pub fn run(self, req: Request) -> BoxFuture {
        let Some(stage) = self.chain.stages.get(self.index) else {
            return self.chain.endpoint(req);
        };
        let middleware = Arc::clone(&stage.middleware);
        middleware.call(req, Next { chain: self.chain, index: self.index + 1 })
    }
}

/// A middleware as declared with [`Api::use_middleware`](crate::Api::use_middleware).
///
/// The identifier names the middleware together with its construction
/// arguments; two descriptors with the same identifier are the same
/// middleware, and the first one declared is the one that runs.
#[derive(Clone)]
pub struct MiddlewareDescriptor {
    id: String,
    pub(crate) middleware: Arc<dyn Middleware>,
}

impl MiddlewareDescriptor {
    pub fn new(id: impl Into<String>, middleware: impl Middleware) -> Self {
        Self { id: id.into(), middleware: Arc::new(middleware) }
    }

    pub fn id(&self) -> &str { &self.id }
}

impl PartialEq for MiddlewareDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for MiddlewareDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MiddlewareDescriptor").field(&self.id).finish()
    }
}
