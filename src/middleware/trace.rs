//! Request tracing.

use std::time::Instant;

use tracing::{info, info_span, Instrument};

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;

/// Per-request span with method and path; logs status and latency.
///
/// ```rust
/// use verso::{Api, middleware::Trace};
///
/// let mut api = Api::new();
/// api.use_middleware("trace", Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let span = info_span!("request", method = %req.method(), path = %req.path());
        Box::pin(
            async move {
                let started = Instant::now();
                let res = next.run(req).await;
                info!(
                    status = res.status_code().as_u16(),
                    latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
                    "request completed"
                );
                res
            }
            .instrument(span),
        )
    }
}
