//! Per-route request pipelines.
//!
//! A pipeline is built once, when a route is declared, from the settings the
//! scope store resolves at that moment:
//!
//! ```text
//! authenticate (auth, override)      ─ omitted when absent or disabled
//!   → validate format (formats, override)
//!     → middlewares (merge, global first)
//!       → handler, with helpers (merge) attached
//! ```
//!
//! Each stage may answer on its own (401, 406, a middleware's early return),
//! in which case later stages never run.

use std::fmt;
use std::sync::Arc;

use crate::format::Format;
use crate::handler::{BoxFuture, BoxedHandler, Handler};
use crate::helper::Helpers;
use crate::middleware::auth::Auth;
use crate::middleware::format::FormatGuard;
use crate::middleware::{Middleware, Next};
use crate::request::Request;
use crate::scope::ScopeStore;

/// What a pipeline stage does, for inspection and logging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageKind {
    Authenticate { realm: String },
    Format(Vec<Format>),
    Middleware(String),
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticate { realm } => write!(f, "auth({realm})"),
            Self::Format(formats) => {
                let names: Vec<&str> = formats.iter().map(|f| f.name()).collect();
                write!(f, "format[{}]", names.join(","))
            }
            Self::Middleware(id) => write!(f, "use({id})"),
        }
    }
}

pub(crate) struct Stage {
    kind: StageKind,
    pub(crate) middleware: Arc<dyn Middleware>,
}

/// Stages plus the handler they lead to. Shared by every in-flight request
/// on the route.
pub(crate) struct Chain {
    pub(crate) stages: Vec<Stage>,
    handler: BoxedHandler,
    helpers: Arc<Helpers>,
}

impl Chain {
    pub(crate) fn endpoint(&self, mut req: Request) -> BoxFuture {
        req.helpers = Arc::clone(&self.helpers);
        self.handler.call(req)
    }
}

/// The immutable chain of stages bound to one route.
#[derive(Clone)]
pub struct Pipeline {
    chain: Arc<Chain>,
}

impl Pipeline {
    /// Builds a pipeline for `handler` from the settings visible in the
    /// store's active scope. The store is only read.
    pub fn build(scope: &ScopeStore, handler: impl Handler) -> Self {
        let mut stages = Vec::new();

        if let Some(Auth::Protected(basic)) = scope.auth() {
            stages.push(Stage {
                kind: StageKind::Authenticate { realm: basic.realm().to_owned() },
                middleware: Arc::new(basic),
            });
        }

        let formats = scope.formats();
        stages.push(Stage {
            kind: StageKind::Format(formats.clone()),
            middleware: Arc::new(FormatGuard::new(formats)),
        });

        for descriptor in scope.middlewares() {
            stages.push(Stage {
                kind: StageKind::Middleware(descriptor.id().to_owned()),
                middleware: descriptor.middleware,
            });
        }

        let chain = Chain {
            stages,
            handler: handler.into_boxed_handler(),
            helpers: Arc::new(Helpers::from_entries(scope.helpers())),
        };
        Self { chain: Arc::new(chain) }
    }

    /// Stage order, outermost first. The handler is implied at the end.
    pub fn stages(&self) -> Vec<StageKind> {
        self.chain.stages.iter().map(|s| s.kind.clone()).collect()
    }

    /// Type names of the helpers attached to the handler.
    pub fn helpers(&self) -> &[&'static str] {
        self.chain.helpers.names()
    }

    /// Runs the request through every stage and the handler.
    pub fn call(&self, req: Request) -> BoxFuture {
        Next { chain: Arc::clone(&self.chain), index: 0 }.run(req)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages())
            .field("helpers", &self.helpers())
            .finish()
    }
}
