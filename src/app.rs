//! The frozen, dispatchable application.

use http::Method;

use crate::request::Request;
use crate::response::Response;
use crate::route_table::RouteTable;

/// An API whose configuration is complete.
///
/// Produced by [`Api::into_app`](crate::Api::into_app). There is no way to
/// change an `App`; share it behind an `Arc` across as many concurrent
/// requests as needed, or hand it to [`Server::serve`](crate::Server::serve).
#[derive(Debug)]
pub struct App {
    table: RouteTable,
}

impl App {
    pub(crate) fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// Dispatches one request: the matched route's pipeline response, or
    /// `404` / `405` when nothing matches.
    pub async fn handle(&self, req: Request) -> Response {
        self.table.dispatch(req).await
    }

    /// Declared routes as `(method, mount path)`, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.table.routes()
    }
}
