//! # verso
//!
//! Declarative, versioned HTTP APIs.
//!
//! Describe global settings and per-version overrides through nested
//! blocks; verso resolves them into one immutable pipeline per route:
//!
//! ```text
//! Basic auth → format validation → your middlewares → handler (+ helpers)
//! ```
//!
//! ## Scoping rules
//!
//! | Setting | Declared with | Version vs. global |
//! |---|---|---|
//! | prefix | [`Api::prefix`] | version replaces global (default `/`) |
//! | formats | [`Api::respond_to`] | version replaces global (default json, jsonp) |
//! | auth | [`Api::basic_auth`], [`Api::no_auth`] | version replaces global (default none) |
//! | middlewares | [`Api::use_middleware`] | global first, then version additions |
//! | helpers | [`Api::helper`] | global first, then version additions |
//!
//! Routes mount at `prefix / version / path`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use verso::{Api, Request, Response, Server};
//! use verso::middleware::Trace;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), verso::Error> {
//!     let mut api = Api::new();
//!     api.use_middleware("trace", Trace)
//!         .basic_auth("staff", |user, password| user == "admin" && password == "secret");
//!
//!     api.version("v1", |v1| {
//!         v1.get("users/{id}", get_user)?;
//!         Ok(())
//!     })?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(api.into_app()).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#))
//! }
//! ```

mod api;
mod app;
mod error;
mod format;
mod handler;
mod helper;
mod path;
mod pipeline;
mod request;
mod response;
mod route_table;
mod scope;
mod server;
mod settings;

pub mod middleware;

pub use api::Api;
pub use app::App;
pub use error::{ConfigError, Error};
pub use format::Format;
pub use handler::{BoxFuture, Handler};
pub use helper::{Helper, HelperEntry, Helpers};
pub use pipeline::{Pipeline, StageKind};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use route_table::{Lookup, Requirements, RouteTable};
pub use scope::{Scope, ScopeStore};
pub use server::Server;
pub use settings::Settings;
