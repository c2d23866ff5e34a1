//! The configuration DSL.
//!
//! [`Api`] is the configuration context. Calls made on it outside a version
//! block configure the global scope; calls made on the `&mut Api` a version
//! block receives configure that version:
//!
//! ```rust
//! use verso::{Api, Request, Response};
//!
//! async fn users(_req: Request) -> Response { Response::json("[]") }
//!
//! # fn main() -> Result<(), verso::Error> {
//! let mut api = Api::new();
//! api.prefix("/api")
//!     .basic_auth("admin", |user, password| user == "admin" && password == "secret");
//!
//! api.version("v1", |v1| {
//!     v1.respond_to(["json", "xml"])?;
//!     v1.get("users", users)?;
//!     Ok(())
//! })?;
//!
//! api.version("v2", |v2| {
//!     v2.no_auth();
//!     v2.get("users", users)?;
//!     Ok(())
//! })?;
//!
//! let app = api.into_app();
//! assert_eq!(app.routes().count(), 2);
//! # Ok(())
//! # }
//! ```

use std::ops::{Deref, DerefMut};

use http::Method;
use tracing::debug;

use crate::app::App;
use crate::error::{ConfigError, Error};
use crate::format::Format;
use crate::handler::Handler;
use crate::helper::{Helper, HelperEntry};
use crate::middleware::auth::{Auth, BasicAuth};
use crate::middleware::{Middleware, MiddlewareDescriptor};
use crate::path;
use crate::pipeline::Pipeline;
use crate::route_table::{Requirements, RouteTable};
use crate::scope::ScopeStore;

/// Builder for a versioned API. Freeze it with [`Api::into_app`].
#[derive(Debug, Default)]
pub struct Api {
    scope: ScopeStore,
    table: RouteTable,
}

impl Api {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the settings, as resolved in the current scope.
    pub fn scope(&self) -> &ScopeStore { &self.scope }

    // ── Settings ────────────────────────────────────────────────────────────

    /// Sets the URL prefix routes are mounted under. Defaults to `/`.
    pub fn prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.scope.current_mut().set_prefix(prefix.into());
        self
    }

    /// Replaces the formats this scope responds to. Defaults to json and
    /// jsonp. A version's list replaces the global one; it does not extend it.
    pub fn respond_to<I, S>(&mut self, formats: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let formats = formats.into_iter()
            .map(|f| f.as_ref().parse::<Format>())
            .collect::<Result<Vec<_>, _>>()?;
        if formats.is_empty() {
            return Err(ConfigError::NoFormats.into());
        }
        self.scope.current_mut().set_formats(formats);
        Ok(self)
    }

    /// Appends a middleware. Global middlewares wrap every version's routes;
    /// version middlewares run after them.
    pub fn use_middleware(&mut self, id: impl Into<String>, middleware: impl Middleware) -> &mut Self {
        self.scope.current_mut().push_middleware(MiddlewareDescriptor::new(id, middleware));
        self
    }

    /// Appends a helper made available to handlers through [`Request::helper`](crate::Request::helper).
    pub fn helper<T: Helper>(&mut self, helper: T) -> &mut Self {
        self.scope.current_mut().push_helper(HelperEntry::new(helper));
        self
    }

    /// Protects routes with HTTP Basic authentication.
    pub fn basic_auth<F>(&mut self, realm: impl Into<String>, check: F) -> &mut Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        self.scope.current_mut().set_auth(Auth::Protected(BasicAuth::new(realm, check)));
        self
    }

    /// Turns authentication off for this scope, even if an outer scope
    /// requires it.
    pub fn no_auth(&mut self) -> &mut Self {
        self.scope.current_mut().set_auth(Auth::Disabled);
        self
    }

    // ── Versions ────────────────────────────────────────────────────────────

    /// Configures version `name`. Routes declared in `block` are mounted
    /// under `<prefix>/<name>`.
    ///
    /// The block sees settings of the global scope merged or overridden by
    /// the version's own. When the block returns, fails or panics, the
    /// builder is back in the global scope. Declaring the same version
    /// again extends it; override settings such as `prefix` keep the last
    /// value written.
    pub fn version<F>(&mut self, name: &str, block: F) -> Result<&mut Self, Error>
    where
        F: FnOnce(&mut Api) -> Result<(), Error>,
    {
        self.scope.enter(name)?;
        {
            let mut guard = VersionGuard { api: &mut *self };
            block(&mut *guard)?;
        }
        Ok(self)
    }

    // ── Routes ──────────────────────────────────────────────────────────────

    /// Declares a route. The mount path is `prefix / version / path`.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        requirements: Requirements,
        handler: impl Handler,
    ) -> Result<&mut Self, Error> {
        let mount = self.mount_path(path);
        let pipeline = Pipeline::build(&self.scope, handler);
        debug!(
            method = %method,
            path = %mount,
            scope = %self.scope.active(),
            stages = ?pipeline.stages(),
            "route declared"
        );
        self.table.insert(method, &mount, requirements, pipeline)?;
        Ok(self)
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::GET, path, Requirements::default(), handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::POST, path, Requirements::default(), handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::PUT, path, Requirements::default(), handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::PATCH, path, Requirements::default(), handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::DELETE, path, Requirements::default(), handler)
    }

    pub fn head(&mut self, path: &str, handler: impl Handler) -> Result<&mut Self, Error> {
        self.route(Method::HEAD, path, Requirements::default(), handler)
    }

    /// The path a route declared here would be mounted at.
    pub fn mount_path(&self, user_path: &str) -> String {
        let prefix = self.scope.prefix();
        let version = self.scope.version_name().unwrap_or_default();
        path::join([prefix.as_str(), version, user_path])
    }

    /// Builds the pipeline a route declared here would get, without
    /// registering it.
    pub fn pipeline(&self, handler: impl Handler) -> Pipeline {
        Pipeline::build(&self.scope, handler)
    }

    /// Freezes the configuration.
    pub fn into_app(self) -> App {
        App::new(self.table)
    }
}

/// Holds the builder inside a version scope and leaves it on drop.
struct VersionGuard<'a> {
    api: &'a mut Api,
}

impl Deref for VersionGuard<'_> {
    type Target = Api;

    fn deref(&self) -> &Api { &*self.api }
}

impl DerefMut for VersionGuard<'_> {
    fn deref_mut(&mut self) -> &mut Api { &mut *self.api }
}

impl Drop for VersionGuard<'_> {
    fn drop(&mut self) {
        self.api.scope.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Response};

    async fn ok(_req: Request) -> Response { Response::text("ok") }

    #[test]
    fn mount_paths_include_prefix_and_version() {
        let mut api = Api::new();
        assert_eq!(api.mount_path("users"), "/users");
        api.version("v1", |v1| {
            assert_eq!(v1.mount_path("users"), "/v1/users");
            assert_eq!(v1.mount_path("/users/{id}/"), "/v1/users/{id}");
            Ok(())
        }).unwrap();
        api.prefix("/api/");
        api.version("v2", |v2| {
            assert_eq!(v2.mount_path("users"), "/api/v2/users");
            Ok(())
        }).unwrap();
    }

    #[test]
    fn version_prefix_overrides_global() {
        let mut api = Api::new();
        api.prefix("/api");
        api.version("v1", |v1| {
            v1.prefix("/legacy");
            v1.get("users", ok)?;
            Ok(())
        }).unwrap();
        let app = api.into_app();
        let routes: Vec<_> = app.routes().map(|(m, p)| (m.clone(), p.to_owned())).collect();
        assert_eq!(routes, [(Method::GET, "/legacy/v1/users".to_owned())]);
    }

    #[test]
    fn duplicate_routes_surface_the_matcher_error() {
        let mut api = Api::new();
        api.get("users", ok).unwrap();
        let err = api.get("/users", ok).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidRoute { ref path, .. }) if path == "/users"));
    }

    #[test]
    fn unknown_and_empty_formats_fail() {
        let mut api = Api::new();
        assert!(matches!(
            api.respond_to(["json", "docx"]),
            Err(Error::Config(ConfigError::UnknownFormat(ref f))) if f == "docx"
        ));
        assert!(matches!(
            api.respond_to(Vec::<&str>::new()),
            Err(Error::Config(ConfigError::NoFormats))
        ));
        assert_eq!(api.scope().formats(), Format::DEFAULTS.to_vec());
    }
}
