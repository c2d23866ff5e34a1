//! Incoming HTTP request type.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Extensions, Method};
use tracing::debug;

use crate::format::Format;
use crate::helper::{Helper, Helpers};

/// An incoming HTTP request as seen by middlewares and handlers.
///
/// The server builds one from the hyper request; tests and embedders build
/// one with [`Request::new`] and the chaining setters.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) extension: Option<String>,
    pub(crate) format: Option<Format>,
    pub(crate) remote_user: Option<String>,
    pub(crate) helpers: Arc<Helpers>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// Creates a request for `target`, a path with an optional `?query`.
    ///
    /// ```rust
    /// use verso::Request;
    /// use http::Method;
    ///
    /// let req = Request::new(Method::GET, "/v1/users?format=xml")
    ///     .with_header("accept", "application/json");
    /// assert_eq!(req.path(), "/v1/users");
    /// assert_eq!(req.query("format").as_deref(), Some("xml"));
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            extension: None,
            format: None,
            remote_user: None,
            helpers: Arc::default(),
            extensions: Extensions::new(),
        }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let target = parts.uri.path_and_query().map_or("/", |pq| pq.as_str());
        let mut req = Self::new(parts.method, target);
        req.headers = parts.headers.iter()
            .filter_map(|(name, value)| match value.to_str() {
                Ok(value) => Some((name.as_str().to_owned(), value.to_owned())),
                Err(_) => {
                    debug!(header = %name, "dropping non-UTF-8 header value");
                    None
                }
            })
            .collect();
        req.body = body;
        req.extensions = parts.extensions;
        req
    }

    /// Appends a header. Returns `self` for chaining.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Replaces the body. Returns `self` for chaining.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a decoded query-string parameter.
    pub fn query(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/v1/users/{id}`, `req.param("id")` on `/v1/users/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The format negotiated by the format stage, once it has run.
    pub fn format(&self) -> Option<Format> { self.format }

    /// The user name accepted by the Basic authentication stage.
    pub fn remote_user(&self) -> Option<&str> { self.remote_user.as_deref() }

    /// Looks up a helper attached to this route's pipeline.
    pub fn helper<T: Helper>(&self) -> Option<&T> { self.helpers.get::<T>() }

    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }
}
