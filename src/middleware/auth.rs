//! HTTP Basic authentication stage.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use http::StatusCode;
use tracing::debug;

use super::{Middleware, Next};
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;

/// User-supplied credential check: `(user, password) -> accepted`.
pub type CredentialCheck = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Authentication requirement of a scope.
///
/// The absence of an `Auth` value means "no authentication". `Disabled` is an
/// explicit opt-out that shadows an inherited requirement.
#[derive(Clone, Debug)]
pub enum Auth {
    Disabled,
    Protected(BasicAuth),
}

/// Challenges callers for Basic credentials and rejects them with `401`
/// unless the check accepts the presented user and password.
#[derive(Clone)]
pub struct BasicAuth {
    realm: String,
    check: CredentialCheck,
}

impl BasicAuth {
    pub fn new<F>(realm: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self { realm: realm.into(), check: Arc::new(check) }
    }

    pub fn realm(&self) -> &str { &self.realm }

    fn challenge(&self) -> Response {
        Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header("www-authenticate", &format!("Basic realm=\"{}\"", self.realm))
            .text("Unauthorized")
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").field("realm", &self.realm).finish_non_exhaustive()
    }
}

impl Middleware for BasicAuth {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture {
        match credentials(&req) {
            Some((user, password)) if (self.check)(&user, &password) => {
                req.remote_user = Some(user);
                next.run(req)
            }
            presented => {
                debug!(realm = %self.realm, presented = presented.is_some(), "basic auth rejected");
                let res = self.challenge();
                Box::pin(async move { res })
            }
        }
    }
}

/// Extracts `user:password` from an `Authorization: Basic …` header.
fn credentials(req: &Request) -> Option<(String, String)> {
    let header = req.header("authorization")?;
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_owned(), password.to_owned()))
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    fn with_auth(value: &str) -> Request {
        Request::new(Method::GET, "/").with_header("Authorization", value)
    }

    #[test]
    fn decodes_basic_credentials() {
        // "alice:s3cr:et"
        let req = with_auth("Basic YWxpY2U6czNjcjpldA==");
        assert_eq!(credentials(&req), Some(("alice".into(), "s3cr:et".into())));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(credentials(&with_auth("Bearer abc.def.ghi")), None);
        assert_eq!(credentials(&with_auth("Basic !!!")), None);
        // "nocolon"
        assert_eq!(credentials(&with_auth("Basic bm9jb2xvbg==")), None);
        assert_eq!(credentials(&Request::new(Method::GET, "/")), None);
    }
}
