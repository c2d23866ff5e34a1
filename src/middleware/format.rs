//! Format validation stage.
//!
//! The requested format is taken from, in order: the URL extension the route
//! table stripped (`/v1/users.xml`), the `format` query parameter, the
//! `Accept` header, and finally the first format the scope responds to.
//! Anything outside the resolved set ends the request with
//! `406 Not Acceptable`.

use http::StatusCode;
use tracing::debug;

use super::{Middleware, Next};
use crate::format::Format;
use crate::handler::BoxFuture;
use crate::request::Request;
use crate::response::Response;

/// Rejects requests for formats outside `allowed`.
#[derive(Clone, Debug)]
pub struct FormatGuard {
    allowed: Vec<Format>,
}

impl FormatGuard {
    pub fn new(allowed: Vec<Format>) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &[Format] { &self.allowed }

    /// Picks the format for `req`, or returns what was asked for on mismatch.
    fn negotiate(&self, req: &Request) -> Result<Format, String> {
        let explicit = req.extension.clone().or_else(|| req.query("format"));
        if let Some(requested) = explicit {
            return requested.parse::<Format>().ok()
                .filter(|f| self.allowed.contains(f))
                .ok_or(requested);
        }

        let default = self.allowed.first().copied().unwrap_or(Format::JSON);
        let Some(accept) = req.header("accept") else {
            return Ok(default);
        };

        let mut wildcard = false;
        let mut refused = None;
        for media in accept.split(',').map(|m| m.split(';').next().unwrap_or_default().trim()) {
            if media == "*/*" || media.ends_with("/*") {
                wildcard = true;
                continue;
            }
            match Format::from_media_type(media) {
                Some(f) if self.allowed.contains(&f) => return Ok(f),
                Some(_) if refused.is_none() => refused = Some(media.to_owned()),
                _ => {}
            }
        }
        match refused {
            Some(media) if !wildcard => Err(media),
            _ => Ok(default),
        }
    }

    fn reject(&self) -> Response {
        let names: Vec<&str> = self.allowed.iter().map(|f| f.name()).collect();
        Response::builder()
            .status(StatusCode::NOT_ACCEPTABLE)
            .text(format!("Invalid format. Accepts one of [{}]", names.join(", ")))
    }
}

impl Middleware for FormatGuard {
    fn call(&self, mut req: Request, next: Next) -> BoxFuture {
        let format = match self.negotiate(&req) {
            Ok(format) => format,
            Err(requested) => {
                debug!(%requested, "format rejected");
                let res = self.reject();
                return Box::pin(async move { res });
            }
        };
        req.format = Some(format);

        let callback = if format == Format::JSONP {
            req.query("callback").filter(|cb| is_callback(cb))
        } else {
            None
        };

        Box::pin(async move {
            let mut res = next.run(req).await;
            if let Some(callback) = callback.filter(|_| res.status_code().is_success()) {
                let mut wrapped = Vec::with_capacity(callback.len() + res.body().len() + 3);
                wrapped.extend_from_slice(callback.as_bytes());
                wrapped.push(b'(');
                wrapped.extend_from_slice(res.body());
                wrapped.extend_from_slice(b");");
                res.set_body(wrapped);
                res.set_header("content-type", format.mime());
            } else if res.header("content-type").is_none() && !res.body().is_empty() {
                res.set_header("content-type", format.mime());
            }
            res
        })
    }
}

/// JavaScript identifier path such as `cb` or `app.handlers.users`.
fn is_callback(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 128
        && name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::*;

    fn guard(names: &[&str]) -> FormatGuard {
        FormatGuard::new(names.iter().map(|n| n.parse().unwrap()).collect())
    }

    fn get(target: &str) -> Request {
        Request::new(Method::GET, target)
    }

    #[test]
    fn defaults_to_first_allowed() {
        assert_eq!(guard(&["xml", "json"]).negotiate(&get("/")), Ok("xml".parse::<Format>().unwrap()));
    }

    #[test]
    fn extension_beats_query_and_accept() {
        let mut req = get("/?format=json").with_header("accept", "application/json");
        req.extension = Some("xml".into());
        assert_eq!(guard(&["json", "xml"]).negotiate(&req).map(Format::name), Ok("xml"));
        assert_eq!(guard(&["json"]).negotiate(&req), Err("xml".into()));
    }

    #[test]
    fn query_parameter_selects_format() {
        assert_eq!(guard(&["json", "jsonp"]).negotiate(&get("/?format=jsonp")), Ok(Format::JSONP));
        assert_eq!(guard(&["json"]).negotiate(&get("/?format=pdf")), Err("pdf".into()));
    }

    #[test]
    fn accept_header_negotiation() {
        let g = guard(&["json", "xml"]);
        let req = get("/").with_header("accept", "text/html, application/xml;q=0.9");
        assert_eq!(g.negotiate(&req).map(Format::name), Ok("xml"));

        let req = get("/").with_header("accept", "text/html");
        assert_eq!(g.negotiate(&req), Err("text/html".into()));

        let req = get("/").with_header("accept", "text/html, */*;q=0.8");
        assert_eq!(g.negotiate(&req), Ok(Format::JSON));

        let req = get("/").with_header("accept", "image/png");
        assert_eq!(g.negotiate(&req), Ok(Format::JSON));
    }

    #[test]
    fn callback_names() {
        assert!(is_callback("jQuery_123"));
        assert!(is_callback("app.users.render"));
        assert!(!is_callback(""));
        assert!(!is_callback("alert(1)//"));
    }
}
