//! Radix-tree route table.
//!
//! One tree per HTTP method. O(path-length) lookup via [`matchit`]. The table
//! knows nothing about versions or scopes: it receives finished mount paths
//! and pipelines from [`Api`](crate::Api) and matches requests against them.

use std::collections::HashMap;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use regex::Regex;

use crate::error::ConfigError;
use crate::format::Format;
use crate::path;
use crate::pipeline::Pipeline;
use crate::request::Request;
use crate::response::Response;

/// Constraints on path parameters, checked after the path matched.
///
/// ```rust
/// use verso::Requirements;
///
/// let numeric_id = Requirements::new().param("id", r"\d+").unwrap();
/// ```
#[derive(Clone, Debug, Default)]
pub struct Requirements {
    params: Vec<(String, Regex)>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires parameter `name` to match `pattern` in full.
    pub fn param(mut self, name: &str, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| ConfigError::InvalidRequirement {
            param: name.to_owned(),
            reason: e.to_string(),
        })?;
        self.params.push((name.to_owned(), regex));
        Ok(self)
    }

    pub fn is_empty(&self) -> bool { self.params.is_empty() }

    fn satisfied_by(&self, params: &HashMap<String, String>) -> bool {
        self.params.iter()
            .all(|(name, regex)| params.get(name).is_some_and(|v| regex.is_match(v)))
    }
}

struct Route {
    requirements: Requirements,
    pipeline: Pipeline,
}

/// Result of matching a method and path.
pub enum Lookup<'a> {
    Found { pipeline: &'a Pipeline, params: HashMap<String, String> },
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

/// Registered routes, one tree per method.
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<Method, MatchitRouter<Route>>,
    declared: Vec<(Method, String)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Pattern errors come from the matcher unchanged.
    pub fn insert(
        &mut self,
        method: Method,
        pattern: &str,
        requirements: Requirements,
        pipeline: Pipeline,
    ) -> Result<(), ConfigError> {
        for (param, _) in &requirements.params {
            let named = format!("{{{param}}}");
            let catch_all = format!("{{*{param}}}");
            if !pattern.contains(&named) && !pattern.contains(&catch_all) {
                return Err(ConfigError::InvalidRequirement {
                    param: param.clone(),
                    reason: format!("`{pattern}` has no such parameter"),
                });
            }
        }

        let route = Route { requirements, pipeline };
        self.routes
            .entry(method.clone())
            .or_default()
            .insert(pattern, route)
            .map_err(|e| ConfigError::InvalidRoute { path: pattern.to_owned(), reason: e.to_string() })?;
        self.declared.push((method, pattern.to_owned()));
        Ok(())
    }

    /// Declared routes, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.declared.iter().map(|(m, p)| (m, p.as_str()))
    }

    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_> {
        if let Some(found) = self.routes.get(method).and_then(|tree| matched(tree, path)) {
            return found;
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(m, tree)| *m != method && matched(tree, path).is_some())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Lookup::MethodNotAllowed(allowed)
    }

    /// Matches `req` and runs the matched pipeline.
    ///
    /// A trailing extension naming a known format (`/users/42.json`) is
    /// stripped before matching, so it never ends up inside a parameter. The
    /// full path is used when the stripped one matches nothing; any other
    /// extension is only tried when the full path matches nothing.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let method = req.method().clone();
        let target = req.path().to_owned();
        let split = path::split_extension(&target);

        let known = split.filter(|(_, extension)| extension.parse::<Format>().is_ok());
        let mut lookup = match known {
            Some((stem, extension)) => match self.lookup(&method, stem) {
                Lookup::NotFound => self.lookup(&method, &target),
                stripped => {
                    req.extension = Some(extension.to_owned());
                    stripped
                }
            },
            None => self.lookup(&method, &target),
        };
        if matches!(lookup, Lookup::NotFound) && known.is_none() {
            if let Some((stem, extension)) = split {
                let stripped = self.lookup(&method, stem);
                if let Lookup::Found { .. } = stripped {
                    req.extension = Some(extension.to_owned());
                    lookup = stripped;
                }
            }
        }

        match lookup {
            Lookup::Found { pipeline, params } => {
                req.params = params;
                pipeline.call(req).await
            }
            Lookup::MethodNotAllowed(allowed) => {
                let allow: Vec<&str> = allowed.iter().map(Method::as_str).collect();
                Response::builder()
                    .status(StatusCode::METHOD_NOT_ALLOWED)
                    .header("allow", &allow.join(", "))
                    .text("Method Not Allowed")
            }
            Lookup::NotFound => Response::builder().status(StatusCode::NOT_FOUND).text("Not Found"),
        }
    }
}

fn matched<'a>(tree: &'a MatchitRouter<Route>, path: &str) -> Option<Lookup<'a>> {
    let hit = tree.at(path).ok()?;
    let params: HashMap<String, String> = hit.params.iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
    if !hit.value.requirements.satisfied_by(&params) {
        return None;
    }
    Some(Lookup::Found { pipeline: &hit.value.pipeline, params })
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.declared.iter().map(|(m, p)| format!("{m} {p}")))
            .finish()
    }
}
