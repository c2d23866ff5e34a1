//! One settings namespace: everything a scope can declare.

use crate::format::Format;
use crate::helper::HelperEntry;
use crate::middleware::auth::Auth;
use crate::middleware::MiddlewareDescriptor;

/// Settings declared in one scope, global or version.
///
/// `prefix`, `formats` and `auth` are override keys: a more specific scope
/// replaces them wholesale. `middlewares` and `helpers` are append keys that
/// resolve by merging the scopes.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub(crate) prefix: Option<String>,
    pub(crate) formats: Option<Vec<Format>>,
    pub(crate) auth: Option<Auth>,
    pub(crate) middlewares: Vec<MiddlewareDescriptor>,
    pub(crate) helpers: Vec<HelperEntry>,
}

impl Settings {
    pub fn prefix(&self) -> Option<&str> { self.prefix.as_deref() }
    pub fn formats(&self) -> Option<&[Format]> { self.formats.as_deref() }
    pub fn auth(&self) -> Option<&Auth> { self.auth.as_ref() }
    pub fn middlewares(&self) -> &[MiddlewareDescriptor] { &self.middlewares }
    pub fn helpers(&self) -> &[HelperEntry] { &self.helpers }

    pub(crate) fn set_prefix(&mut self, prefix: String) {
        self.prefix = Some(prefix);
    }

    /// Replaces the format list, dropping repeats.
    pub(crate) fn set_formats(&mut self, formats: Vec<Format>) {
        let mut unique = Vec::with_capacity(formats.len());
        for format in formats {
            if !unique.contains(&format) {
                unique.push(format);
            }
        }
        self.formats = Some(unique);
    }

    pub(crate) fn set_auth(&mut self, auth: Auth) {
        self.auth = Some(auth);
    }

    pub(crate) fn push_middleware(&mut self, middleware: MiddlewareDescriptor) {
        self.middlewares.push(middleware);
    }

    pub(crate) fn push_helper(&mut self, helper: HelperEntry) {
        self.helpers.push(helper);
    }
}
