//! Scope store and resolver.
//!
//! Settings live in two namespaces: the global one, always present, and the
//! namespace of the version being configured. [`Scope`] says which one DSL
//! calls write to. Reads go through two lookup modes:
//!
//! - **override** ([`ScopeStore::resolve`]): the version value if the active
//!   version sets the key, else the global value;
//! - **merge** ([`ScopeStore::merge`]): global entries first, then
//!   version-only additions, without duplicates.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::format::Format;
use crate::helper::HelperEntry;
use crate::middleware::auth::Auth;
use crate::middleware::MiddlewareDescriptor;
use crate::settings::Settings;

/// Which namespace configuration calls currently target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Global,
    Version(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Version(name) => write!(f, "version `{name}`"),
        }
    }
}

/// Global settings, per-version settings, and the active scope.
///
/// Version namespaces outlive their block so that declaring the same version
/// twice extends it.
#[derive(Debug, Default)]
pub struct ScopeStore {
    global: Settings,
    versions: HashMap<String, Settings>,
    active: Scope,
}

impl ScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &Scope { &self.active }

    /// Name of the active version, if any.
    pub fn version_name(&self) -> Option<&str> {
        match &self.active {
            Scope::Global => None,
            Scope::Version(name) => Some(name.as_str()),
        }
    }

    pub fn global(&self) -> &Settings { &self.global }

    /// Settings of the active version.
    pub fn version(&self) -> Option<&Settings> {
        self.versions.get(self.version_name()?)
    }

    /// The namespace a configuration call writes to.
    pub(crate) fn current_mut(&mut self) -> &mut Settings {
        match &self.active {
            Scope::Global => &mut self.global,
            Scope::Version(name) => self.versions.entry(name.clone()).or_default(),
        }
    }

    pub(crate) fn enter(&mut self, name: &str) -> Result<(), ConfigError> {
        if let Scope::Version(outer) = &self.active {
            return Err(ConfigError::NestedVersion { outer: outer.clone(), inner: name.to_owned() });
        }
        if name.trim().is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidVersionName(name.to_owned()));
        }
        debug!(version = name, "entering version scope");
        self.active = Scope::Version(name.to_owned());
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        if let Scope::Version(name) = std::mem::take(&mut self.active) {
            debug!(version = %name, "leaving version scope");
        }
    }

    // ── Resolver ────────────────────────────────────────────────────────────

    /// Override lookup: the active version's value wins when it is set.
    pub fn resolve<T, F>(&self, field: F) -> Option<T>
    where
        T: Clone,
        F: Fn(&Settings) -> Option<&T>,
    {
        self.version()
            .and_then(&field)
            .or_else(|| field(&self.global))
            .cloned()
    }

    /// Merge lookup: global entries then version additions, first seen wins.
    pub fn merge<T, F>(&self, field: F) -> Vec<T>
    where
        T: Clone + PartialEq,
        F: Fn(&Settings) -> &[T],
    {
        let version: &[T] = self.version().map(&field).unwrap_or_default();
        let mut merged: Vec<T> = Vec::new();
        for item in field(&self.global).iter().chain(version) {
            if !merged.contains(item) {
                merged.push(item.clone());
            }
        }
        merged
    }

    pub fn prefix(&self) -> String {
        self.resolve(|s| s.prefix.as_ref()).unwrap_or_else(|| "/".to_owned())
    }

    pub fn formats(&self) -> Vec<Format> {
        self.resolve(|s| s.formats.as_ref()).unwrap_or_else(|| Format::DEFAULTS.to_vec())
    }

    pub fn auth(&self) -> Option<Auth> {
        self.resolve(|s| s.auth.as_ref())
    }

    pub fn middlewares(&self) -> Vec<MiddlewareDescriptor> {
        self.merge(|s| s.middlewares.as_slice())
    }

    pub fn helpers(&self) -> Vec<HelperEntry> {
        self.merge(|s| s.helpers.as_slice())
    }
}
