//! Helper capabilities shared with handlers.
//!
//! A helper is any value a handler wants to call into: a paginator, a
//! presenter, a client for a downstream service. Helpers declared globally are
//! available to every version; helpers declared inside a version are added on
//! top. The pipeline builder collects them into a [`Helpers`] table that is
//! attached to the request right before the handler runs:
//!
//! ```rust
//! use verso::{Api, Helper, Request, Response};
//!
//! struct Paginator { per_page: usize }
//! impl Helper for Paginator {}
//!
//! async fn list(req: Request) -> Response {
//!     let per_page = req.helper::<Paginator>().map_or(25, |p| p.per_page);
//!     Response::text(per_page.to_string())
//! }
//!
//! let mut api = Api::new();
//! api.helper(Paginator { per_page: 50 });
//! api.get("items", list).unwrap();
//! ```
//!
//! Helper identity is the Rust type: declaring a second `Paginator` in a
//! version keeps the first one resolved.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

/// Marker for values that can be attached to handlers as helpers.
pub trait Helper: Send + Sync + 'static {}

/// A helper as stored in a settings namespace.
#[derive(Clone)]
pub struct HelperEntry {
    type_id: TypeId,
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl HelperEntry {
    pub(crate) fn new<T: Helper>(helper: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            value: Arc::new(helper),
        }
    }

    /// The helper's type name.
    pub fn name(&self) -> &'static str { self.name }
}

impl PartialEq for HelperEntry {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for HelperEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lookup table of the helpers resolved for one route.
#[derive(Default)]
pub struct Helpers {
    by_type: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    names: Vec<&'static str>,
}

impl Helpers {
    pub(crate) fn from_entries(entries: Vec<HelperEntry>) -> Self {
        let mut helpers = Self::default();
        for entry in entries {
            if let Entry::Vacant(slot) = helpers.by_type.entry(entry.type_id) {
                slot.insert(entry.value);
                helpers.names.push(entry.name);
            }
        }
        helpers
    }

    pub fn get<T: Helper>(&self) -> Option<&T> {
        self.by_type.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    /// Helper type names, in resolution order.
    pub fn names(&self) -> &[&'static str] { &self.names }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock(u64);
    impl Helper for Clock {}

    struct Greeter;
    impl Helper for Greeter {}

    #[test]
    fn lookup_by_type() {
        let helpers = Helpers::from_entries(vec![HelperEntry::new(Clock(7)), HelperEntry::new(Greeter)]);
        assert_eq!(helpers.get::<Clock>().map(|c| c.0), Some(7));
        assert!(helpers.get::<Greeter>().is_some());
        assert_eq!(helpers.names().len(), 2);
    }

    #[test]
    fn entries_compare_by_type() {
        assert_eq!(HelperEntry::new(Clock(1)), HelperEntry::new(Clock(2)));
        assert_ne!(HelperEntry::new(Clock(1)), HelperEntry::new(Greeter));
    }
}
