//! Identifier management using string interning for efficient string storage and comparison
//!
//! Diagram objects are named by URIs, and their rendered shapes carry the
//! fragment of that URI as their element id. This module provides the [`Id`]
//! type used for both.

use std::{
    fmt,
    sync::{Mutex, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut interner)
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use celldl_core::identifier::Id;
///
/// let id = Id::new("component-1");
/// assert_eq!(id, "component-1");
///
/// // Object URIs are identified by their fragment
/// let from_uri = Id::from_uri("file:///diagrams/model.celldl#component-1");
/// assert_eq!(from_uri, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates an `Id` from the fragment of a URI.
    ///
    /// A URI without a `#` is used whole.
    ///
    /// ```
    /// use celldl_core::identifier::Id;
    ///
    /// assert_eq!(Id::from_uri("http://example.org/doc#c1"), "c1");
    /// assert_eq!(Id::from_uri("c2"), "c2");
    /// ```
    pub fn from_uri(uri: &str) -> Self {
        let fragment = uri.rsplit_once('#').map_or(uri, |(_, fragment)| fragment);
        Self::new(fragment)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = with_interner(|interner| interner.resolve(self.0).unwrap_or("").to_string());
        f.write_str(&name)
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// # Examples
    ///
    /// ```
    /// use celldl_core::identifier::Id;
    ///
    /// let id: Id = "example".into();
    /// assert_eq!(id, "example");
    /// ```
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("membrane");
        let id2 = Id::new("membrane");
        let id3 = Id::new("cytosol");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "membrane");
    }

    #[test]
    fn test_from_uri() {
        assert_eq!(Id::from_uri("file:///tmp/a.celldl#ID-00001"), "ID-00001");
        assert_eq!(
            Id::from_uri("file:///tmp/a.celldl#ID-00001"),
            Id::from_uri("file:///tmp/b.celldl#ID-00001")
        );
        assert_eq!(Id::from_uri("no-fragment"), "no-fragment");
        assert_eq!(Id::from_uri("http://example.org/doc#"), "");
    }

    #[test]
    fn test_underscore_names_are_plain() {
        let id = Id::from_uri("file:///tmp/a.celldl#__0");
        assert_eq!(id, Id::new("__0"));
        assert_eq!(id.to_string(), "__0");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{}", id), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "test_string".into();
        let id2 = Id::new("test_string");

        assert_eq!(id1, id2);
        assert_eq!(id1, "test_string");
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("svg-panel");
        assert!(id == "svg-panel");
        assert!(id != "svg");

        let name = String::from("svg-panel");
        assert!(id == name.as_str());

        let empty = Id::new("");
        assert!(empty == "");
    }
}
