//! JSON Pointer (RFC 6901) locations inside a schema document.
//!
//! Errors carry the pointer of the node that caused them so a failure in a
//! large schema set can be traced back to a single keyword.

use std::fmt;

/// An immutable, already-escaped JSON Pointer. The empty pointer is the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPointer(String);

impl JsonPointer {
    /// The pointer to the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new pointer one segment deeper.
    ///
    /// Escaping rules: `~` -> `~0`, `/` -> `~1`
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut path: String = String::with_capacity(self.0.len() + segment.len() + 1);
        path.push_str(&self.0);
        path.push('/');
        for c in segment.chars() {
            match c {
                '~' => path.push_str("~0"),
                '/' => path.push_str("~1"),
                other => path.push(other),
            }
        }
        Self(path)
    }

    /// Shorthand for `child(a).child(b)`.
    #[must_use]
    pub fn join(&self, first: &str, second: &str) -> Self {
        self.child(first).child(second)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "/")
        } else {
            f.write_str(&self.0)
        }
    }
}
