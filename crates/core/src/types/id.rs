//! Book identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a [`Book`](crate::Book).
///
/// Assigned once when the book is created and never changed afterwards.
/// Equality of ids is the only criterion used to match books on save and
/// delete.
///
/// ```
/// use soft_stories_core::BookId;
///
/// let id = BookId::generated(1_700_000_000_000);
/// assert_eq!(id.as_str(), "new-book-1700000000000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Prefix of ids allocated by the dashboard.
    pub const GENERATED_PREFIX: &'static str = "new-book-";

    /// Wrap an existing id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a book created at `unix_millis`.
    #[must_use]
    pub fn generated(unix_millis: i64) -> Self {
        Self(format!("{}{unix_millis}", Self::GENERATED_PREFIX))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (an unsaved template).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
