//! Schema versioning for stored content documents.
//!
//! | version | layout |
//! |---------|--------|
//! | 0 | legacy site: no `schemaVersion` |
//! | 1 | `schemaVersion` present |
//!
//! Prices are JSON numbers in both. Decimal strings written by earlier
//! builds of version 1 are still accepted.
//!
//! Version 0 differs from version 1 only in fields that serde defaults and
//! [`Price`](crate::Price) already accept, so upgrading is a stamp of the
//! new version. Later layouts add their step to [`upgrade`].

use std::collections::HashSet;

use serde_json::Value;

use super::SiteContent;
use crate::BookId;

/// Layout version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Errors decoding a stored content document.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The document is not valid JSON or does not fit the content layout.
    #[error("malformed content document: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The document root is not a JSON object.
    #[error("content document must be a JSON object")]
    NotAnObject,
    /// Written by a newer build than this one.
    #[error("content schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },
    /// Two books share an id.
    #[error("duplicate book id: {0}")]
    DuplicateBookId(BookId),
}

impl MigrationError {
    /// Whether the stored document holds data this build must not replace.
    ///
    /// Malformed documents carry nothing recoverable; newer or inconsistent
    /// ones do.
    #[must_use]
    pub const fn preserves_stored(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedVersion { .. } | Self::DuplicateBookId(_)
        )
    }
}

/// Decode a stored document, upgrading older layouts.
///
/// Returns the content and the version it was upgraded from, if any.
/// Callers should persist the content again when an upgrade happened.
///
/// # Errors
///
/// Returns `MigrationError` if the document is malformed, newer than
/// [`CURRENT_SCHEMA_VERSION`], or lists two books with the same id.
pub fn decode_document(raw: &str) -> Result<(SiteContent, Option<u32>), MigrationError> {
    let value: Value = serde_json::from_str(raw)?;
    let object = value.as_object().ok_or(MigrationError::NotAnObject)?;

    let found = object
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    if found > u64::from(CURRENT_SCHEMA_VERSION) {
        return Err(MigrationError::UnsupportedVersion {
            found,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut content: SiteContent = serde_json::from_value(value)?;
    let mut seen = HashSet::new();
    if let Some(book) = content.books.iter().find(|b| !seen.insert(&b.id)) {
        return Err(MigrationError::DuplicateBookId(book.id.clone()));
    }

    let from = content.schema_version;
    if from == CURRENT_SCHEMA_VERSION {
        return Ok((content, None));
    }

    upgrade(&mut content);
    Ok((content, Some(from)))
}

fn upgrade(content: &mut SiteContent) {
    // 0 -> 1: nothing to rewrite beyond the version stamp.
    content.schema_version = CURRENT_SCHEMA_VERSION;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Price;

    const LEGACY: &str = r##"{
        "home": {"heroText": "Hi", "tagline": "t", "supportWriterText": "s",
                 "buttonText": "b", "buttonLink": "/books"},
        "about": {"bio": "bio", "imageUrl": "u", "purposeText": "p"},
        "books": [{"id": "b1", "title": "One", "description": "d", "price": 2.99,
                   "coverImage": "c", "purchaseLinks": {"amazon": "a", "gumroad": "", "etsy": ""}}],
        "settings": {
            "general": {"siteLogo": "L", "navHome": "H", "navAbout": "A", "navBooks": "B",
                        "footerInstagramLink": "i", "footerCopyright": "c",
                        "theme": {"beige": "#000", "brown": "#111", "text": "#222", "accent": "#333"}},
            "adsense": {"homeEnabled": false, "aboutEnabled": true, "booksEnabled": true, "scriptCode": ""}
        }
    }"##;

    #[test]
    fn test_legacy_document_upgrades() {
        let (content, from) = decode_document(LEGACY).unwrap();
        assert_eq!(from, Some(0));
        assert_eq!(content.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(content.home.hero_text, "Hi");
        assert_eq!(content.books[0].price, Price::from_cents(299).unwrap());
        assert!(!content.settings.adsense.home_enabled);
        assert_eq!(content.settings.general.theme.text, "#222");
    }

    #[test]
    fn test_current_document_is_untouched() {
        let original = SiteContent::default_for_year(2025);
        let raw = serde_json::to_string(&original).unwrap();
        let (content, from) = decode_document(&raw).unwrap();
        assert_eq!(from, None);
        assert_eq!(content, original);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let (content, from) = decode_document(r#"{"books": []}"#).unwrap();
        assert_eq!(from, Some(0));
        assert!(content.books.is_empty());
        assert_eq!(content.settings.general.theme.beige, "#F5F5DC");
        assert_eq!(content.home.button_link, "/books");
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = decode_document(r#"{"schemaVersion": 99}"#).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn test_duplicate_book_ids_rejected() {
        let raw = r#"{"books": [{"id": "b1", "title": "One"}, {"id": "b2"}, {"id": "b1", "title": "Copy"}]}"#;
        let err = decode_document(raw).unwrap_err();
        assert!(matches!(&err, MigrationError::DuplicateBookId(id) if id.as_str() == "b1"));
        assert!(err.preserves_stored());
        assert!(!MigrationError::NotAnObject.preserves_stored());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            decode_document("[1, 2]"),
            Err(MigrationError::NotAnObject)
        ));
        assert!(matches!(
            decode_document("{not json"),
            Err(MigrationError::Malformed(_))
        ));
    }
}
