//! Integration tests for Soft Stories.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p soft-stories-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cross_context` - Several tabs sharing one origin storage
//! - `persistence` - Reload round-trips, legacy documents, file storage
//! - `login` - Admin session gate and route guard
//! - `books` - Book operations through the update gateway
//!
//! This library holds the fixtures the test files share.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use soft_stories_cms::SiteConfig;
use soft_stories_cms::auth::IdentityConfig;
use soft_stories_cms::storage::OriginStorage;
use soft_stories_cms::store::CONTENT_KEY;
use soft_stories_core::{Book, BookId, Email, Price, SiteContent};

/// The admin identity used by the fixtures.
pub const ADMIN: &str = "admin@site.com";

/// Config with login fully set up for [`ADMIN`].
///
/// # Panics
///
/// Never; [`ADMIN`] is a valid email.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn admin_config() -> SiteConfig {
    SiteConfig {
        identity: IdentityConfig::new(
            Some(Email::parse(ADMIN).unwrap()),
            Some("test-client.apps.googleusercontent.com".to_string()),
        ),
        ..SiteConfig::default()
    }
}

/// An unsigned provider credential claiming `email`.
#[must_use]
pub fn credential(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({
            "iss": "https://accounts.google.com",
            "sub": "1000",
            "email": email,
            "email_verified": true,
            "name": "Test User",
        })
        .to_string(),
    );
    format!("{header}.{payload}.signature")
}

/// A book with a fixed price.
///
/// # Panics
///
/// Never; the price is non-negative.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn book(id: &str, title: &str) -> Book {
    Book {
        title: title.to_owned(),
        description: format!("About {title}"),
        price: Price::from_cents(299).unwrap(),
        ..Book::template(BookId::new(id))
    }
}

/// In-memory origin storage already holding `content`.
///
/// # Panics
///
/// If the content cannot be serialised.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn origin_with(content: &SiteContent) -> OriginStorage {
    let origin = OriginStorage::in_memory();
    origin
        .attach()
        .set_item(CONTENT_KEY, &serde_json::to_string(content).unwrap())
        .unwrap();
    origin
}

/// Default content with `books` instead of the built-in catalogue.
#[must_use]
pub fn content_with_books(books: Vec<Book>) -> SiteContent {
    SiteContent {
        books,
        ..SiteContent::default()
    }
}
