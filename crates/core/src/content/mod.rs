//! The site content aggregate.
//!
//! [`SiteContent`] is the single document holding everything the public
//! pages render: home and about copy, the ordered book list, and settings
//! (navigation labels, footer, theme palette, ad placement).
//!
//! Field names serialise in camelCase so documents written by the legacy
//! site load without translation.

mod defaults;
mod schema;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{BookId, Price};

pub use schema::{CURRENT_SCHEMA_VERSION, MigrationError, decode_document};

/// The full editable site content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    /// Version of the document layout. Absent in legacy documents.
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub home: HomeContent,
    #[serde(default)]
    pub about: AboutContent,
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub settings: Settings,
}

impl SiteContent {
    /// Find a book by id.
    #[must_use]
    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    /// Mutable lookup used by editors working on a draft copy.
    pub fn book_mut(&mut self, id: &BookId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| &b.id == id)
    }

    /// Whether ads should render on `page`.
    #[must_use]
    pub const fn ads_enabled(&self, page: Page) -> bool {
        let ads = &self.settings.adsense;
        match page {
            Page::Home => ads.home_enabled,
            Page::About => ads.about_enabled,
            Page::Books => ads.books_enabled,
        }
    }
}

/// Public pages that can carry an ad slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Books,
}

/// Home page copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeContent {
    pub hero_text: String,
    pub tagline: String,
    pub support_writer_text: String,
    pub button_text: String,
    pub button_link: String,
}

/// About page copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub bio: String,
    /// URL or `data:` URI.
    pub image_url: String,
    pub purpose_text: String,
}

/// A book listed on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Price,
    /// URL or `data:` URI.
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub purchase_links: PurchaseLinks,
}

impl Book {
    /// An empty book carrying only its id, ready for editing.
    #[must_use]
    pub fn template(id: BookId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            price: Price::ZERO,
            cover_image: String::new(),
            purchase_links: PurchaseLinks::default(),
        }
    }
}

/// Where a book can be bought.
///
/// The three storefronts the site ships with have their own fields; any
/// other platform lands in `other`. Empty URLs mean "not sold there".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PurchaseLinks {
    pub amazon: String,
    pub gumroad: String,
    pub etsy: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl PurchaseLinks {
    /// Non-empty `(platform, url)` pairs in display order.
    pub fn available(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            ("amazon", self.amazon.as_str()),
            ("gumroad", self.gumroad.as_str()),
            ("etsy", self.etsy.as_str()),
        ]
        .into_iter()
        .chain(self.other.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .filter(|(_, url)| !url.trim().is_empty())
    }

    /// Set the link for `platform`, routing the built-in names to their fields.
    pub fn set(&mut self, platform: &str, url: impl Into<String>) {
        let url = url.into();
        match platform {
            "amazon" => self.amazon = url,
            "gumroad" => self.gumroad = url,
            "etsy" => self.etsy = url,
            other => {
                self.other.insert(other.to_owned(), url);
            }
        }
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub adsense: AdSettings,
}

/// Branding, navigation and footer strings plus the theme palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    /// Text or `data:` URI.
    pub site_logo: String,
    pub nav_home: String,
    pub nav_about: String,
    pub nav_books: String,
    pub footer_instagram_link: String,
    pub footer_copyright: String,
    pub theme: Theme,
}

/// The four-colour palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub beige: String,
    pub brown: String,
    pub text: String,
    pub accent: String,
}

/// Ad placement per page and the raw ad script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdSettings {
    pub home_enabled: bool,
    pub about_enabled: bool,
    pub books_enabled: bool,
    pub script_code: String,
}
