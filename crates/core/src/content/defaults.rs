//! Built-in content used on first run and for fields missing from stored
//! documents.

use chrono::Datelike;

use super::{
    AboutContent, AdSettings, Book, GeneralSettings, HomeContent, PurchaseLinks, Settings,
    SiteContent, Theme,
};
use crate::content::schema::CURRENT_SCHEMA_VERSION;
use crate::types::{BookId, Price};

impl SiteContent {
    /// The content a fresh site starts with, stamped with the current year.
    #[must_use]
    pub fn default_for_year(year: i32) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            home: HomeContent::default(),
            about: AboutContent::default(),
            books: vec![Book {
                id: BookId::from("windows-of-change-1"),
                title: "Windows of Change".to_string(),
                description: "A 44-page emotional and reflective short story about healing, \
                              growth, resilience, and gentle transformation—told through the \
                              metaphor of windows and everyday moments."
                    .to_string(),
                price: Price::from_cents(299).unwrap_or(Price::ZERO),
                cover_image: "https://picsum.photos/seed/book1/400/600".to_string(),
                purchase_links: PurchaseLinks {
                    amazon: "https://amazon.com".to_string(),
                    gumroad: "https://gumroad.com".to_string(),
                    etsy: "https://etsy.com".to_string(),
                    other: std::collections::BTreeMap::new(),
                },
            }],
            settings: Settings {
                general: GeneralSettings::for_year(year),
                adsense: AdSettings::default(),
            },
        }
    }
}

impl Default for SiteContent {
    fn default() -> Self {
        Self::default_for_year(current_year())
    }
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            hero_text: "To the ones who feel too much —".to_string(),
            tagline: "you're not alone. Stories can heal, gently.".to_string(),
            support_writer_text: "Your support helps a new writer continue to create stories \
                                  that touch the heart. Every book purchased is a step towards \
                                  another story being told."
                .to_string(),
            button_text: "Explore Books".to_string(),
            button_link: "/books".to_string(),
        }
    }
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            bio: "Vicky Aran is a writer of soft, emotional stories. She finds magic in the \
                  quiet moments and believes in the healing power of words. Her writing is a \
                  gentle embrace for the overthinkers and the dreamers, a reminder that \
                  vulnerability is a strength."
                .to_string(),
            image_url: "https://picsum.photos/seed/vicky/400/500".to_string(),
            purpose_text: "I write because I believe stories are medicine. They allow us to \
                           step into another's shoes, to feel seen in our own quiet struggles, \
                           and to find hope in the gentle unfolding of a narrative. My purpose \
                           is to create a soft space for readers to land, to reflect, and to heal."
                .to_string(),
        }
    }
}

impl GeneralSettings {
    fn for_year(year: i32) -> Self {
        Self {
            site_logo: "Soft Stories by Vicky".to_string(),
            nav_home: "Home".to_string(),
            nav_about: "About".to_string(),
            nav_books: "Books".to_string(),
            footer_instagram_link: "https://www.instagram.com/softstoriesbyvicky?igsh=d2duejRnejlsN3hm"
                    .to_string(),
            footer_copyright: format!("© {year} Vicky Aran. All Rights Reserved."),
            theme: Theme::default(),
        }
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self::for_year(current_year())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            beige: "#F5F5DC".to_string(),
            brown: "#A0522D".to_string(),
            text: "#5D4037".to_string(),
            accent: "#D2B48C".to_string(),
        }
    }
}

impl Default for AdSettings {
    fn default() -> Self {
        Self {
            home_enabled: true,
            about_enabled: true,
            books_enabled: true,
            script_code: "<!-- Google AdSense: Insert your AdSense script here -->".to_string(),
        }
    }
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_one_book() {
        let content = SiteContent::default_for_year(2025);
        assert_eq!(content.books.len(), 1);
        assert_eq!(content.books[0].title, "Windows of Change");
        assert_eq!(content.books[0].price.display(), "$2.99");
    }

    #[test]
    fn test_site_copy_matches_published_text() {
        let content = SiteContent::default_for_year(2025);
        assert_eq!(content.home.hero_text, "To the ones who feel too much —");
        assert!(
            content.books[0]
                .description
                .contains("gentle transformation—told through the metaphor")
        );
        assert_eq!(
            content.settings.general.footer_instagram_link,
            "https://www.instagram.com/softstoriesbyvicky?igsh=d2duejRnejlsN3hm"
        );
    }

    #[test]
    fn test_copyright_uses_year() {
        let content = SiteContent::default_for_year(2031);
        assert_eq!(
            content.settings.general.footer_copyright,
            "© 2031 Vicky Aran. All Rights Reserved."
        );
    }

    #[test]
    fn test_default_palette() {
        let theme = Theme::default();
        assert_eq!(theme.beige, "#F5F5DC");
        assert_eq!(theme.accent, "#D2B48C");
    }

    #[test]
    fn test_default_is_current_schema() {
        assert_eq!(
            SiteContent::default_for_year(2025).schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }
}
