//! The update gateway: the only way editing surfaces change content.
//!
//! Every edit runs against a private copy of the current content. The copy
//! replaces the live content only after the edit returns successfully, so a
//! failing edit leaves nothing half-applied.

use std::convert::Infallible;

use soft_stories_core::{
    AboutContent, AdSettings, Book, BookId, GeneralSettings, HomeContent, SiteContent, Theme,
};

use crate::store::{ContentStore, LoadState, Persistence};

/// Errors from gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The store has not completed its first load.
    #[error("content has not loaded yet")]
    NotLoaded,
    /// No book has the given id.
    #[error("book not found: {0}")]
    BookNotFound(BookId),
    /// The edit refused to apply.
    #[error("edit rejected: {0}")]
    Rejected(String),
    /// The stored document cannot be edited by this build and must not be
    /// replaced.
    #[error("stored content cannot be edited by this version and is read-only")]
    ReadOnly,
}

impl From<Infallible> for GatewayError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Field an embedded image can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    BookCover(BookId),
    AboutPortrait,
    SiteLogo,
}

/// Write access to a [`ContentStore`].
///
/// Borrowing the store mutably for the gateway's lifetime keeps edits from
/// interleaving with other writes in the same context.
pub struct ContentGateway<'a> {
    store: &'a mut ContentStore,
}

impl<'a> ContentGateway<'a> {
    /// Create a gateway over `store`.
    #[must_use]
    pub const fn new(store: &'a mut ContentStore) -> Self {
        Self { store }
    }

    /// Apply `mutate` to a copy of the current content and write the result.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load,
    /// `GatewayError::ReadOnly` while the store
    /// [is read-only](ContentStore::is_read_only), or the mutator's error.
    /// The live content is unchanged in every case.
    pub fn update<F, E>(&mut self, mutate: F) -> Result<Persistence, GatewayError>
    where
        F: FnOnce(&mut SiteContent) -> Result<(), E>,
        E: Into<GatewayError>,
    {
        let LoadState::Loaded(current) = self.store.read() else {
            return Err(GatewayError::NotLoaded);
        };
        if self.store.is_read_only() {
            tracing::warn!("Edit refused, stored content is read-only");
            return Err(GatewayError::ReadOnly);
        }

        let mut draft = (*current).clone();
        mutate(&mut draft).map_err(Into::into)?;
        Ok(self.store.write(draft))
    }

    /// Apply an edit that cannot fail.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit<F>(&mut self, mutate: F) -> Result<Persistence, GatewayError>
    where
        F: FnOnce(&mut SiteContent),
    {
        self.update(|draft| {
            mutate(draft);
            Ok::<(), Infallible>(())
        })
    }

    /// Edit the home page copy.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit_home(
        &mut self,
        mutate: impl FnOnce(&mut HomeContent),
    ) -> Result<Persistence, GatewayError> {
        self.edit(|draft| mutate(&mut draft.home))
    }

    /// Edit the about page copy.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit_about(
        &mut self,
        mutate: impl FnOnce(&mut AboutContent),
    ) -> Result<Persistence, GatewayError> {
        self.edit(|draft| mutate(&mut draft.about))
    }

    /// Edit branding, navigation and footer settings.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit_general(
        &mut self,
        mutate: impl FnOnce(&mut GeneralSettings),
    ) -> Result<Persistence, GatewayError> {
        self.edit(|draft| mutate(&mut draft.settings.general))
    }

    /// Edit the theme palette.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit_theme(
        &mut self,
        mutate: impl FnOnce(&mut Theme),
    ) -> Result<Persistence, GatewayError> {
        self.edit(|draft| mutate(&mut draft.settings.general.theme))
    }

    /// Edit ad placement.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn edit_ads(
        &mut self,
        mutate: impl FnOnce(&mut AdSettings),
    ) -> Result<Persistence, GatewayError> {
        self.edit(|draft| mutate(&mut draft.settings.adsense))
    }

    /// Replace the book with the same id in place, or append it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load, or
    /// `GatewayError::Rejected` if the book has no id.
    pub fn save_book(&mut self, book: Book) -> Result<Persistence, GatewayError> {
        if book.id.is_empty() {
            return Err(GatewayError::Rejected("book id cannot be empty".to_string()));
        }

        self.edit(|draft| {
            if let Some(existing) = draft.book_mut(&book.id) {
                *existing = book;
            } else {
                draft.books.push(book);
            }
        })
    }

    /// Remove the book with `id`.
    ///
    /// Returns `None` without writing anything when no book has that id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn delete_book(&mut self, id: &BookId) -> Result<Option<Persistence>, GatewayError> {
        let LoadState::Loaded(current) = self.store.read() else {
            return Err(GatewayError::NotLoaded);
        };
        if current.book(id).is_none() {
            tracing::debug!(%id, "Delete requested for unknown book");
            return Ok(None);
        }

        self.edit(|draft| {
            if let Some(index) = draft.books.iter().position(|b| &b.id == id) {
                draft.books.remove(index);
            }
        })
        .map(Some)
    }

    /// A blank book with a fresh id, not yet saved.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn new_book_template(&self) -> Result<Book, GatewayError> {
        self.new_book_template_at(chrono::Utc::now().timestamp_millis())
    }

    /// A blank book whose id derives from `unix_millis`, advanced past any
    /// id already in use.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load.
    pub fn new_book_template_at(&self, unix_millis: i64) -> Result<Book, GatewayError> {
        let LoadState::Loaded(current) = self.store.read() else {
            return Err(GatewayError::NotLoaded);
        };

        let mut millis = unix_millis;
        let mut id = BookId::generated(millis);
        while current.book(&id).is_some() {
            millis += 1;
            id = BookId::generated(millis);
        }
        Ok(Book::template(id))
    }

    /// Assign an embedded image (a `data:` URI) to `target`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotLoaded` before the first load, or
    /// `GatewayError::BookNotFound` for an unknown book cover.
    pub fn set_image(
        &mut self,
        target: &ImageTarget,
        data_uri: impl Into<String>,
    ) -> Result<Persistence, GatewayError> {
        let data_uri = data_uri.into();
        self.update(|draft| {
            match target {
                ImageTarget::BookCover(id) => {
                    draft
                        .book_mut(id)
                        .ok_or_else(|| GatewayError::BookNotFound(id.clone()))?
                        .cover_image = data_uri;
                }
                ImageTarget::AboutPortrait => draft.about.image_url = data_uri,
                ImageTarget::SiteLogo => draft.settings.general.site_logo = data_uri,
            }
            Ok::<(), GatewayError>(())
        })
    }
}
