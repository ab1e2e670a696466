//! The content store.
//!
//! Each context owns one [`ContentStore`]. It holds the in-memory
//! [`SiteContent`], is the only writer of [`CONTENT_KEY`] in origin storage,
//! and follows writes made by other contexts through its storage
//! subscription.
//!
//! Consistency across contexts is last-writer-wins: whichever context wrote
//! the key most recently defines what every other context converges to on
//! its next sync. There is no merge.

use std::sync::Arc;

use soft_stories_core::{SiteContent, decode_document};

use crate::storage::{ContextId, Notification, StorageArea, StorageError, Subscription};
use crate::theme::ThemeVariables;

/// Origin storage key holding the serialised content document.
pub const CONTENT_KEY: &str = "websiteData";

/// Whether content is available yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The first load has not completed. Pages show a neutral placeholder.
    Loading,
    Loaded(T),
}

impl<T> LoadState<T> {
    /// The loaded value, if any.
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loading => None,
            Self::Loaded(value) => Some(value),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Outcome of persisting a write.
///
/// The in-memory content is replaced in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Persisted,
    /// Storage rejected the write. Memory and storage now differ until the
    /// next successful write.
    Diverged(StorageError),
}

impl Persistence {
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// In-memory content for one context, synchronised with origin storage.
#[derive(Debug)]
pub struct ContentStore {
    area: StorageArea,
    subscription: Subscription,
    content: Option<Arc<SiteContent>>,
    theme: ThemeVariables,
    read_only: bool,
}

impl ContentStore {
    /// Create a store for the context behind `area`. Nothing is loaded yet.
    ///
    /// The subscription starts here, so changes made by other contexts
    /// before [`initialize`](Self::initialize) are not lost.
    #[must_use]
    pub fn new(area: StorageArea) -> Self {
        let subscription = area.subscribe();
        Self {
            area,
            subscription,
            content: None,
            theme: ThemeVariables::default(),
            read_only: false,
        }
    }

    /// Load content from storage, seeding the defaults on first run.
    ///
    /// Never fails: unreadable or unsupported documents are logged and the
    /// defaults are used in memory without overwriting what is stored. A
    /// document written by a newer build, or one listing a book id twice,
    /// also makes the store [read-only](Self::is_read_only). Legacy
    /// documents are upgraded and written back. Once loaded, further calls
    /// return the current content.
    pub fn initialize(&mut self) -> Arc<SiteContent> {
        if let Some(content) = &self.content {
            return Arc::clone(content);
        }
        let content = self.load_or_seed();
        self.install(content)
    }

    fn load_or_seed(&mut self) -> SiteContent {
        match self.area.get_item(CONTENT_KEY) {
            Ok(Some(raw)) => match decode_document(&raw) {
                Ok((content, None)) => content,
                Ok((content, Some(from))) => {
                    tracing::info!(
                        from,
                        to = content.schema_version,
                        "Upgraded stored content document"
                    );
                    let _ = self.persist(&content);
                    content
                }
                Err(e) if e.preserves_stored() => {
                    tracing::error!(error = %e, "Stored content cannot be edited by this build, using defaults read-only");
                    self.read_only = true;
                    SiteContent::default()
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load content from storage, using defaults");
                    SiteContent::default()
                }
            },
            Ok(None) => {
                tracing::info!("No stored content, seeding defaults");
                let content = SiteContent::default();
                let _ = self.persist(&content);
                content
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read content from storage, using defaults");
                SiteContent::default()
            }
        }
    }

    /// The current content, or `Loading` before the first load.
    #[must_use]
    pub fn read(&self) -> LoadState<Arc<SiteContent>> {
        self.content
            .as_ref()
            .map_or(LoadState::Loading, |c| LoadState::Loaded(Arc::clone(c)))
    }

    /// Whether the stored document must not be replaced.
    ///
    /// True while the stored document was written by a newer build or lists
    /// a book id twice. Cleared when another context stores a document this
    /// build reads.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Replace the content and persist it.
    ///
    /// Callers editing content go through the gateway, which refuses while
    /// the store [is read-only](Self::is_read_only).
    ///
    /// The new content becomes current even if persisting fails; the
    /// failure is logged and returned as [`Persistence::Diverged`].
    pub fn write(&mut self, content: SiteContent) -> Persistence {
        let persistence = self.persist(&content);
        self.install(content);
        persistence
    }

    /// Apply changes other contexts have made since the last sync.
    ///
    /// Returns the number of changes applied.
    pub fn sync_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(note) = self.subscription.try_next() {
            if self.apply(note) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until another context changes the content, apply it, and
    /// return the new content.
    ///
    /// Returns `None` once origin storage is
    /// [closed](crate::storage::OriginStorage::close).
    pub async fn next_remote_change(&mut self) -> Option<Arc<SiteContent>> {
        loop {
            let note = self.subscription.next().await?;
            if self.apply(note) {
                return self.content.clone();
            }
        }
    }

    /// CSS variables projected from the current theme.
    #[must_use]
    pub const fn theme(&self) -> &ThemeVariables {
        &self.theme
    }

    /// The context this store belongs to.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.area.context()
    }

    fn apply(&mut self, note: Notification) -> bool {
        match note {
            Notification::Changed(event) => {
                if event.key != CONTENT_KEY {
                    return false;
                }
                if event.new_value.is_none() {
                    tracing::debug!(source = %event.source, "Content key removed elsewhere, keeping local copy");
                    return false;
                }
                // Later writes may already be stored; converge on the stored
                // value rather than the event's snapshot.
                self.reload(event.source)
            }
            Notification::Missed(count) => {
                tracing::warn!(count, "Missed content notifications, reloading from storage");
                self.reload(self.context())
            }
        }
    }

    fn reload(&mut self, source: ContextId) -> bool {
        let raw = match self.area.get_item(CONTENT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                tracing::error!(%source, error = %e, "Failed to reload content from storage");
                return false;
            }
        };

        match decode_document(&raw) {
            Ok((content, _)) => {
                if self.read_only {
                    tracing::info!(%source, "Stored content is readable again, edits re-enabled");
                    self.read_only = false;
                }
                if self.content.as_deref() == Some(&content) {
                    return false;
                }
                tracing::debug!(%source, "Applied content change from another context");
                self.install(content);
                true
            }
            Err(e) if e.preserves_stored() => {
                tracing::error!(%source, error = %e, "Stored content cannot be edited by this build, edits disabled");
                self.read_only = true;
                false
            }
            Err(e) => {
                tracing::error!(%source, error = %e, "Failed to parse updated content from storage");
                false
            }
        }
    }

    fn install(&mut self, content: SiteContent) -> Arc<SiteContent> {
        self.theme = ThemeVariables::project(&content.settings.general.theme);
        let content = Arc::new(content);
        self.content = Some(Arc::clone(&content));
        content
    }

    fn persist(&self, content: &SiteContent) -> Persistence {
        let raw = match serde_json::to_string(content) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize content");
                return Persistence::Diverged(StorageError::Serialization(e.to_string()));
            }
        };

        match self.area.set_item(CONTENT_KEY, &raw) {
            Ok(()) => Persistence::Persisted,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save content to storage");
                Persistence::Diverged(e)
            }
        }
    }
}
