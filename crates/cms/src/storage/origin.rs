//! Origin-wide durable storage with change notifications.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};

use super::{MemoryBackend, StorageBackend, StorageError};

/// Buffered change events per subscriber before it is reported as lagging.
const EVENT_CAPACITY: usize = 64;

/// Identifies one context (tab) attached to an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// A change made to origin storage by some context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub old_value: Option<String>,
    /// `None` when the key was removed.
    pub new_value: Option<String>,
    /// The context that made the change.
    pub source: ContextId,
}

/// What a subscriber observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Another context changed a key.
    Changed(StorageEvent),
    /// This many events were dropped because the subscriber fell behind.
    /// Current values must be re-read from storage.
    Missed(u64),
}

/// Durable storage shared by all contexts of the site.
///
/// Cheap to clone; clones refer to the same backend and event channel.
#[derive(Clone)]
pub struct OriginStorage {
    inner: Arc<OriginInner>,
}

struct OriginInner {
    backend: Box<dyn StorageBackend>,
    events: broadcast::Sender<StorageEvent>,
    closed: watch::Sender<bool>,
    next_context: AtomicU64,
}

impl fmt::Debug for OriginStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginStorage")
            .field("subscribers", &self.inner.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl OriginStorage {
    /// Share `backend` as the durable storage of one origin.
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (closed, _) = watch::channel(false);
        Self {
            inner: Arc::new(OriginInner {
                backend: Box::new(backend),
                events,
                closed,
                next_context: AtomicU64::new(1),
            }),
        }
    }

    /// Origin storage held in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Attach a new context and return its view of the storage.
    #[must_use]
    pub fn attach(&self) -> StorageArea {
        let id = self.inner.next_context.fetch_add(1, Ordering::Relaxed);
        let context = ContextId(id);
        tracing::debug!(%context, "Context attached to origin storage");
        StorageArea {
            origin: self.clone(),
            context,
        }
    }

    /// Stop delivering change notifications.
    ///
    /// Every subscription, including ones waiting in
    /// [`Subscription::next`], reports the end of its stream. Storage stays
    /// readable and writable.
    pub fn close(&self) {
        if !self.inner.closed.send_replace(true) {
            tracing::debug!("Origin storage closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.inner.closed.borrow()
    }
}

/// One context's handle on [`OriginStorage`].
///
/// Writes made through an area are announced to every other context's
/// [`Subscription`], never to the writer's own.
#[derive(Debug, Clone)]
pub struct StorageArea {
    origin: OriginStorage,
    context: ContextId,
}

impl StorageArea {
    /// The context this area writes as.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.origin.inner.backend.get_item(key)
    }

    /// Write `value` under `key` and notify other contexts if it changed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write; no event is
    /// published in that case.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let backend = &self.origin.inner.backend;
        let old_value = backend.get_item(key).unwrap_or_else(|e| {
            tracing::debug!(key, error = %e, "Could not read previous value");
            None
        });
        backend.set_item(key, value)?;

        if old_value.as_deref() != Some(value) {
            self.publish(key, old_value, Some(value.to_owned()));
        }
        Ok(())
    }

    /// Remove `key` and notify other contexts if it existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let backend = &self.origin.inner.backend;
        let old_value = backend.get_item(key).unwrap_or(None);
        backend.remove_item(key)?;

        if old_value.is_some() {
            self.publish(key, old_value, None);
        }
        Ok(())
    }

    /// Start receiving changes made by other contexts.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.origin.inner.events.subscribe(),
            closed: self.origin.inner.closed.subscribe(),
            context: self.context,
        }
    }

    fn publish(&self, key: &str, old_value: Option<String>, new_value: Option<String>) {
        let event = StorageEvent {
            key: key.to_owned(),
            old_value,
            new_value,
            source: self.context,
        };
        // No receivers is normal when this is the only context.
        let _ = self.origin.inner.events.send(event);
    }
}

/// Receives storage changes made by other contexts.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<StorageEvent>,
    closed: watch::Receiver<bool>,
    context: ContextId,
}

impl Subscription {
    /// Next queued notification, without waiting.
    pub fn try_next(&mut self) -> Option<Notification> {
        if *self.closed.borrow() {
            return None;
        }
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.source == self.context => {}
                Ok(event) => return Some(Notification::Changed(event)),
                Err(TryRecvError::Lagged(n)) => return Some(Notification::Missed(n)),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once the origin has been closed with
    /// [`OriginStorage::close`] or dropped entirely.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            let received = tokio::select! {
                biased;
                _ = self.closed.wait_for(|closed| *closed) => return None,
                received = self.rx.recv() => received,
            };
            match received {
                Ok(event) if event.source == self.context => {}
                Ok(event) => return Some(Notification::Changed(event)),
                Err(RecvError::Lagged(n)) => return Some(Notification::Missed(n)),
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
