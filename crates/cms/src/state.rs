//! Per-context service object.
//!
//! A [`SiteContext`] is what one open tab holds: its content store, attached
//! to the shared origin storage, and its admin session gate. Views get at
//! content and login state only through it.

use crate::auth::{AuthGate, IdentityProvider};
use crate::config::SiteConfig;
use crate::gateway::ContentGateway;
use crate::routes::{PageView, Route, RouteDecision, guard};
use crate::storage::{ContextId, OriginStorage, SessionStorage};
use crate::store::ContentStore;

/// Outcome of resolving a navigation in a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show this view.
    Render(PageView),
    /// Navigate here instead.
    Redirect(Route),
}

/// One open context of the site.
#[derive(Debug)]
pub struct SiteContext {
    store: ContentStore,
    auth: AuthGate,
    session: SessionStorage,
}

impl SiteContext {
    /// Open a new context with fresh session storage, as a new tab does.
    #[must_use]
    pub fn open(
        origin: &OriginStorage,
        config: &SiteConfig,
        provider: impl IdentityProvider + 'static,
    ) -> Self {
        Self::open_with_session(origin, SessionStorage::new(), config, provider)
    }

    /// Open a context that continues `session`, as reloading a tab does.
    #[must_use]
    pub fn open_with_session(
        origin: &OriginStorage,
        session: SessionStorage,
        config: &SiteConfig,
        provider: impl IdentityProvider + 'static,
    ) -> Self {
        let mut store = ContentStore::new(origin.attach());
        store.initialize();
        let auth = AuthGate::new(config.identity.clone(), session.clone(), provider);

        tracing::info!(
            context = %store.context(),
            authenticated = auth.is_authenticated(),
            login_configured = auth.is_configured(),
            "Opened site context"
        );

        Self {
            store,
            auth,
            session,
        }
    }

    /// Close the context. Its subscription to other contexts' changes ends
    /// here; session storage survives in any clone held by the caller.
    pub fn close(self) {
        tracing::info!(context = %self.store.context(), "Closed site context");
    }

    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.store.context()
    }

    #[must_use]
    pub const fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Write access to content.
    pub const fn gateway(&mut self) -> ContentGateway<'_> {
        ContentGateway::new(&mut self.store)
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthGate {
        &mut self.auth
    }

    /// This context's session storage, for reopening it after a reload.
    #[must_use]
    pub fn session_storage(&self) -> SessionStorage {
        self.session.clone()
    }

    /// Apply pending changes from other contexts. See
    /// [`ContentStore::sync_pending`].
    pub fn sync(&mut self) -> usize {
        self.store.sync_pending()
    }

    /// Decide what to show for `route`: the guard runs first, then the
    /// store's load state picks between the placeholder and the page.
    #[must_use]
    pub fn resolve(&self, route: Route) -> Resolution {
        match guard(route, self.auth.session()) {
            RouteDecision::Redirect(to) => Resolution::Redirect(to),
            RouteDecision::Render(route) => {
                Resolution::Render(PageView::new(route, self.store.read()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use soft_stories_core::Email;

    use super::*;
    use crate::auth::{IdentityConfig, NoopProvider};

    fn config() -> SiteConfig {
        SiteConfig {
            identity: IdentityConfig::new(
                Some(Email::parse("admin@site.com").unwrap()),
                Some("client".to_string()),
            ),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_open_loads_content() {
        let origin = OriginStorage::in_memory();
        let ctx = SiteContext::open(&origin, &config(), NoopProvider);
        assert!(!ctx.store().read().is_loading());
        assert!(!ctx.auth().is_authenticated());
    }

    #[test]
    fn test_resolve_guards_dashboard() {
        let origin = OriginStorage::in_memory();
        let ctx = SiteContext::open(&origin, &config(), NoopProvider);

        assert_eq!(
            ctx.resolve(Route::AdminDashboard),
            Resolution::Redirect(Route::AdminLogin)
        );
        assert!(matches!(
            ctx.resolve(Route::Home),
            Resolution::Render(PageView::Ready {
                route: Route::Home,
                ..
            })
        ));
    }

    #[test]
    fn test_gateway_writes_are_seen_after_sync() {
        let origin = OriginStorage::in_memory();
        let mut tab_a = SiteContext::open(&origin, &config(), NoopProvider);
        let mut tab_b = SiteContext::open(&origin, &config(), NoopProvider);
        tab_a.sync();

        tab_a
            .gateway()
            .edit_home(|home| home.tagline = "shared".to_string())
            .unwrap();

        assert_eq!(tab_b.sync(), 1);
        assert_eq!(
            tab_b.store().read().loaded().unwrap().home.tagline,
            "shared"
        );
        tab_a.close();
        tab_b.close();
    }
}
