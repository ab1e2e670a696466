//! Routes and the admin route guard.
//!
//! The guard runs before a view is built and answers with data: render the
//! requested route, or redirect elsewhere. Navigating is left to the caller.

use std::fmt;
use std::sync::Arc;

use soft_stories_core::{Page, SiteContent};

use crate::auth::Session;
use crate::store::LoadState;

/// Every view of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Books,
    AdminLogin,
    AdminDashboard,
}

impl Route {
    /// Resolve a location path. Hash-router paths (`#/about`) and trailing
    /// slashes are accepted. Returns `None` for unknown paths.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim();
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Self::Home),
            "/about" => Some(Self::About),
            "/books" => Some(Self::Books),
            "/admin" => Some(Self::AdminLogin),
            "/admin/dashboard" => Some(Self::AdminDashboard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Books => "/books",
            Self::AdminLogin => "/admin",
            Self::AdminDashboard => "/admin/dashboard",
        }
    }

    /// Whether viewing the route requires a logged-in admin.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        matches!(self, Self::AdminDashboard)
    }

    /// The public page behind the route, if it is one.
    #[must_use]
    pub const fn page(self) -> Option<Page> {
        match self {
            Self::Home => Some(Page::Home),
            Self::About => Some(Page::About),
            Self::Books => Some(Page::Books),
            Self::AdminLogin | Self::AdminDashboard => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What to do with a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

/// Decide whether `route` may be shown for `session`.
///
/// Protected routes redirect to the login page while logged out.
#[must_use]
pub fn guard(route: Route, session: &Session) -> RouteDecision {
    if route.is_protected() && !session.is_authenticated() {
        tracing::debug!(route = %route, "Redirecting unauthenticated visitor to login");
        RouteDecision::Redirect(Route::AdminLogin)
    } else {
        RouteDecision::Render(route)
    }
}

/// Where the login page sends the visitor.
#[must_use]
pub const fn after_login(session: &Session) -> Route {
    if session.is_authenticated() {
        Route::AdminDashboard
    } else {
        Route::AdminLogin
    }
}

/// What a page renders given the store's load state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// Content has not loaded; show a neutral placeholder.
    Loading,
    Ready {
        route: Route,
        content: Arc<SiteContent>,
    },
}

impl PageView {
    #[must_use]
    pub fn new(route: Route, state: LoadState<Arc<SiteContent>>) -> Self {
        match state {
            LoadState::Loading => Self::Loading,
            LoadState::Loaded(content) => Self::Ready { route, content },
        }
    }

    /// Ad snippet for this view, if it has one.
    #[must_use]
    pub fn ad_slot(&self) -> Option<&str> {
        match self {
            Self::Loading => None,
            Self::Ready { route, content } => ad_slot(*route, content),
        }
    }
}

/// The ad script to embed on `route`, when its page has ads enabled.
#[must_use]
pub fn ad_slot(route: Route, content: &SiteContent) -> Option<&str> {
    let page = route.page()?;
    let script = content.settings.adsense.script_code.as_str();
    (content.ads_enabled(page) && !script.trim().is_empty()).then_some(script)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::SessionState;

    fn session(state: SessionState) -> Session {
        Session {
            state,
            last_error: None,
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("#/"), Some(Route::Home));
        assert_eq!(Route::from_path("#/about"), Some(Route::About));
        assert_eq!(Route::from_path("/books/"), Some(Route::Books));
        assert_eq!(Route::from_path("/admin"), Some(Route::AdminLogin));
        assert_eq!(
            Route::from_path("#/admin/dashboard/"),
            Some(Route::AdminDashboard)
        );
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_path_roundtrip() {
        for route in [
            Route::Home,
            Route::About,
            Route::Books,
            Route::AdminLogin,
            Route::AdminDashboard,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_guard_redirects_dashboard_when_logged_out() {
        let anon = session(SessionState::Unauthenticated);
        assert_eq!(
            guard(Route::AdminDashboard, &anon),
            RouteDecision::Redirect(Route::AdminLogin)
        );
        assert_eq!(
            guard(Route::AdminLogin, &anon),
            RouteDecision::Render(Route::AdminLogin)
        );
        assert_eq!(guard(Route::Books, &anon), RouteDecision::Render(Route::Books));
    }

    #[test]
    fn test_guard_renders_dashboard_when_logged_in() {
        let admin = session(SessionState::Authenticated);
        assert_eq!(
            guard(Route::AdminDashboard, &admin),
            RouteDecision::Render(Route::AdminDashboard)
        );
        assert_eq!(after_login(&admin), Route::AdminDashboard);
        assert_eq!(
            after_login(&session(SessionState::Unauthenticated)),
            Route::AdminLogin
        );
    }

    #[test]
    fn test_ad_slot_follows_page_flags() {
        let mut content = SiteContent::default();
        content.settings.adsense.script_code = "<script>ads()</script>".to_string();
        content.settings.adsense.about_enabled = false;

        assert_eq!(
            ad_slot(Route::Home, &content),
            Some("<script>ads()</script>")
        );
        assert_eq!(ad_slot(Route::About, &content), None);
        assert_eq!(ad_slot(Route::AdminDashboard, &content), None);

        content.settings.adsense.script_code = "  ".to_string();
        assert_eq!(ad_slot(Route::Home, &content), None);
    }

    #[test]
    fn test_page_view_loading() {
        let view = PageView::new(Route::Home, LoadState::Loading);
        assert_eq!(view, PageView::Loading);
        assert_eq!(view.ad_slot(), None);

        let content = Arc::new(SiteContent::default());
        let view = PageView::new(Route::Books, LoadState::Loaded(Arc::clone(&content)));
        assert!(matches!(view, PageView::Ready { route: Route::Books, .. }));
    }
}
