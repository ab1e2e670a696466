//! Admin session gate.
//!
//! A context starts logged out. Presenting a provider credential whose email
//! claim equals the configured admin identity logs it in; logging out or
//! presenting someone else's credential logs it out again. The logged-in flag
//! lives in session storage, so it survives a reload of the same tab and is
//! never visible to other tabs.
//!
//! This gate controls what the dashboard shows. It is not a security
//! boundary: anyone with access to the browser's storage can set the flag.

mod credential;
mod error;

pub use credential::{CredentialError, IdentityClaims};
pub use error::{AuthError, ProviderError};

use std::fmt;

use soft_stories_core::Email;

use crate::storage::SessionStorage;

/// Session storage keys for admin authentication.
pub mod keys {
    /// Set to `"true"` while the tab is logged in.
    pub const IS_ADMIN_AUTHENTICATED: &str = "isAdminAuthenticated";
}

/// Identity settings the gate checks credentials against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityConfig {
    /// The only identity allowed into the dashboard.
    pub admin_email: Option<Email>,
    /// Client id of the identity provider's sign-in widget.
    pub client_id: Option<String>,
}

impl IdentityConfig {
    /// Build a config, treating a blank client id as absent.
    #[must_use]
    pub fn new(admin_email: Option<Email>, client_id: Option<String>) -> Self {
        Self {
            admin_email,
            client_id: client_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Whether both the admin identity and the client id are present.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.admin_email.is_some() && self.client_id.is_some()
    }
}

/// Whether the context is logged in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Snapshot of the gate, as the views see it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: SessionState,
    /// Message from the most recent failed login, cleared on success.
    pub last_error: Option<String>,
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated)
    }
}

/// Client-side session of the identity provider.
pub trait IdentityProvider: fmt::Debug + Send + Sync {
    /// End the provider's own session, e.g. disable automatic re-selection
    /// of the account.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the provider is unavailable.
    fn sign_out(&self) -> Result<(), ProviderError>;
}

/// Provider for contexts that have no provider session to end.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProvider;

impl IdentityProvider for NoopProvider {
    fn sign_out(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// The admin session gate of one context.
#[derive(Debug)]
pub struct AuthGate {
    identity: IdentityConfig,
    marker: SessionStorage,
    provider: Box<dyn IdentityProvider>,
    session: Session,
}

impl AuthGate {
    /// Create the gate, restoring a login made earlier in the same tab.
    #[must_use]
    pub fn new(
        identity: IdentityConfig,
        marker: SessionStorage,
        provider: impl IdentityProvider + 'static,
    ) -> Self {
        let restored = match marker.get_item(keys::IS_ADMIN_AUTHENTICATED) {
            Ok(flag) => flag.as_deref() == Some("true"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session marker");
                false
            }
        };

        let state = if restored {
            tracing::debug!("Restored admin session from session marker");
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };

        Self {
            identity,
            marker,
            provider: Box::new(provider),
            session: Session {
                state,
                last_error: None,
            },
        }
    }

    /// Whether login can succeed at all.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.identity.is_configured()
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in with a credential from the identity provider.
    ///
    /// On failure the session's `last_error` holds the message to show.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotConfigured` if [`is_configured`](Self::is_configured)
    ///   is false, whatever the credential.
    /// - `AuthError::Decode` if the credential is malformed.
    /// - `AuthError::AccessDenied` if it names anyone but the admin. Any
    ///   earlier login of this tab is revoked.
    pub fn login_with_credential(&mut self, token: &str) -> Result<(), AuthError> {
        match self.verify(token) {
            Ok(claims) => {
                self.session.state = SessionState::Authenticated;
                self.session.last_error = None;
                if let Err(e) = self.marker.set_item(keys::IS_ADMIN_AUTHENTICATED, "true") {
                    tracing::warn!(error = %e, "Failed to set session marker");
                }
                tracing::info!(email = %claims.email, "Admin logged in");
                Ok(())
            }
            Err(e) => {
                match &e {
                    AuthError::AccessDenied { email } => {
                        tracing::warn!(%email, "Login attempt by unauthorised account");
                        self.revoke();
                    }
                    AuthError::NotConfigured => {
                        tracing::warn!("Login attempted but admin login is not configured");
                    }
                    AuthError::Decode(err) => {
                        tracing::error!(error = %err, "Failed to decode credential");
                    }
                }
                self.session.last_error = Some(e.user_message().to_owned());
                Err(e)
            }
        }
    }

    /// Log out. Never fails; a provider that cannot be reached is logged.
    pub fn logout(&mut self) {
        self.revoke();
        self.session.last_error = None;
        if let Err(e) = self.provider.sign_out() {
            tracing::warn!(error = %e, "Failed to end identity provider session");
        }
        tracing::info!("Admin logged out");
    }

    fn verify(&self, token: &str) -> Result<IdentityClaims, AuthError> {
        let admin = match &self.identity.admin_email {
            Some(admin) if self.identity.is_configured() => admin,
            _ => return Err(AuthError::NotConfigured),
        };

        let claims = IdentityClaims::decode(token)?;
        if !admin.matches_claim(&claims.email) {
            return Err(AuthError::AccessDenied {
                email: claims.email,
            });
        }
        Ok(claims)
    }

    fn revoke(&mut self) {
        self.session.state = SessionState::Unauthenticated;
        if let Err(e) = self.marker.remove_item(keys::IS_ADMIN_AUTHENTICATED) {
            tracing::warn!(error = %e, "Failed to clear session marker");
        }
    }
}
