//! Admin login commands.
//!
//! # Usage
//!
//! ```bash
//! ADMIN_EMAIL=admin@site.com GOOGLE_CLIENT_ID=... ss-cli auth check "$TOKEN"
//! ```

use soft_stories_cms::SiteConfig;
use soft_stories_cms::auth::{AuthError, AuthGate, IdentityClaims, NoopProvider};
use soft_stories_cms::storage::SessionStorage;

use super::CommandError;

/// Check whether `token` would be let into the admin dashboard.
///
/// Runs the same gate a browser tab uses, against a throwaway session.
///
/// # Errors
///
/// Returns `CommandError` with the gate's verdict if the login would fail.
#[allow(clippy::print_stdout)]
pub fn check(config: &SiteConfig, token: &str) -> Result<(), CommandError> {
    let mut gate = AuthGate::new(config.identity.clone(), SessionStorage::new(), NoopProvider);

    if let Err(e) = gate.login_with_credential(token) {
        tracing::warn!(reason = e.user_message(), "Credential rejected");
        return Err(e.into());
    }

    let claims = IdentityClaims::decode(token).map_err(AuthError::from)?;
    println!(
        "Access granted: {}{}",
        claims.email,
        claims.name.map(|n| format!(" ({n})")).unwrap_or_default()
    );
    Ok(())
}
