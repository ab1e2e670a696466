//! Admin login error types.

use thiserror::Error;

use super::credential::CredentialError;

/// Errors that can occur while logging in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The admin identity or the provider client id is missing.
    #[error("admin login is not configured")]
    NotConfigured,

    /// The credential could not be decoded.
    #[error("failed to decode credential: {0}")]
    Decode(#[from] CredentialError),

    /// The credential is valid but names someone other than the admin.
    #[error("access denied for {email}")]
    AccessDenied { email: String },
}

impl AuthError {
    /// Message shown to the person trying to log in.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotConfigured => {
                "Admin login is not configured. Please set GOOGLE_CLIENT_ID and ADMIN_EMAIL environment variables."
            }
            Self::Decode(_) => "An error occurred during authentication.",
            Self::AccessDenied { .. } => {
                "Access Denied: This Google account is not authorized for admin access."
            }
        }
    }
}

/// Failure reported by the identity provider when ending its session.
#[derive(Debug, Error)]
#[error("identity provider error: {0}")]
pub struct ProviderError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_do_not_leak_details() {
        let denied = AuthError::AccessDenied {
            email: "x@y.com".to_string(),
        };
        assert!(!denied.user_message().contains("x@y.com"));
        assert!(denied.to_string().contains("x@y.com"));

        assert!(
            AuthError::NotConfigured
                .user_message()
                .contains("ADMIN_EMAIL")
        );
    }
}
