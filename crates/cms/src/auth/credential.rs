//! Decoding the identity claims carried by a provider credential.
//!
//! The credential is a JWT issued by the identity provider's sign-in widget.
//! Only the payload segment is read. The signature is not checked: the
//! widget is trusted to have produced the token.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

/// Errors decoding a credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The token does not have the `header.payload.signature` shape.
    #[error("credential is not a JWT")]
    Malformed,

    /// The payload segment is not valid base64url.
    #[error("credential payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    /// The payload is not the expected JSON claims object.
    #[error("credential claims are invalid: {0}")]
    Claims(#[from] serde_json::Error),
}

/// Claims read from the credential payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaims {
    /// The claimed email address, compared verbatim with the admin identity.
    pub email: String,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
}

impl IdentityClaims {
    /// Decode the claims of `token`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the token is not a three-part JWT or its
    /// payload cannot be decoded into claims.
    pub fn decode(token: &str) -> Result<Self, CredentialError> {
        let mut parts = token.trim().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CredentialError::Malformed);
        };

        let payload = payload.trim_end_matches('=');
        if payload.is_empty() {
            return Err(CredentialError::Malformed);
        }

        let bytes = URL_SAFE_NO_PAD.decode(payload)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
