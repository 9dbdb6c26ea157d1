//! Drives the OAuth token lifecycle.
//!
//! The `oauth` field of the record is the whole state machine: an empty token means *unauthenticated*, a token with
//! an access token means *authenticated*. Exchanging a code or renewing a token replaces the field with Square's
//! response; revoking clears it.
use std::fmt::Debug;

use log::*;
use serde_json::Value;
use square_tools::OAuthToken;

use crate::{demo_api::errors::ApiError, traits::SquareGateway, RecordStore};

pub struct OAuthApi<B> {
    gateway: B,
    store: RecordStore,
    redirect_uri: String,
}

impl<B> Debug for OAuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OAuthApi ({:?}, redirect_uri: {})", self.store, self.redirect_uri)
    }
}

impl<B> OAuthApi<B> {
    pub fn new(gateway: B, store: RecordStore, redirect_uri: String) -> Self {
        Self { gateway, store, redirect_uri }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.snapshot().oauth.is_authenticated()
    }

    fn access_token(&self) -> Result<String, ApiError> {
        self.store.snapshot().access_token().map(String::from).ok_or(ApiError::NotAuthorized)
    }
}

impl<B> OAuthApi<B>
where B: SquareGateway
{
    /// Exchanges the authorization code Square handed to the redirect URL for an access token. On success the held
    /// token is replaced by Square's response. On failure the held token is left alone.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, ApiError> {
        if code.trim().is_empty() {
            return Err(ApiError::MissingAuthorizationCode);
        }
        let token = self.gateway.obtain_token(code, &self.redirect_uri).await.map_err(|e| {
            warn!("🔑️ Authorization code exchange failed. {e}");
            ApiError::from(e)
        })?;
        info!("🔑️ Obtained an access token for merchant {}", token.merchant_id.as_deref().unwrap_or("<unknown>"));
        self.store.replace_oauth(token.clone());
        Ok(token)
    }

    /// Renews the held access token. Square's response replaces the held token.
    pub async fn renew(&self) -> Result<OAuthToken, ApiError> {
        let access_token = self.access_token()?;
        let token = self.gateway.renew_token(&access_token).await.map_err(|e| {
            warn!("🔑️ Token renewal failed. {e}");
            ApiError::from(e)
        })?;
        info!("🔑️ Access token renewed. Expires at {}", token.expires_at.as_deref().unwrap_or("<unknown>"));
        self.store.replace_oauth(token.clone());
        Ok(token)
    }

    /// Revokes the held access token and forgets it. Any successful response from Square counts as a revocation,
    /// whatever its body.
    pub async fn revoke(&self) -> Result<Value, ApiError> {
        let access_token = self.access_token()?;
        let response = self.gateway.revoke_token(&access_token).await.map_err(|e| {
            warn!("🔑️ Token revocation failed. {e}");
            ApiError::from(e)
        })?;
        info!("🔑️ Access token revoked");
        debug!("🔑️ Revocation response: {response}");
        self.store.replace_oauth(OAuthToken::default());
        Ok(response)
    }
}
