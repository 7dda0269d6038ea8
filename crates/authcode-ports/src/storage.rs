use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use authcode_core::{AccessToken, AuthorizationCode, Client, CodeRedemption, OAuth2Error};

/// Number of entries held by each registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub clients: usize,
    pub authorization_codes: usize,
    pub access_tokens: usize,
}

/// Trait implemented by every registry backend.
///
/// Inserts never overwrite: saving an existing key fails with
/// [`OAuth2Error::duplicate_key`].
#[async_trait]
pub trait Storage: Send + Sync {
    // Client registry
    async fn save_client(&self, client: &Client) -> Result<(), OAuth2Error>;
    async fn get_client(&self, client_id: &str) -> Result<Option<Client>, OAuth2Error>;

    // Authorization code registry
    async fn save_authorization_code(
        &self,
        auth_code: &AuthorizationCode,
    ) -> Result<(), OAuth2Error>;
    /// Exchange `code` for `token` in one critical section.
    ///
    /// When `code` is bound to `client_id`, `token` is inserted and `redemption` is
    /// applied to the code. Returns `None` for an unknown code and for a client
    /// mismatch, inserting nothing. A token collision fails with
    /// [`OAuth2Error::duplicate_key`] and leaves the code untouched, as does any
    /// other failure.
    async fn exchange_authorization_code(
        &self,
        code: &str,
        client_id: &str,
        redemption: CodeRedemption,
        token: &AccessToken,
    ) -> Result<Option<AuthorizationCode>, OAuth2Error>;

    // Access token registry
    async fn save_token(&self, token: &AccessToken) -> Result<(), OAuth2Error>;
    async fn get_token(&self, access_token: &str) -> Result<Option<AccessToken>, OAuth2Error>;

    async fn stats(&self) -> Result<RegistryStats, OAuth2Error>;

    /// Lightweight liveness/readiness check.
    async fn healthcheck(&self) -> Result<(), OAuth2Error> {
        Ok(())
    }
}

pub type DynStorage = Arc<dyn Storage>;
