use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use authcode_core::{AccessToken, AuthorizationCode, Client, CodeRedemption, OAuth2Error};
use authcode_ports::{RegistryStats, Storage};

/// The three registries owned by one server instance.
///
/// Instances are independent, so tests can run several servers side by side.
#[derive(Default)]
pub struct InMemoryStorage {
    clients: RwLock<HashMap<String, Client>>,
    auth_codes: RwLock<HashMap<String, AuthorizationCode>>,
    access_tokens: RwLock<HashMap<String, AccessToken>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage").finish_non_exhaustive()
    }
}

fn insert_unique<V>(map: &mut HashMap<String, V>, key: &str, value: V) -> Result<(), OAuth2Error> {
    match map.entry(key.to_string()) {
        Entry::Occupied(_) => Err(OAuth2Error::duplicate_key()),
        Entry::Vacant(slot) => {
            slot.insert(value);
            Ok(())
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_client(&self, client: &Client) -> Result<(), OAuth2Error> {
        let mut clients = self.clients.write().await;
        insert_unique(&mut clients, &client.client_id, client.clone())
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<Client>, OAuth2Error> {
        Ok(self.clients.read().await.get(client_id).cloned())
    }

    async fn save_authorization_code(
        &self,
        auth_code: &AuthorizationCode,
    ) -> Result<(), OAuth2Error> {
        let mut codes = self.auth_codes.write().await;
        insert_unique(&mut codes, &auth_code.code, auth_code.clone())
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
        client_id: &str,
        redemption: CodeRedemption,
        token: &AccessToken,
    ) -> Result<Option<AuthorizationCode>, OAuth2Error> {
        // Lock order: codes, then tokens.
        let mut codes = self.auth_codes.write().await;

        let bound = codes
            .get(code)
            .map(|auth_code| auth_code.is_bound_to(client_id))
            .unwrap_or(false);
        if !bound {
            return Ok(None);
        }

        {
            let mut tokens = self.access_tokens.write().await;
            insert_unique(&mut tokens, &token.access_token, token.clone())?;
        }

        let redeemed = match redemption {
            CodeRedemption::SingleUse => codes.remove(code),
            CodeRedemption::Reusable => codes.get(code).cloned(),
        };
        tracing::debug!(
            remaining_codes = codes.len(),
            ?redemption,
            "authorization code exchanged"
        );
        Ok(redeemed)
    }

    async fn save_token(&self, token: &AccessToken) -> Result<(), OAuth2Error> {
        let mut tokens = self.access_tokens.write().await;
        insert_unique(&mut tokens, &token.access_token, token.clone())
    }

    async fn get_token(&self, access_token: &str) -> Result<Option<AccessToken>, OAuth2Error> {
        Ok(self.access_tokens.read().await.get(access_token).cloned())
    }

    async fn stats(&self) -> Result<RegistryStats, OAuth2Error> {
        // One lock at a time; the snapshot is not atomic across registries.
        let clients = self.clients.read().await.len();
        let authorization_codes = self.auth_codes.read().await.len();
        let access_tokens = self.access_tokens.read().await.len();
        Ok(RegistryStats {
            clients,
            authorization_codes,
            access_tokens,
        })
    }
}
