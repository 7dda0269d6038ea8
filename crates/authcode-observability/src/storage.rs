use async_trait::async_trait;
use tracing::{field, Instrument};

use authcode_core::{AccessToken, AuthorizationCode, Client, CodeRedemption, OAuth2Error};
use authcode_ports::{DynStorage, RegistryStats, Storage};

use crate::telemetry::annotate_span_with_trace_ids;

/// A thin wrapper around a `DynStorage` that creates a tracing span for each registry call.
///
/// Request spans (created by the actix middleware) extend through actors down into the
/// registries. Codes and tokens are only ever logged by prefix and length.
pub struct ObservedStorage {
    inner: DynStorage,
    db_system: String,
}

impl ObservedStorage {
    pub fn new(inner: DynStorage, db_system: impl Into<String>) -> Self {
        Self {
            inner,
            db_system: db_system.into(),
        }
    }

    fn span(&self, operation: &'static str) -> tracing::Span {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = operation
        );
        annotate_span_with_trace_ids(&span);
        span
    }

    fn secret_span(&self, operation: &'static str, secret: &str) -> tracing::Span {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = operation,
            prefix = %Self::prefix(secret),
            len = secret.len()
        );
        annotate_span_with_trace_ids(&span);
        span
    }

    fn prefix(secret: &str) -> String {
        secret.chars().take(4).collect::<String>()
    }
}

#[async_trait]
impl Storage for ObservedStorage {
    async fn save_client(&self, client: &Client) -> Result<(), OAuth2Error> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "save_client",
            client_id = %client.client_id
        );
        annotate_span_with_trace_ids(&span);
        async move { self.inner.save_client(client).await }
            .instrument(span)
            .await
    }

    async fn get_client(&self, client_id: &str) -> Result<Option<Client>, OAuth2Error> {
        let span = tracing::info_span!(
            "db",
            trace_id = field::Empty,
            span_id = field::Empty,
            db_system = %self.db_system,
            db_operation = "get_client",
            client_id = %client_id
        );
        annotate_span_with_trace_ids(&span);
        async move { self.inner.get_client(client_id).await }
            .instrument(span)
            .await
    }

    async fn save_authorization_code(
        &self,
        auth_code: &AuthorizationCode,
    ) -> Result<(), OAuth2Error> {
        let span = self.secret_span("save_authorization_code", &auth_code.code);
        async move { self.inner.save_authorization_code(auth_code).await }
            .instrument(span)
            .await
    }

    async fn exchange_authorization_code(
        &self,
        code: &str,
        client_id: &str,
        redemption: CodeRedemption,
        token: &AccessToken,
    ) -> Result<Option<AuthorizationCode>, OAuth2Error> {
        let span = self.secret_span("exchange_authorization_code", code);
        async move {
            self.inner
                .exchange_authorization_code(code, client_id, redemption, token)
                .await
        }
        .instrument(span)
        .await
    }

    async fn save_token(&self, token: &AccessToken) -> Result<(), OAuth2Error> {
        let span = self.secret_span("save_token", &token.access_token);
        async move { self.inner.save_token(token).await }
            .instrument(span)
            .await
    }

    async fn get_token(&self, access_token: &str) -> Result<Option<AccessToken>, OAuth2Error> {
        let span = self.secret_span("get_token", access_token);
        async move { self.inner.get_token(access_token).await }
            .instrument(span)
            .await
    }

    async fn stats(&self) -> Result<RegistryStats, OAuth2Error> {
        let span = self.span("stats");
        async move { self.inner.stats().await }
            .instrument(span)
            .await
    }

    async fn healthcheck(&self) -> Result<(), OAuth2Error> {
        let span = self.span("healthcheck");
        async move { self.inner.healthcheck().await }
            .instrument(span)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authcode_storage_memory::InMemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn delegates_every_call_to_inner_storage() {
        let inner: DynStorage = Arc::new(InMemoryStorage::new());
        let observed = ObservedStorage::new(inner.clone(), "memory");

        observed
            .save_client(&Client::new("a".into(), "s".into(), vec![]))
            .await
            .unwrap();
        observed
            .save_authorization_code(&AuthorizationCode::new(
                "code".into(),
                "a".into(),
                "https://x".into(),
            ))
            .await
            .unwrap();
        observed
            .save_token(&AccessToken::new("tok".into(), "a".into()))
            .await
            .unwrap();

        assert!(inner.get_client("a").await.unwrap().is_some());
        assert!(observed.get_token("tok").await.unwrap().is_some());

        let redeemed = observed
            .exchange_authorization_code(
                "code",
                "a",
                CodeRedemption::SingleUse,
                &AccessToken::new("tok2".into(), "a".into()),
            )
            .await
            .unwrap();
        assert!(redeemed.is_some());
        assert!(inner.get_token("tok2").await.unwrap().is_some());

        let stats = observed.stats().await.unwrap();
        assert_eq!(stats.clients, 1);
        assert_eq!(stats.authorization_codes, 0);
        assert_eq!(stats.access_tokens, 2);
        observed.healthcheck().await.unwrap();
    }

    #[test]
    fn prefix_is_short() {
        assert_eq!(ObservedStorage::prefix("abcdefghij"), "abcd");
        assert_eq!(ObservedStorage::prefix("ab"), "ab");
    }
}
