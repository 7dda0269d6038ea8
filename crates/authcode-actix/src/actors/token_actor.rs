use actix::prelude::*;
use authcode_observability::annotate_span_with_trace_ids;
use authcode_ports::DynStorage;
use tracing::Instrument;

use authcode_core::{generate_access_token, AccessToken, CodeRedemption, OAuth2Error};

use super::MAX_IDENTIFIER_ATTEMPTS;

/// Exchanges authorization codes for access tokens and validates presented tokens.
pub struct TokenActor {
    db: DynStorage,
    redemption: CodeRedemption,
}

impl TokenActor {
    pub fn new(db: DynStorage) -> Self {
        Self {
            db,
            redemption: CodeRedemption::SingleUse,
        }
    }

    pub fn with_redemption(db: DynStorage, redemption: CodeRedemption) -> Self {
        if redemption == CodeRedemption::Reusable {
            tracing::warn!(
                "authorization codes stay redeemable after exchange; this is not RFC 6749 compliant"
            );
        }
        Self { db, redemption }
    }
}

impl Actor for TokenActor {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "Result<AccessToken, OAuth2Error>")]
pub struct ExchangeAuthorizationCode {
    pub code: String,
    pub client_id: String,
    pub span: tracing::Span,
}

impl Handler<ExchangeAuthorizationCode> for TokenActor {
    type Result = ResponseFuture<Result<AccessToken, OAuth2Error>>;

    fn handle(&mut self, msg: ExchangeAuthorizationCode, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();
        let redemption = self.redemption;

        let parent_span = msg.span.clone();
        let code_prefix = msg.code.chars().take(4).collect::<String>();
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.token.exchange",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            client_id = %msg.client_id,
            code_prefix = %code_prefix,
            code_len = msg.code.len(),
            redemption = ?redemption
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(
            async move {
                for attempt in 1..=MAX_IDENTIFIER_ATTEMPTS {
                    let token = AccessToken::new(generate_access_token(), msg.client_id.clone());

                    match db
                        .exchange_authorization_code(&msg.code, &msg.client_id, redemption, &token)
                        .await
                    {
                        Ok(Some(_)) => {
                            tracing::info!("access token issued");
                            return Ok(token);
                        }
                        Ok(None) => {
                            tracing::info!("authorization code unknown or issued to another client");
                            return Err(OAuth2Error::invalid_grant("Invalid authorization code"));
                        }
                        Err(err) if err.is_duplicate_key() => {
                            tracing::warn!(attempt, "access token collision, regenerating");
                        }
                        Err(err) => return Err(err),
                    }
                }

                Err(OAuth2Error::server_error(
                    "could not allocate a unique access token",
                ))
            }
            .instrument(actor_span),
        )
    }
}

#[derive(Message)]
#[rtype(result = "Result<AccessToken, OAuth2Error>")]
pub struct ValidateToken {
    pub token: String,
    pub span: tracing::Span,
}

impl Handler<ValidateToken> for TokenActor {
    type Result = ResponseFuture<Result<AccessToken, OAuth2Error>>;

    fn handle(&mut self, msg: ValidateToken, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();
        let parent_span = msg.span.clone();
        let token = msg.token;
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.token.validate",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            token_len = token.len()
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(
            async move {
                // Exact lookup: the header value is the token.
                db.get_token(&token)
                    .await?
                    .ok_or_else(|| OAuth2Error::invalid_token("Token not found"))
            }
            .instrument(actor_span),
        )
    }
}
