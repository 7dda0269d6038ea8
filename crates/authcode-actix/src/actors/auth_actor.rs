use actix::prelude::*;
use authcode_observability::annotate_span_with_trace_ids;
use authcode_ports::DynStorage;
use tracing::Instrument;

use authcode_core::{generate_authorization_code, AuthorizationCode, OAuth2Error};

use super::MAX_IDENTIFIER_ATTEMPTS;

/// Issues authorization codes.
pub struct AuthActor {
    db: DynStorage,
}

impl AuthActor {
    pub fn new(db: DynStorage) -> Self {
        Self { db }
    }
}

impl Actor for AuthActor {
    type Context = Context<Self>;
}

/// Authorization request for a client.
///
/// There is no end-user login or consent step: any caller presenting a registered
/// `client_id` is approved. The returned code carries the redirect target.
#[derive(Message)]
#[rtype(result = "Result<AuthorizationCode, OAuth2Error>")]
pub struct Authorize {
    pub client_id: String,
    pub redirect_uri: String,
    pub span: tracing::Span,
}

impl Handler<Authorize> for AuthActor {
    type Result = ResponseFuture<Result<AuthorizationCode, OAuth2Error>>;

    fn handle(&mut self, msg: Authorize, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();

        let parent_span = msg.span.clone();
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.auth.authorize",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            client_id = %msg.client_id
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(
            async move {
                let client = db
                    .get_client(&msg.client_id)
                    .await?
                    .ok_or_else(|| OAuth2Error::invalid_client("Client not found"))?;

                if !client.validate_redirect_uri(&msg.redirect_uri) {
                    return Err(OAuth2Error::invalid_request(
                        "redirect_uri is not registered for this client",
                    ));
                }

                for attempt in 1..=MAX_IDENTIFIER_ATTEMPTS {
                    let auth_code = AuthorizationCode::new(
                        generate_authorization_code(),
                        msg.client_id.clone(),
                        msg.redirect_uri.clone(),
                    );

                    match db.save_authorization_code(&auth_code).await {
                        Ok(()) => {
                            tracing::info!("authorization code issued");
                            return Ok(auth_code);
                        }
                        Err(err) if err.is_duplicate_key() => {
                            tracing::warn!(attempt, "authorization code collision, regenerating");
                        }
                        Err(err) => return Err(err),
                    }
                }

                Err(OAuth2Error::server_error(
                    "could not allocate a unique authorization code",
                ))
            }
            .instrument(actor_span),
        )
    }
}
