use actix::prelude::*;
use authcode_observability::annotate_span_with_trace_ids;
use authcode_ports::DynStorage;
use tracing::Instrument;

use authcode_core::{Client, OAuth2Error};

/// Owns the client registry side of the storage handle.
pub struct ClientActor {
    db: DynStorage,
}

impl ClientActor {
    pub fn new(db: DynStorage) -> Self {
        Self { db }
    }
}

impl Actor for ClientActor {
    type Context = Context<Self>;
}

/// Bootstrap-time registration. There is no runtime registration endpoint.
#[derive(Message)]
#[rtype(result = "Result<Client, OAuth2Error>")]
pub struct RegisterClient {
    pub client: Client,
    pub span: tracing::Span,
}

impl Handler<RegisterClient> for ClientActor {
    type Result = ResponseFuture<Result<Client, OAuth2Error>>;

    fn handle(&mut self, msg: RegisterClient, _: &mut Self::Context) -> Self::Result {
        let db = self.db.clone();

        let parent_span = msg.span.clone();
        let actor_span = tracing::info_span!(
            parent: &parent_span,
            "actor.client.register",
            trace_id = tracing::field::Empty,
            span_id = tracing::field::Empty,
            client_id = %msg.client.client_id,
            redirect_uris = msg.client.redirect_uris.len()
        );
        annotate_span_with_trace_ids(&actor_span);

        Box::pin(
            async move {
                db.save_client(&msg.client).await?;
                tracing::info!("client registered");
                Ok(msg.client)
            }
            .instrument(actor_span),
        )
    }
}
