//! Server assembly: configuration, telemetry, registries, actors and the HTTP listener.

use std::sync::Arc;

use actix::{Actor, Addr};
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use utoipa::OpenApi;

use authcode_actix::actors::{AuthActor, ClientActor, RegisterClient, TokenActor};
use authcode_actix::handlers::configure_routes;
use authcode_config::Config;
use authcode_core::Client;
use authcode_observability::actix::MetricsMiddleware;
use authcode_observability::{init_telemetry, Metrics, ObservedStorage};
use authcode_openapi::ApiDoc;
use authcode_ports::DynStorage;
use authcode_storage_memory::InMemoryStorage;

const SERVICE_NAME: &str = "authcode_server";

/// Everything a worker needs to serve requests. Cloned into each Actix worker.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
    pub metrics: Metrics,
    pub auth_actor: Addr<AuthActor>,
    pub token_actor: Addr<TokenActor>,
}

impl AppState {
    /// Build fresh registries, start the actors and register the bootstrap client.
    ///
    /// Must run inside an Actix system. Each call yields an independent server context.
    pub async fn bootstrap(config: &Config) -> std::io::Result<Self> {
        let storage: DynStorage = Arc::new(ObservedStorage::new(
            Arc::new(InMemoryStorage::new()),
            "memory",
        ));
        let metrics = Metrics::new().map_err(std::io::Error::other)?;

        let redemption = config.grant.code_redemption();

        let client_actor = ClientActor::new(storage.clone()).start();
        let auth_actor = AuthActor::new(storage.clone()).start();
        let token_actor = TokenActor::with_redemption(storage.clone(), redemption).start();

        // Clients are only registered here; no route reaches the client actor.
        let bootstrap = &config.bootstrap;
        client_actor
            .send(RegisterClient {
                client: Client::new(
                    bootstrap.client_id.clone(),
                    bootstrap.client_secret.clone(),
                    bootstrap.redirect_uris.clone(),
                ),
                span: tracing::Span::current(),
            })
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?;

        Ok(Self {
            storage,
            metrics,
            auth_actor,
            token_actor,
        })
    }

    /// Register app data and every route, including the OpenAPI document.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.metrics.clone()))
            .app_data(web::Data::new(self.auth_actor.clone()))
            .app_data(web::Data::new(self.token_actor.clone()))
            .configure(configure_routes)
            .route("/api-docs/openapi.json", web::get().to(openapi_json));
    }
}

async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Run the server until it receives a shutdown signal.
pub async fn run() -> std::io::Result<()> {
    let telemetry = init_telemetry(SERVICE_NAME)
        .map_err(|e| std::io::Error::other(format!("failed to initialise telemetry: {e}")))?;

    let config = Config::load();
    config.validate().map_err(std::io::Error::other)?;
    tracing::info!(config = ?config.sanitized(), "configuration loaded");

    let state = AppState::bootstrap(&config).await?;
    tracing::info!(
        client_id = %config.bootstrap.client_id,
        "bootstrap client registered"
    );

    let bind_addr = (config.server.host.clone(), config.server.port);
    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "starting HTTP server");

    let result = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(MetricsMiddleware::new(state.metrics.clone()))
            .wrap(TracingLogger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .bind(bind_addr)?
    .run()
    .await;

    tracing::info!("HTTP server stopped");
    telemetry.shutdown();
    result
}
