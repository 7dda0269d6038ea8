//! Operational endpoints: liveness, readiness, Prometheus scrape and registry sizes.

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use authcode_observability::Metrics;
use authcode_ports::{DynStorage, RegistryStats};

const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";

#[derive(Serialize)]
pub struct DashboardData {
    #[serde(flatten)]
    pub registries: RegistryStats,
    pub generated_at: String,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Sizes of the client, authorization code and access token registries.
pub async fn dashboard(db: web::Data<DynStorage>) -> Result<HttpResponse> {
    let registries = db.stats().await?;

    Ok(HttpResponse::Ok().json(DashboardData {
        registries,
        generated_at: now_rfc3339(),
    }))
}

pub async fn system_metrics(metrics: web::Data<Metrics>) -> Result<HttpResponse> {
    let body = metrics
        .render()
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().content_type(PROMETHEUS_TEXT).body(body))
}

/// Liveness: the process is up and serving.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "authcode_server",
        "timestamp": now_rfc3339(),
    }))
}

/// Readiness: the registries answer.
pub async fn readiness(db: web::Data<DynStorage>) -> Result<HttpResponse> {
    db.healthcheck()
        .await
        .map_err(actix_web::error::ErrorServiceUnavailable)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ready",
        "checks": { "registries": "ok" },
    })))
}
