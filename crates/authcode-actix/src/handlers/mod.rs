pub mod admin;
pub mod oauth;

use actix_web::web;

/// Register every route served by this crate.
///
/// Callers provide `Addr<AuthActor>`, `Addr<TokenActor>`, `Metrics` and `DynStorage`
/// as app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/authorize", web::get().to(oauth::authorize))
        .route("/token", web::post().to(oauth::token))
        .route("/resource", web::get().to(oauth::resource))
        .route("/callback", web::get().to(oauth::callback))
        .route("/health", web::get().to(admin::health))
        .route("/ready", web::get().to(admin::readiness))
        .route("/metrics", web::get().to(admin::system_metrics))
        .route("/admin/dashboard", web::get().to(admin::dashboard));
}
