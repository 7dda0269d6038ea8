use utoipa::OpenApi;

/// OpenAPI document generator.
///
/// Kept in its own crate so it can be reused by:
/// - the main server binary (`/api-docs/openapi.json`)
/// - tooling binaries (exporting a static document for the docs site)
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            authcode_core::TokenResponse,
            authcode_core::ResourceResponse,
            authcode_core::CallbackResponse,
            authcode_core::OAuth2Error,
        )
    ),
    tags(
        (name = "OAuth2", description = "Authorization code grant endpoints"),
        (name = "Resource", description = "Bearer-protected resource"),
        (name = "Observability", description = "Health checks, readiness and metrics"),
    ),
    info(
        title = "Authorization Code Grant Server API",
        version = "0.1.0",
        description = "Minimal OAuth 2.0 authorization code grant server built on Actix-web and the actor model",
        license(
            name = "MIT OR Apache-2.0"
        )
    )
)]
pub struct ApiDoc;
