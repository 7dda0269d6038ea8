use actix::Addr;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::collections::HashMap;
use url::form_urlencoded;

use authcode_observability::Metrics;

use crate::actors::{AuthActor, Authorize, ExchangeAuthorizationCode, TokenActor, ValidateToken};
use authcode_core::{CallbackResponse, OAuth2Error, ResourceResponse, TokenResponse};

fn no_store_headers(mut resp: HttpResponse) -> HttpResponse {
    resp.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    resp.headers_mut()
        .insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    resp
}

fn auth_response_security_headers(mut resp: HttpResponse) -> HttpResponse {
    // The redirect carries a live code in its Location; keep it out of referrers and frames.
    resp.headers_mut().insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    resp.headers_mut()
        .insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    resp.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    resp
}

fn parse_params_no_dupes(
    input: &[u8],
    source: &str,
) -> Result<HashMap<String, String>, OAuth2Error> {
    let mut map: HashMap<String, String> = HashMap::new();
    for (k, v) in form_urlencoded::parse(input) {
        let key = k.into_owned();
        if map.contains_key(&key) {
            return Err(OAuth2Error::invalid_request(&format!(
                "Duplicate {} parameters are not allowed",
                source
            )));
        }
        map.insert(key, v.into_owned());
    }
    Ok(map)
}

fn parse_query_no_dupes(req: &HttpRequest) -> Result<HashMap<String, String>, OAuth2Error> {
    parse_params_no_dupes(req.query_string().as_bytes(), "query")
}

fn parse_form_no_dupes(body: &web::Bytes) -> Result<HashMap<String, String>, OAuth2Error> {
    parse_params_no_dupes(body, "form")
}

/// Missing parameters read as empty strings and fall through to the protocol checks.
fn param(map: &HashMap<String, String>, key: &str) -> String {
    map.get(key).cloned().unwrap_or_default()
}

fn record_failure(metrics: &Metrics, err: OAuth2Error) -> OAuth2Error {
    metrics.record_grant_failure(&err.error);
    err
}

/// Authorization endpoint.
///
/// Auto-approves any registered client and redirects to `redirect_uri` with the fresh
/// code appended.
pub async fn authorize(
    req: HttpRequest,
    auth_actor: web::Data<Addr<AuthActor>>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, OAuth2Error> {
    let query = parse_query_no_dupes(&req).map_err(|e| record_failure(&metrics, e))?;

    if let Some(response_type) = query.get("response_type") {
        if response_type != "code" {
            return Err(record_failure(
                &metrics,
                OAuth2Error::unsupported_response_type("Only response_type=code is supported"),
            ));
        }
    }

    let auth_code = auth_actor
        .send(Authorize {
            client_id: param(&query, "client_id"),
            redirect_uri: param(&query, "redirect_uri"),
            span: tracing::Span::current(),
        })
        .await
        .map_err(|e| OAuth2Error::server_error(&e.to_string()))?
        .map_err(|e| record_failure(&metrics, e))?;

    metrics.oauth_authorization_codes_issued.inc();

    Ok(auth_response_security_headers(no_store_headers(
        HttpResponse::Found()
            .append_header((header::LOCATION, auth_code.redirect_target()))
            .finish(),
    )))
}

/// Token endpoint.
///
/// Exchanges an authorization code for a bearer token. The client secret is not checked.
pub async fn token(
    body: web::Bytes,
    token_actor: web::Data<Addr<TokenActor>>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, OAuth2Error> {
    let form = parse_form_no_dupes(&body).map_err(|e| record_failure(&metrics, e))?;

    if let Some(grant_type) = form.get("grant_type") {
        if grant_type != "authorization_code" {
            return Err(record_failure(
                &metrics,
                OAuth2Error::unsupported_grant_type(&format!(
                    "Grant type '{}' not supported",
                    grant_type
                )),
            ));
        }
    }

    let token = token_actor
        .send(ExchangeAuthorizationCode {
            code: param(&form, "code"),
            client_id: param(&form, "client_id"),
            span: tracing::Span::current(),
        })
        .await
        .map_err(|e| OAuth2Error::server_error(&e.to_string()))?
        .map_err(|e| record_failure(&metrics, e))?;

    metrics.oauth_token_issued_total.inc();

    Ok(no_store_headers(
        HttpResponse::Ok().json(TokenResponse::from(token)),
    ))
}

/// Protected resource. Possession of an issued token is the whole authorization decision.
pub async fn resource(
    req: HttpRequest,
    token_actor: web::Data<Addr<TokenActor>>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, OAuth2Error> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let validated = token_actor
        .send(ValidateToken {
            token: presented,
            span: tracing::Span::current(),
        })
        .await
        .map_err(|e| OAuth2Error::server_error(&e.to_string()))?;

    metrics.record_resource_access(validated.is_ok());
    let token = validated?;
    tracing::debug!(client_id = %token.client_id, "resource access granted");

    Ok(HttpResponse::Ok().json(ResourceResponse::secure_data()))
}

/// First value of `key`; later repeats are ignored.
fn first_param(input: &[u8], key: &str) -> String {
    form_urlencoded::parse(input)
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

/// Diagnostic redirect target that echoes the received code. It never fails.
pub async fn callback(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().json(CallbackResponse {
        code: first_param(req.query_string().as_bytes(), "code"),
    })
}
