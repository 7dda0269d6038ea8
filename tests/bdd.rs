// BDD scenarios for the authorization code grant, driven by Cucumber.
//
// Each scenario bootstraps its own in-process server context and talks to it through
// the Actix test service, so scenarios never share registries.

use std::fmt;

use actix_web::http::header;
use actix_web::{test, App};
use cucumber::{given, then, when, World};

use rust_authcode_server::{AppState, Config};

#[derive(World)]
#[world(init = Self::new)]
pub struct GrantWorld {
    state: Option<AppState>,
    authorization_code: Option<String>,
    access_token: Option<String>,
    last_status: u16,
    last_location: Option<String>,
    last_body: Option<serde_json::Value>,
}

impl fmt::Debug for GrantWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrantWorld")
            .field("bootstrapped", &self.state.is_some())
            .field("authorization_code", &self.authorization_code)
            .field("access_token", &self.access_token)
            .field("last_status", &self.last_status)
            .field("last_location", &self.last_location)
            .field("last_body", &self.last_body)
            .finish()
    }
}

impl GrantWorld {
    fn new() -> Self {
        Self {
            state: None,
            authorization_code: None,
            access_token: None,
            last_status: 0,
            last_location: None,
            last_body: None,
        }
    }

    async fn send(&mut self, req: test::TestRequest) {
        let state = self.state.clone().expect("server must be bootstrapped first");
        let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
        let resp = test::call_service(&app, req.to_request()).await;

        self.last_status = resp.status().as_u16();
        self.last_location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = test::read_body(resp).await;
        self.last_body = serde_json::from_slice(&body).ok();
    }
}

#[given(expr = "a server with the bootstrap client {string}")]
async fn server_with_client(world: &mut GrantWorld, client_id: String) {
    let mut config = Config::default();
    config.bootstrap.client_id = client_id;
    world.state = Some(AppState::bootstrap(&config).await.expect("bootstrap"));
}

#[when(expr = "client {string} requests authorization with redirect {string}")]
async fn request_authorization(world: &mut GrantWorld, client_id: String, redirect_uri: String) {
    let query = format!("client_id={client_id}&redirect_uri={redirect_uri}");
    let req = test::TestRequest::get().uri(&format!("/authorize?{}", encode_query(&query)));
    world.send(req).await;

    world.authorization_code = world
        .last_location
        .as_deref()
        .and_then(|loc| loc.split_once("?code="))
        .map(|(_, code)| code.to_string());
}

#[when(expr = "client {string} exchanges the authorization code")]
async fn exchange_code(world: &mut GrantWorld, client_id: String) {
    let code = world.authorization_code.clone().unwrap_or_default();
    let req = test::TestRequest::post()
        .uri("/token")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!("code={code}&client_id={client_id}"));
    world.send(req).await;

    if world.last_status == 200 {
        world.access_token = world
            .last_body
            .as_ref()
            .and_then(|b| b["access_token"].as_str())
            .map(str::to_string);
    }
}

#[when("the resource is requested with the issued access token")]
async fn request_resource_with_issued_token(world: &mut GrantWorld) {
    let token = world.access_token.clone().expect("a token must have been issued");
    send_resource_request(world, token).await;
}

#[when(expr = "the resource is requested with token {string}")]
async fn request_resource(world: &mut GrantWorld, token: String) {
    send_resource_request(world, token).await;
}

async fn send_resource_request(world: &mut GrantWorld, token: String) {
    let req = test::TestRequest::get()
        .uri("/resource")
        .insert_header((header::AUTHORIZATION, token));
    world.send(req).await;
}

#[then(expr = "the response redirects to {string} with a {int}-character code")]
async fn redirected_with_code(world: &mut GrantWorld, redirect_uri: String, len: usize) {
    assert_eq!(world.last_status, 302);
    let code = world.authorization_code.clone().expect("code in redirect");
    assert_eq!(code.len(), len);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        world.last_location.as_deref(),
        Some(format!("{redirect_uri}?code={code}").as_str())
    );
}

#[then(expr = "a {int}-character {string} access token is issued")]
async fn token_issued(world: &mut GrantWorld, len: usize, token_type: String) {
    assert_eq!(world.last_status, 200);
    let body = world.last_body.as_ref().expect("token response body");
    assert_eq!(body["token_type"], token_type.as_str());
    let token = world.access_token.as_deref().expect("access token");
    assert_eq!(token.len(), len);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[then(expr = "the resource data is {string}")]
async fn resource_data(world: &mut GrantWorld, data: String) {
    assert_eq!(world.last_status, 200);
    let body = world.last_body.as_ref().expect("resource body");
    assert_eq!(body["data"], data.as_str());
}

#[then(expr = "the request is declined with status {int} and error {string}")]
async fn declined(world: &mut GrantWorld, status: u16, error: String) {
    assert_eq!(world.last_status, status);
    let body = world.last_body.as_ref().expect("error body");
    assert_eq!(body["error"], error.as_str());
}

/// Percent-encode the characters of a redirect URI that would break a query string.
fn encode_query(query: &str) -> String {
    query.replace(':', "%3A").replace('/', "%2F")
}

#[actix_rt::main]
async fn main() {
    GrantWorld::cucumber()
        .max_concurrent_scenarios(1)
        .run_and_exit("tests/features")
        .await;
}
