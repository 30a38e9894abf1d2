#![allow(dead_code, missing_docs, clippy::expect_used)]

use rstest::fixture;
use tracing::info;

mod fake_provider;
pub use self::fake_provider::*;

use codegrant_core::{
    AuthorizationResponse, ClientConfig, ClientIdentity, EndpointConfig, OAuth2Client, TokenRequest,
};

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub async fn provider() -> FakeProvider {
    init_tracing();
    match FakeProvider::start().await {
        Ok(provider) => provider,
        Err(error) => {
            panic!("fail to start fake provider: {error:?}");
        }
    }
}

pub fn client_for(endpoints: EndpointConfig) -> OAuth2Client {
    let identity = ClientIdentity::builder("client-id", "client-secret")
        .with_scope("user,repo")
        .with_redirect_uri("app.example://github.com/callback")
        .expect("valid redirect uri")
        .with_post_logout_redirect_uri("app.example://github.com/logout_callback")
        .expect("valid post-logout redirect uri")
        .build()
        .expect("valid identity");
    OAuth2Client::new(ClientConfig::new(endpoints, identity))
}

/// Runs the browser part of the flow: authorization request then redirect with `code`.
pub fn code_exchange_request(client: &OAuth2Client, code: &str) -> TokenRequest {
    let authorization = client.build_authorization_request();
    let mut callback = authorization.redirect_uri().clone();
    callback
        .query_pairs_mut()
        .append_pair("code", code)
        .append_pair("state", authorization.state());
    let response =
        AuthorizationResponse::from_redirect(&callback, &authorization).expect("valid callback");
    client.build_code_exchange_request(&response)
}
