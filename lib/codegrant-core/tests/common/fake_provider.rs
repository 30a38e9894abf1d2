use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::json;
use tracing::info;

use codegrant_core::EndpointConfig;

/// A token request as received by the fake provider.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub form: HashMap<String, String>,
    pub authorization: Option<String>,
}

type Received = Arc<Mutex<Vec<ReceivedRequest>>>;

/// Token endpoint scripted by the submitted `code` or `refresh_token`.
#[derive(Debug)]
pub struct FakeProvider {
    addr: SocketAddr,
    received: Received,
}

impl FakeProvider {
    pub async fn start() -> anyhow::Result<Self> {
        let received = Received::default();
        let app = Router::new()
            .route("/login/oauth/access_token", post(token))
            .with_state(Arc::clone(&received));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching fake provider");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server launched");
        });

        Ok(Self { addr, received })
    }

    pub fn endpoints(&self) -> EndpointConfig {
        let base = format!("http://{}", self.addr);
        EndpointConfig::new(
            format!("{base}/login/oauth/authorize"),
            format!("{base}/login/oauth/access_token"),
            format!("{base}/logout"),
        )
        .expect("valid endpoints")
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().expect("lock").clone()
    }
}

async fn token(
    State(received): State<Received>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    received.lock().expect("lock").push(ReceivedRequest {
        form: form.clone(),
        authorization,
    });

    let key = form
        .get("code")
        .or_else(|| form.get("refresh_token"))
        .map(String::as_str)
        .unwrap_or_default();

    match key {
        "good-code" => Json(json!({
            "access_token": "t1",
            "refresh_token": "r1",
            "id_token": "i1",
            "token_type": "bearer",
            "expires_in": 3600
        }))
        .into_response(),
        "good-refresh" => Json(json!({
            "access_token": "t2",
            "token_type": "bearer",
            "scope": "user,repo"
        }))
        .into_response(),
        "stale-code" => Json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }))
        .into_response(),
        "expired-refresh" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
            .into_response(),
        "garbage" => (StatusCode::OK, "access_token=t1").into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}
