use crate::config::RemoteConfig;
use crate::resolver::remote::SESSION_HEADER;
use axum::{
    body::Bytes,
    extract::State,
    http::{ header::CONTENT_TYPE, HeaderValue, StatusCode },
    response::{ IntoResponse, Response },
    routing::post,
    Json,
    Router,
};
use log::{ error, info, warn };
use serde::{ Deserialize, Serialize };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };

#[derive(Deserialize, Serialize)]
pub struct RelayRequest {
    pub message: String,
}

#[derive(Serialize)]
struct RelayError {
    error: String,
}

#[derive(Clone)]
struct AppState {
    http: reqwest::Client,
    config: Arc<RemoteConfig>,
}

pub fn router(config: RemoteConfig) -> Router {
    let app_state = AppState {
        http: reqwest::Client::new(),
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(relay_handler))
        .layer(cors)
        .with_state(app_state)
}

pub async fn start_http_server(
    addr: &str,
    config: RemoteConfig,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(config);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        format!("Failed to bind relay to {}: {}. Try a different port.", addr, e)
    })?;
    info!("Relay listening on: http://{}/api/chat", addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

fn relay_error(status: StatusCode, message: &str) -> Response {
    (status, Json(RelayError { error: message.to_string() })).into_response()
}

async fn relay_handler(
    State(state): State<AppState>,
    Json(req): Json<RelayRequest>,
) -> Response {
    let config = &state.config;
    let mut upstream = state.http
        .post(config.endpoint.clone())
        .header(SESSION_HEADER, config.session_header.as_str())
        .json(&req);
    if let Some(bearer) = config.bearer() {
        upstream = upstream.header(reqwest::header::AUTHORIZATION, bearer);
    }

    let resp = match upstream.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Upstream request failed: {}", e);
            return relay_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        }
    };

    let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    if !status.is_success() {
        warn!("Upstream answered with status {}", status);
    }
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let body: Bytes = match resp.bytes().await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to read upstream body: {}", e);
            return relay_error(StatusCode::BAD_GATEWAY, "upstream unavailable");
        }
    };

    (status, [(CONTENT_TYPE, content_type)], body).into_response()
}
