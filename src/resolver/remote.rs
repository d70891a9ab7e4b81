use async_trait::async_trait;
use reqwest::header::{ AUTHORIZATION, CONTENT_TYPE };
use reqwest::{ Client as HttpClient, StatusCode };
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

use super::{ choose, RandomSource, Reply, Resolver };
use crate::config::RemoteConfig;

pub const FALLBACK_REPLIES: [&str; 3] = [
    "Lo siento, no pude conectarme al servidor. ¿Podrías intentar de nuevo?",
    "Parece que hay un problema de conexión. Inténtalo más tarde.",
    "No pude procesar tu mensaje en este momento. ¿Puedes repetirlo?",
];

pub const NO_REPLY_TEXT: &str = "Lo siento, no pude generar una respuesta.";

/// Reply field names, in order of preference.
const REPLY_FIELDS: [&str; 2] = ["response", "output"];

pub const SESSION_HEADER: &str = "session";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(StatusCode),
    #[error("Malformed response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("Response body was null")]
    NullBody,
}

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Pull the reply out of a decoded response body.
///
/// Empty strings and non-string values count as absent. When neither field
/// holds a reply the fixed apology is returned.
pub fn extract_reply(body: &JsonValue) -> String {
    REPLY_FIELDS.iter()
        .filter_map(|field| body.get(field).and_then(JsonValue::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(NO_REPLY_TEXT)
        .to_string()
}

pub struct RemoteResolver {
    http: HttpClient,
    config: RemoteConfig,
    random: Arc<dyn RandomSource>,
}

impl RemoteResolver {
    pub fn new(
        config: RemoteConfig,
        random: Arc<dyn RandomSource>
    ) -> Result<Self, TransportError> {
        let http = HttpClient::builder().build()?;
        Ok(Self { http, config, random })
    }

    /// One POST to the endpoint. No retries.
    pub async fn request(&self, message: &str) -> Result<String, TransportError> {
        let mut req = self.http
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(SESSION_HEADER, self.config.session_header.as_str())
            .json(&(ChatRequest { message }));

        if let Some(bearer) = self.config.bearer() {
            req = req.header(AUTHORIZATION, bearer);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let body: JsonValue = serde_json::from_slice(&bytes)?;
        if body.is_null() {
            return Err(TransportError::NullBody);
        }
        Ok(extract_reply(&body))
    }

    pub fn fallback(&self) -> &'static str {
        choose(&FALLBACK_REPLIES, self.random.as_ref())
    }
}

#[async_trait]
impl Resolver for RemoteResolver {
    async fn resolve(&self, message: &str) -> Reply {
        match self.request(message).await {
            Ok(reply) => Reply::Resolved(reply),
            Err(e) => Reply::Fallback {
                text: self.fallback().to_string(),
                reason: format!("{}: {}", self.config.endpoint, e),
            },
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
