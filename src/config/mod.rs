use crate::cli::Args;
use log::warn;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CHAT_ENDPOINT is required in {0} mode")]
    MissingEndpoint(&'static str),
    #[error("Invalid endpoint URL '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Endpoint '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("CHAT_API_KEY is required in {0} mode")]
    MissingApiKey(&'static str),
    #[error("Session header must be numeric, got '{0}'")]
    InvalidSessionHeader(String),
}

/// Settings for talking to the remote chat endpoint. Read-only once built.
#[derive(Clone)]
pub struct RemoteConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub session_header: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("session_header", &self.session_header)
            .finish()
    }
}

impl RemoteConfig {
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        session_header: &str
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidEndpoint {
            url: endpoint.to_string(),
            source,
        })?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(endpoint.to_string()));
        }
        if session_header.is_empty() || !session_header.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidSessionHeader(session_header.to_string()));
        }
        Ok(Self {
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            session_header: session_header.to_string(),
        })
    }

    /// Client-side settings. The credential is optional here; without one the
    /// endpoint is expected to be a relay that attaches it.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let endpoint = args.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint("remote"))?;
        let config = Self::new(endpoint, args.api_key.clone(), &args.session_header)?;
        if config.api_key.is_some() {
            warn!("A credential is configured on the client; prefer pointing CHAT_ENDPOINT at the relay");
        }
        Ok(config)
    }

    /// Relay settings. The relay is the only holder of the credential, so it must be set.
    pub fn for_proxy(args: &Args) -> Result<Self, ConfigError> {
        let endpoint = args.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingEndpoint("proxy"))?;
        let config = Self::new(endpoint, args.api_key.clone(), &args.session_header)?;
        if config.api_key.is_none() {
            return Err(ConfigError::MissingApiKey("proxy"));
        }
        Ok(config)
    }

    pub fn bearer(&self) -> Option<String> {
        self.api_key.as_ref().map(|k| format!("Bearer {}", k))
    }
}
