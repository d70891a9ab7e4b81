pub mod api;

use crate::cli::Args;
use crate::config::RemoteConfig;
use log::info;
use std::error::Error;

/// Relay that keeps the credential server-side and forwards chat turns upstream.
pub struct Server {
    addr: String,
    config: RemoteConfig,
}

impl Server {
    pub fn new(addr: String, config: RemoteConfig) -> Self {
        Self { addr, config }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let config = RemoteConfig::for_proxy(args)?;
        Ok(Self::new(args.proxy_addr.clone(), config))
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("Relaying chat turns to: {}", self.config.endpoint);
        api::start_http_server(&self.addr, self.config.clone()).await
    }
}
