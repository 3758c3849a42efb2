use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{
    config::Config,
    services::{generative::GenerativeClient, quota::QuotaStore},
};

pub mod genbank;
pub mod health;
pub mod proxy;
pub mod text;
pub mod tools;
pub mod user;

/// Explicit platform context handed to every operation: configuration,
/// the quota store, the shared outbound HTTP client, and the generative
/// client. No ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quota: Arc<QuotaStore>,
    pub http: Client,
    pub generative: Arc<GenerativeClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let generative = Arc::new(GenerativeClient::new(
            http.clone(),
            config.model_api_url.clone(),
            config.model_api_key.clone(),
        ));

        Ok(Self {
            config,
            quota: Arc::new(QuotaStore::new()),
            http,
            generative,
        })
    }
}
