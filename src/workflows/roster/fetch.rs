use super::parser::{self, RosterImport};
use crate::config::RosterSourceConfig;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to fetch roster: {0}")]
    Http(#[from] reqwest::Error),
    #[error("roster response is not a usable document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Client for the Random User Generator API that seeds the roster.
pub struct RandomUserClient {
    client: Client,
    source: RosterSourceConfig,
}

impl RandomUserClient {
    pub fn new(source: RosterSourceConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(source.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, source))
    }

    pub(crate) fn with_client(client: Client, source: RosterSourceConfig) -> Self {
        Self { client, source }
    }

    /// Download the raw provider document without converting it.
    pub async fn fetch_document(&self) -> Result<Value, FetchError> {
        let RosterSourceConfig {
            base_url,
            results,
            nationality,
            seed,
            ..
        } = &self.source;

        info!(%base_url, results, %nationality, %seed, "fetching roster from provider");

        let response = self
            .client
            .get(base_url)
            .query(&roster_query(&self.source))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                error!(%err, "roster request failed");
                err
            })?;

        let document = response.json::<Value>().await?;
        Ok(document)
    }

    pub async fn fetch(&self) -> Result<RosterImport, FetchError> {
        let document = self.fetch_document().await?;
        let import = parser::parse_value(document)?;
        info!(members = import.members.len(), "fetched roster");
        Ok(import)
    }
}

/// Query parameters for a single page holding the whole roster.
fn roster_query(source: &RosterSourceConfig) -> [(&'static str, String); 4] {
    [
        ("page", "1".to_string()),
        ("results", source.results.to_string()),
        ("nat", source.nationality.clone()),
        ("seed", source.seed.clone()),
    ]
}
