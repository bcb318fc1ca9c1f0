use crate::api::client::get_json;
use crate::api::{FetchError, TelemetrySource};
use crate::domain::snapshot::TelemetrySnapshot;
use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

const LIVE_PATH: &str = "/api/fakedataRoutes/fake-data";
const HISTORY_PATH: &str = "/api/historyRoutes/machines/history";

#[derive(Debug)]
pub struct TelemetryApi {
    client: Client,
    url: String,
}

impl TelemetryApi {
    pub fn new(client: Client, url: &str) -> Self {
        TelemetryApi {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TelemetrySource for TelemetryApi {
    #[instrument(skip(self))]
    async fn live_snapshot(&self) -> Result<TelemetrySnapshot, FetchError> {
        get_json(&self.client, &format!("{}{}", self.url, LIVE_PATH)).await
    }

    #[instrument(skip(self))]
    async fn history(&self) -> Result<Vec<TelemetrySnapshot>, FetchError> {
        get_json(&self.client, &format!("{}{}", self.url, HISTORY_PATH)).await
    }
}
