use crate::api::client::get_json;
use crate::api::{FetchError, MlSource};
use crate::domain::insights::{AnomalyRow, Forecast, Health};
use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

const ANOMALY_PATH: &str = "/api/predict/anomaly";
const FORECAST_PATH: &str = "/api/predict/forecast";
const HEALTH_PATH: &str = "/api/health";

#[derive(Debug)]
pub struct MlApi {
    client: Client,
    url: String,
}

impl MlApi {
    pub fn new(client: Client, url: &str) -> Self {
        MlApi {
            client,
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MlSource for MlApi {
    #[instrument(skip(self))]
    async fn anomalies(&self) -> Result<Vec<AnomalyRow>, FetchError> {
        get_json(&self.client, &format!("{}{}", self.url, ANOMALY_PATH)).await
    }

    #[instrument(skip(self))]
    async fn forecast(&self) -> Result<Forecast, FetchError> {
        get_json(&self.client, &format!("{}{}", self.url, FORECAST_PATH)).await
    }

    #[instrument(skip(self))]
    async fn health(&self) -> Result<Health, FetchError> {
        get_json(&self.client, &format!("{}{}", self.url, HEALTH_PATH)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::insights::{HealthColor, HealthStatus};
    use pretty_assertions::assert_eq;

    async fn mock_json(server: &mut mockito::ServerGuard, path: &str, body: &str) -> mockito::Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn reads_every_prediction_route() -> Result<(), FetchError> {
        let mut server = mockito::Server::new_async().await;
        let anomaly = mock_json(&mut server, ANOMALY_PATH, include_str!("../../tests/resources/anomaly_response.json")).await;
        let forecast = mock_json(&mut server, FORECAST_PATH, include_str!("../../tests/resources/forecast_response.json")).await;
        let health = mock_json(&mut server, HEALTH_PATH, include_str!("../../tests/resources/health_response.json")).await;

        let api = MlApi::new(Client::new(), &server.url());

        let anomalies = api.anomalies().await?;
        let prediction = api.forecast().await?;
        let score = api.health().await?;

        anomaly.assert_async().await;
        forecast.assert_async().await;
        health.assert_async().await;
        assert_eq!(anomalies.len(), 4);
        assert_eq!(prediction.predicted_battery_pct, 76.5);
        assert_eq!(score.status, HealthStatus::Warning);
        assert_eq!(score.color, HealthColor::Yellow);
        Ok(())
    }

    #[tokio::test]
    async fn missing_route_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", HEALTH_PATH).with_status(404).create_async().await;

        let api = MlApi::new(Client::new(), &server.url());

        assert!(api.health().await.is_err());
        mock.assert_async().await;
    }
}
