use crate::api::FetchError;
use crate::domain::insights::{AnomalyRow, Forecast, Health};
use crate::domain::snapshot::TelemetrySnapshot;
use async_trait::async_trait;
use std::fmt::Debug;

#[async_trait]
pub trait TelemetrySource: Debug + Send + Sync {
    async fn live_snapshot(&self) -> Result<TelemetrySnapshot, FetchError>;

    async fn history(&self) -> Result<Vec<TelemetrySnapshot>, FetchError>;
}

#[async_trait]
pub trait MlSource: Debug + Send + Sync {
    async fn anomalies(&self) -> Result<Vec<AnomalyRow>, FetchError>;

    async fn forecast(&self) -> Result<Forecast, FetchError>;

    async fn health(&self) -> Result<Health, FetchError>;
}
