use crate::api::{FetchError, MlSource, TelemetrySource};
use crate::cache::TtlCache;
use crate::domain::insights::MlInsights;
use crate::domain::snapshot::TelemetrySnapshot;
use chrono::Local;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const LIVE_KEY: &str = "live_data";
pub const REPORT_KEY: &str = "report_data";
pub const HISTORY_KEY: &str = "history_data";

/// Loads the data of each screen, going through the cache for telemetry.
///
/// Every failure is logged and turned into the empty value of its kind so the
/// screens can render a "no data" state.
#[derive(Debug, Clone)]
pub struct Loader {
    telemetry: Arc<dyn TelemetrySource>,
    ml: Arc<dyn MlSource>,
    cache: Arc<TtlCache>,
}

impl Loader {
    pub fn new(telemetry: Arc<dyn TelemetrySource>, ml: Arc<dyn MlSource>, cache: Arc<TtlCache>) -> Self {
        Loader { telemetry, ml, cache }
    }

    #[instrument(skip(self))]
    pub async fn live(&self) -> Option<TelemetrySnapshot> {
        self.cached_snapshot(LIVE_KEY).await
    }

    #[instrument(skip(self))]
    pub async fn report(&self) -> Option<TelemetrySnapshot> {
        self.cached_snapshot(REPORT_KEY).await
    }

    #[instrument(skip(self))]
    pub async fn history(&self) -> Vec<TelemetrySnapshot> {
        let result = self.cache.get_or_fetch(HISTORY_KEY, || self.telemetry.history()).await;
        fallback(result, "history").unwrap_or_default()
    }

    /// Always hits the ML backend, the three predictions are requested concurrently.
    #[instrument(skip(self))]
    pub async fn insights(&self) -> MlInsights {
        info!("🧠 Loading ML insights...");
        let (anomalies, forecast, health) = futures::join!(self.ml.anomalies(), self.ml.forecast(), self.ml.health());

        let insights = MlInsights {
            anomalies: fallback(anomalies, "anomaly detection").unwrap_or_default(),
            forecast: fallback(forecast, "battery forecast"),
            health: fallback(health, "health score"),
            last_updated: Some(Local::now()),
        };

        info!(
            anomalies = insights.anomalies.len(),
            forecast = insights.forecast.is_some(),
            health = insights.health.is_some(),
            "🧠 Loading ML insights... OK"
        );
        insights
    }

    async fn cached_snapshot(&self, key: &str) -> Option<TelemetrySnapshot> {
        let result = self.cache.get_or_fetch(key, || self.telemetry.live_snapshot()).await;
        fallback(result, key)
    }
}

fn fallback<T>(result: Result<T, FetchError>, what: &str) -> Option<T> {
    result.inspect_err(|e| warn!("⚠️ Failed to load {}: {}", what, e)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MlApi, TelemetryApi};
    use crate::cache::ManualClock;
    use crate::domain::insights::{AnomalyStatus, HealthStatus};
    use crate::domain::snapshot::snapshot_fixture;
    use chrono::{TimeZone, Utc};
    use mockito::{Mock, ServerGuard};
    use pretty_assertions::assert_eq;
    use reqwest::Client;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_log::test;

    const TTL: Duration = Duration::from_secs(15 * 60);
    const LIVE_PATH: &str = "/api/fakedataRoutes/fake-data";

    struct Fixture {
        server: ServerGuard,
        clock: ManualClock,
        loader: Loader,
        _dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap());
        let cache = TtlCache::with_clock(dir.path(), TTL, Arc::new(clock.clone()));

        let loader = Loader::new(
            Arc::new(TelemetryApi::new(Client::new(), &server.url())),
            Arc::new(MlApi::new(Client::new(), &server.url())),
            Arc::new(cache),
        );

        Fixture {
            server,
            clock,
            loader,
            _dir: dir,
        }
    }

    async fn mock_json(server: &mut ServerGuard, path: &str, body: &str, hits: usize) -> Mock {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    #[test(tokio::test)]
    async fn live_reuses_cached_data_younger_than_the_ttl() {
        let mut f = fixture().await;
        let mock = mock_json(&mut f.server, LIVE_PATH, include_str!("../tests/resources/fake_data_response.json"), 1).await;

        let first = f.loader.live().await;
        f.clock.advance(Duration::from_secs(14 * 60));
        let second = f.loader.live().await;

        mock.assert_async().await;
        assert_eq!(first, Some(snapshot_fixture()));
        assert_eq!(second, first);
    }

    #[test(tokio::test)]
    async fn live_refetches_once_after_the_cache_expires() {
        let mut f = fixture().await;
        let mock = mock_json(&mut f.server, LIVE_PATH, include_str!("../tests/resources/fake_data_response.json"), 2).await;

        f.loader.live().await;
        f.clock.advance(TTL);
        f.loader.live().await;
        f.loader.live().await;

        mock.assert_async().await;
    }

    #[test(tokio::test)]
    async fn live_and_report_are_cached_independently() {
        let mut f = fixture().await;
        let mock = mock_json(&mut f.server, LIVE_PATH, include_str!("../tests/resources/fake_data_response.json"), 2).await;

        assert!(f.loader.live().await.is_some());
        assert!(f.loader.report().await.is_some());
        assert!(f.loader.report().await.is_some());

        mock.assert_async().await;
    }

    #[test(tokio::test)]
    async fn non_ok_response_yields_no_snapshot_and_is_not_cached() {
        let mut f = fixture().await;
        let mock = f.server.mock("GET", LIVE_PATH).with_status(502).expect(2).create_async().await;

        assert_eq!(f.loader.live().await, None);
        assert_eq!(f.loader.live().await, None);

        mock.assert_async().await;
    }

    #[test(tokio::test)]
    async fn history_falls_back_to_an_empty_list() {
        let mut f = fixture().await;
        let mock = f
            .server
            .mock("GET", "/api/historyRoutes/machines/history")
            .with_status(500)
            .create_async()
            .await;

        assert!(f.loader.history().await.is_empty());
        mock.assert_async().await;
    }

    #[test(tokio::test)]
    async fn insights_keep_what_loaded_when_one_prediction_fails() {
        let mut f = fixture().await;
        let anomaly = mock_json(&mut f.server, "/api/predict/anomaly", include_str!("../tests/resources/anomaly_response.json"), 1).await;
        let forecast = f.server.mock("GET", "/api/predict/forecast").with_status(500).create_async().await;
        let health = mock_json(&mut f.server, "/api/health", include_str!("../tests/resources/health_response.json"), 1).await;

        let insights = f.loader.insights().await;

        anomaly.assert_async().await;
        forecast.assert_async().await;
        health.assert_async().await;
        assert_eq!(insights.anomalies.len(), 4);
        assert_eq!(insights.forecast, None);
        assert_eq!(insights.health.map(|h| h.status), Some(HealthStatus::Warning));
        assert!(insights.last_updated.is_some());
    }

    #[test(tokio::test)]
    async fn insights_accept_timestamps_without_an_offset() {
        let mut f = fixture().await;
        let anomaly = mock_json(
            &mut f.server,
            "/api/predict/anomaly",
            r#"[{"timestamp":"2025-06-01T10:00:00Z","is_anomaly":1},{"timestamp":"2025-06-01T10:05:00","is_anomaly":-1}]"#,
            1,
        )
        .await;
        let forecast = mock_json(
            &mut f.server,
            "/api/predict/forecast",
            r#"{"timestamp":"2025-06-01T11:05:00.123456","predicted_battery_pct":74.0}"#,
            1,
        )
        .await;
        let health = mock_json(
            &mut f.server,
            "/api/health",
            r#"{"status":"good","color":"green","summary":"All systems nominal","last_seen":"2025-06-01T10:05:00","metrics":{}}"#,
            1,
        )
        .await;

        let insights = f.loader.insights().await;

        anomaly.assert_async().await;
        forecast.assert_async().await;
        health.assert_async().await;
        assert_eq!(insights.anomalies.len(), 2);
        assert_eq!(insights.latest_anomaly(), Some(AnomalyStatus::Anomaly));
        assert_eq!(insights.forecast.map(|f| f.predicted_battery_pct), Some(74.0));
        assert!(insights.health.and_then(|h| h.last_seen).is_some());
    }

    #[test(tokio::test)]
    async fn insights_are_never_cached() {
        let mut f = fixture().await;
        let anomaly = mock_json(&mut f.server, "/api/predict/anomaly", "[]", 2).await;
        let forecast = f.server.mock("GET", "/api/predict/forecast").with_status(404).expect(2).create_async().await;
        let health = f.server.mock("GET", "/api/health").with_status(404).expect(2).create_async().await;

        f.loader.insights().await;
        let insights = f.loader.insights().await;

        anomaly.assert_async().await;
        forecast.assert_async().await;
        health.assert_async().await;
        assert!(insights.anomalies.is_empty());
        assert_eq!(insights.latest_anomaly(), None);
    }
}
