use crate::domain::timestamp_deserializer::{deserialize_optional_timestamp, deserialize_timestamp};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRow {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// `-1` flags an anomaly, any other value is normal.
    pub is_anomaly: i8,
}

impl AnomalyRow {
    pub fn status(&self) -> AnomalyStatus {
        if self.is_anomaly == -1 { AnomalyStatus::Anomaly } else { AnomalyStatus::Normal }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyStatus {
    Normal,
    Anomaly,
}

impl AnomalyStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            AnomalyStatus::Normal => "✅",
            AnomalyStatus::Anomaly => "⚠️",
        }
    }
}

impl Display for AnomalyStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyStatus::Normal => write!(f, "{} Normal", self.symbol()),
            AnomalyStatus::Anomaly => write!(f, "{} Anomaly", self.symbol()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub predicted_battery_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Good,
    Warning,
    Critical,
}

impl Display for HealthStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Good => write!(f, "GOOD"),
            HealthStatus::Warning => write!(f, "WARNING"),
            HealthStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub battery_percentage: Option<f64>,
    pub temperature: Option<f64>,
    pub motor_speed: Option<f64>,
    pub connectivity_status: Option<u8>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: HealthStatus,
    pub color: HealthColor,
    pub summary: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metrics: HealthMetrics,
}

/// Everything the ML backend reports in one load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MlInsights {
    pub anomalies: Vec<AnomalyRow>,
    pub forecast: Option<Forecast>,
    pub health: Option<Health>,
    pub last_updated: Option<DateTime<Local>>,
}

impl MlInsights {
    pub fn latest_anomaly(&self) -> Option<AnomalyStatus> {
        self.anomalies.last().map(AnomalyRow::status)
    }

    /// The last `count` rows, newest first.
    pub fn recent_anomalies(&self, count: usize) -> impl Iterator<Item = &AnomalyRow> {
        self.anomalies.iter().rev().take(count)
    }
}

#[cfg(test)]
pub fn insights_fixture() -> MlInsights {
    MlInsights {
        anomalies: serde_json::from_str(include_str!("../../tests/resources/anomaly_response.json")).unwrap(),
        forecast: serde_json::from_str(include_str!("../../tests/resources/forecast_response.json")).unwrap(),
        health: serde_json::from_str(include_str!("../../tests/resources/health_response.json")).unwrap(),
        last_updated: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(-1, AnomalyStatus::Anomaly)]
    #[case(1, AnomalyStatus::Normal)]
    #[case(0, AnomalyStatus::Normal)]
    fn minus_one_flags_an_anomaly(#[case] is_anomaly: i8, #[case] expected: AnomalyStatus) {
        let row = AnomalyRow {
            timestamp: Utc::now(),
            is_anomaly,
        };
        assert_eq!(row.status(), expected);
    }

    #[test]
    fn latest_anomaly_uses_the_last_row() {
        let insights = insights_fixture();
        assert_eq!(insights.latest_anomaly(), Some(AnomalyStatus::Anomaly));
        assert_eq!(MlInsights::default().latest_anomaly(), None);
    }

    #[test]
    fn recent_anomalies_are_newest_first_and_limited() {
        let insights = insights_fixture();

        let recent = insights.recent_anomalies(3).map(|row| row.is_anomaly).collect::<Vec<_>>();

        assert_eq!(recent, vec![-1, 1, -1]);
        assert_eq!(insights.recent_anomalies(10).count(), 4);
    }

    #[test]
    fn health_tolerates_missing_metrics() {
        let health: Health = serde_json::from_value(json!({
            "status": "critical",
            "color": "red",
            "summary": "Device offline",
            "last_seen": null,
            "metrics": { "connectivity_status": 0 }
        }))
        .unwrap();

        assert_eq!(health.status, HealthStatus::Critical);
        assert_eq!(health.color, HealthColor::Red);
        assert_eq!(health.last_seen, None);
        assert_eq!(
            health.metrics,
            HealthMetrics {
                connectivity_status: Some(0),
                ..HealthMetrics::default()
            }
        );
    }

    #[test]
    fn unknown_health_status_is_rejected() {
        let result = serde_json::from_value::<Health>(json!({
            "status": "fine",
            "color": "green",
            "summary": "",
            "last_seen": null,
            "metrics": {}
        }));

        assert!(result.is_err());
    }
}
