use crate::domain::Tab;
use crate::domain::insights::{AnomalyStatus, HealthStatus, MlInsights};
use crate::domain::snapshot::TelemetrySnapshot;
use crate::extensions::date_time_ext::ToLocalString;
use crate::screens::table::{header, new_table};
use crate::screens::{LOADING, RenderContext, Screen, heading};
use crate::store::DashboardState;
use comfy_table::{Cell, Color};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Severity {
    Warning,
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Alert {
    severity: Severity,
    source: &'static str,
    message: String,
}

/// Things that need attention, derived from the live snapshot and the ML insights.
#[derive(Debug, Default)]
pub struct AlertsScreen;

impl AlertsScreen {
    pub fn new() -> Self {
        AlertsScreen
    }
}

impl Screen for AlertsScreen {
    fn tab(&self) -> Tab {
        Tab::Alerts
    }

    fn render(&mut self, state: &DashboardState, _context: &RenderContext<'_>) -> String {
        let mut out = heading("Alerts", "Conditions reported by the device and the ML health checks.");

        if state.live.is_loading() && state.insights.is_loading() {
            out.push_str(LOADING);
            out.push('\n');
            return out;
        }

        let alerts = collect_alerts(state.live.ready(), state.insights.ready());
        if alerts.is_empty() {
            out.push_str("No active alerts.\n");
            return out;
        }

        let mut table = new_table();
        table.set_header(header(&["Severity", "Source", "Message"]));
        for alert in alerts {
            let color = match alert.severity {
                Severity::Warning => Color::Yellow,
                Severity::Critical => Color::Red,
            };
            table.add_row(vec![Cell::new(alert.severity).fg(color), Cell::new(alert.source), Cell::new(alert.message)]);
        }

        out.push_str(&table.to_string());
        out.push('\n');
        out
    }
}

/// Most severe first.
fn collect_alerts(live: Option<&TelemetrySnapshot>, insights: Option<&MlInsights>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(snapshot) = live {
        if snapshot.error_code != 0 {
            alerts.push(Alert {
                severity: Severity::Critical,
                source: "Device",
                message: format!("Error code {} reported at {}", snapshot.error_code, snapshot.timestamp.to_local_string()),
            });
        }
        if !snapshot.is_online() {
            alerts.push(Alert {
                severity: Severity::Warning,
                source: "Device",
                message: "Device is offline".to_string(),
            });
        }
    }

    if let Some(insights) = insights {
        if let Some(health) = &insights.health {
            let severity = match health.status {
                HealthStatus::Good => None,
                HealthStatus::Warning => Some(Severity::Warning),
                HealthStatus::Critical => Some(Severity::Critical),
            };
            if let Some(severity) = severity {
                alerts.push(Alert {
                    severity,
                    source: "Health Score",
                    message: format!("{}: {}", health.status, health.summary),
                });
            }
        }

        if let Some(row) = insights.anomalies.last().filter(|row| row.status() == AnomalyStatus::Anomaly) {
            alerts.push(Alert {
                severity: Severity::Warning,
                source: "Anomaly Detection",
                message: format!("Anomaly detected at {}", row.timestamp.to_local_string()),
            });
        }
    }

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}
