use crate::domain::insights::{Forecast, Health, HealthColor, MlInsights};
use crate::domain::{Loadable, Tab};
use crate::extensions::date_time_ext::ToLocalString;
use crate::screens::table::{header, new_table};
use crate::screens::{MISSING, RenderContext, Screen, heading};
use crate::store::DashboardState;
use comfy_table::{Attribute, Cell, Color, Table};

const CARD_LOADING: &str = "Loading...";

#[derive(Debug)]
pub struct AiIntelligenceScreen {
    anomaly_rows: usize,
}

impl AiIntelligenceScreen {
    pub fn new(anomaly_rows: usize) -> Self {
        AiIntelligenceScreen { anomaly_rows }
    }
}

impl Screen for AiIntelligenceScreen {
    fn tab(&self) -> Tab {
        Tab::AiIntelligence
    }

    fn render(&mut self, state: &DashboardState, _context: &RenderContext<'_>) -> String {
        let mut out = heading(
            "AI INTELLIGENCE",
            "ML-powered insights: anomaly detection, battery forecast, and health score.",
        );

        let insights = match &state.insights {
            Loadable::Ready(insights) => {
                if let Some(last_updated) = insights.last_updated {
                    out.push_str(&format!("Last updated: {}\n\n", last_updated.to_local_string()));
                }
                Some(insights)
            }
            Loadable::Loading | Loadable::Unavailable => None,
        };

        out.push_str(&forecast_card(insights.map(|i| i.forecast.as_ref())).to_string());
        out.push('\n');
        out.push_str(&health_card(insights.map(|i| i.health.as_ref())).to_string());
        out.push('\n');
        out.push_str(&anomaly_card(insights, self.anomaly_rows).to_string());
        out.push('\n');
        out
    }
}

/// `None` while loading, `Some(None)` when the backend had nothing.
fn forecast_card(forecast: Option<Option<&Forecast>>) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Battery Forecast"]));

    match forecast {
        None => {
            table.add_row(vec![CARD_LOADING]);
        }
        Some(None) => {
            table.add_row(vec!["No forecast available."]);
        }
        Some(Some(forecast)) => {
            table.add_row(vec![format!("At {}", forecast.timestamp.to_local_string())]);
            table.add_row(vec![Cell::new(format!("{}%", forecast.predicted_battery_pct)).add_attribute(Attribute::Bold)]);
            table.add_row(vec!["Predicted battery percentage"]);
        }
    }
    table
}

fn health_card(health: Option<Option<&Health>>) -> Table {
    let mut table = new_table();

    let Some(Some(health)) = health else {
        table.set_header(header(&["Health Score"]));
        table.add_row(vec![if health.is_none() { CARD_LOADING } else { "No health data available." }]);
        return table;
    };

    let color = match health.color {
        HealthColor::Green => Color::Green,
        HealthColor::Yellow => Color::Yellow,
        HealthColor::Red => Color::Red,
    };
    table.set_header(vec![
        Cell::new("Health Score").add_attribute(Attribute::Bold),
        Cell::new(format!("[{}]", health.status)).fg(color).add_attribute(Attribute::Bold),
    ]);

    let metrics = &health.metrics;
    let connectivity = match metrics.connectivity_status {
        Some(0) => "Offline".to_string(),
        Some(1) => "Online".to_string(),
        _ => MISSING.to_string(),
    };

    table.add_row(vec![Cell::new(&health.summary).fg(color), Cell::new("")]);
    table.add_row(vec!["Battery %".to_string(), format!("{}%", or_missing(metrics.battery_percentage))]);
    table.add_row(vec!["Error Code".to_string(), or_missing(metrics.error_code)]);
    table.add_row(vec!["Connectivity".to_string(), connectivity]);
    table.add_row(vec!["Temp (°C)".to_string(), or_missing(metrics.temperature)]);
    if let Some(last_seen) = health.last_seen {
        table.add_row(vec!["Last data".to_string(), last_seen.to_local_string()]);
    }
    table
}

fn anomaly_card(insights: Option<&MlInsights>, rows: usize) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Anomaly Detection"]));

    let Some(insights) = insights else {
        table.add_row(vec![CARD_LOADING]);
        return table;
    };

    let Some(latest) = insights.latest_anomaly() else {
        table.add_row(vec!["No anomaly data."]);
        return table;
    };

    table.add_row(vec![Cell::new(latest).add_attribute(Attribute::Bold)]);
    for row in insights.recent_anomalies(rows) {
        table.add_row(vec![format!("{}  {}", row.timestamp.to_local_string(), row.status().symbol())]);
    }
    table
}

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}
