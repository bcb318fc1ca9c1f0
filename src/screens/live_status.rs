use crate::charts::{Chart, ChartKind, ChartRegistry};
use crate::domain::Tab;
use crate::domain::snapshot::TelemetrySnapshot;
use crate::extensions::date_time_ext::ToLocalString;
use crate::screens::table::{header, new_table, parameter_table};
use crate::screens::{RenderContext, Screen, heading, placeholder};
use crate::store::DashboardState;
use comfy_table::Cell;

const TEMPERATURE_CHART: &str = "temperature";
const BATTERY_CHART: &str = "battery";
const CURRENT_CHART: &str = "current";

/// Real-time view of the latest snapshot. Charts are created on the first
/// snapshot and updated in place when a different snapshot arrives.
#[derive(Debug, Default)]
pub struct LiveStatusScreen {
    charts: ChartRegistry,
    synced: Option<TelemetrySnapshot>,
}

impl LiveStatusScreen {
    pub fn new() -> Self {
        LiveStatusScreen::default()
    }

    #[cfg(test)]
    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    fn sync_charts(&mut self, snapshot: &TelemetrySnapshot) {
        if self.synced.as_ref() == Some(snapshot) {
            return;
        }

        self.charts.create_or_update(
            TEMPERATURE_CHART,
            Chart::new(ChartKind::HorizontalBar, "Temperature")
                .labels([""])
                .values(vec![snapshot.temperature])
                .scale(0.0, 50.0)
                .unit("°"),
        );

        let battery = snapshot.battery_pct();
        self.charts.create_or_update(
            BATTERY_CHART,
            Chart::new(ChartKind::Doughnut, "Battery")
                .labels(["Battery", "Remaining"])
                .values(vec![f64::from(battery), f64::from(100 - battery)])
                .center_text(format!("{}%", battery)),
        );

        self.charts.create_or_update(
            CURRENT_CHART,
            Chart::new(ChartKind::Bar, "Average current v/s Running")
                .labels(["Average Current", "Running Current"])
                .values(vec![snapshot.avg_current, snapshot.running_current])
                .dataset_label("Current (mA)"),
        );

        self.synced = Some(snapshot.clone());
    }
}

impl Screen for LiveStatusScreen {
    fn tab(&self) -> Tab {
        Tab::LiveStatus
    }

    fn render(&mut self, state: &DashboardState, context: &RenderContext<'_>) -> String {
        let mut out = heading("Live Status", "Real-time monitoring of system parameters and performance metrics.");

        let Some(snapshot) = state.live.ready() else {
            if self.synced.take().is_some() {
                for key in [TEMPERATURE_CHART, BATTERY_CHART, CURRENT_CHART] {
                    self.charts.destroy(key);
                }
            }
            out.push_str(placeholder(&state.live).unwrap_or_default());
            out.push('\n');
            return out;
        };

        self.sync_charts(snapshot);

        let mut kpis = new_table();
        kpis.set_header(header(&["Total Runtime", "Battery %", "Current (mA)", "Motor Speed"]));
        kpis.add_row(vec![
            Cell::new(format!("{} min", snapshot.total_runtime)),
            Cell::new(format!("{}%", snapshot.battery_pct())),
            Cell::new(snapshot.running_current),
            Cell::new(format!("{:.2}", snapshot.motor_speed)),
        ]);

        out.push_str(&kpis.to_string());
        out.push_str("\n\n");
        out.push_str(&self.charts.render(context.chart_width));
        out.push_str("\nSystem Parameters\n");
        out.push_str(&parameter_table(&system_parameters(snapshot), context.highlight).to_string());
        out.push('\n');
        out
    }
}

fn system_parameters(s: &TelemetrySnapshot) -> Vec<(&'static str, String)> {
    vec![
        ("Device ID", s.device_id.to_string()),
        ("Device State", s.device_state.to_string()),
        ("FW Version", s.fw_version.to_string()),
        ("Temperature", format!("{} °C", s.temperature)),
        ("Humidity", format!("{} %", s.humidity)),
        ("Voltage Battery", format!("{} mV", s.voltage_battery)),
        ("Voltage Solar Panel", format!("{} mV", s.voltage_solar_panel)),
        ("Running Current", format!("{} mA", s.running_current)),
        ("Average Current", format!("{} mA", s.avg_current)),
        ("Motor Speed", s.motor_speed.to_string()),
        ("Panel Location", s.panel_location.to_string()),
        ("Battery", format!("{} %", s.battery_pct())),
        ("Connectivity Status", if s.is_online() { "Online" } else { "Offline" }.to_string()),
        ("Total Runtime", format!("{} min", s.total_runtime)),
        ("DBG Accel Output", s.dbg_accel_output.to_string()),
        ("DBG Gyro Output", s.dbg_gyro_output.to_string()),
        ("DBG Motor Status 0", s.dbg_motor_status_0.to_string()),
        ("DBG Motor Status 1", s.dbg_motor_status_1.to_string()),
        ("General Status", s.general_status.to_string()),
        ("Time Stamp", s.timestamp.to_local_string()),
    ]
}
