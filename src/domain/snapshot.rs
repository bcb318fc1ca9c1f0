use crate::domain::number_deserializer::deserialize_number;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reading of the device's sensors and status registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Minutes.
    pub total_runtime: f64,
    /// Raw register value between 0 and 255, see [`TelemetrySnapshot::battery_pct`].
    pub battery_percentage: f64,
    /// mA.
    pub running_current: f64,
    /// mA.
    pub avg_current: f64,
    pub motor_speed: f64,
    pub connectivity_status: u8,
    pub device_id: i64,
    pub device_state: i64,
    pub fw_version: f64,
    /// °C.
    #[serde(deserialize_with = "deserialize_number")]
    pub temperature: f64,
    /// %.
    #[serde(deserialize_with = "deserialize_number")]
    pub humidity: f64,
    /// mV.
    pub voltage_battery: f64,
    /// mV.
    pub voltage_solar_panel: f64,
    pub panel_location: i64,
    pub error_code: i64,
    pub dbg_accel_output: f64,
    pub dbg_gyro_output: f64,
    pub dbg_motor_status_0: i64,
    pub dbg_motor_status_1: i64,
    pub general_status: i64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySnapshot {
    /// Battery charge in percent, scaled from the raw 0..255 register value.
    pub fn battery_pct(&self) -> u8 {
        let pct = (self.battery_percentage / 255.0 * 100.0).clamp(0.0, 100.0);
        pct.round() as u8
    }

    pub fn is_online(&self) -> bool {
        self.connectivity_status != 0
    }
}

#[cfg(test)]
pub fn snapshot_fixture() -> TelemetrySnapshot {
    serde_json::from_str(include_str!("../../tests/resources/fake_data_response.json")).unwrap()
}
