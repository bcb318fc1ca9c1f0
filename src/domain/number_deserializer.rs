use serde::de::{Error, Unexpected};
use serde::{Deserialize, Deserializer};

/// Accepts a JSON number or a string holding one. The telemetry backend sends
/// some readings (temperature, humidity) as strings.
pub fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid_value(Unexpected::Str(&value), &"a number or a numeric string")),
    }
}
