mod client;
mod ml;
mod source;
mod telemetry;

pub use client::{FetchError, new_client};
pub use ml::MlApi;
pub use source::{MlSource, TelemetrySource};
pub use telemetry::TelemetryApi;
