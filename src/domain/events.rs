use crate::domain::insights::MlInsights;
use crate::domain::snapshot::TelemetrySnapshot;

#[derive(Debug)]
pub enum Event {
    LiveLoaded(Option<TelemetrySnapshot>),
    ReportLoaded(Option<TelemetrySnapshot>),
    HistoryLoaded(Vec<TelemetrySnapshot>),
    InsightsRequested,
    InsightsLoaded(MlInsights),
}
