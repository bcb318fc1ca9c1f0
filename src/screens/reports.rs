use crate::charts::{Chart, ChartKind, ChartRegistry};
use crate::domain::Tab;
use crate::domain::snapshot::TelemetrySnapshot;
use crate::extensions::date_time_ext::ToLocalString;
use crate::screens::table::{header, new_table, parameter_table};
use crate::screens::{RenderContext, Screen, heading, placeholder};
use crate::store::DashboardState;
use comfy_table::Cell;

/// Runtime, error code and sensor output reports. Unlike the live view the
/// chart set is torn down and rebuilt whenever the data changes.
#[derive(Debug)]
pub struct ReportsScreen {
    charts: ChartRegistry,
    synced: Option<(TelemetrySnapshot, Vec<TelemetrySnapshot>)>,
    history_rows: usize,
}

impl ReportsScreen {
    pub fn new(history_rows: usize) -> Self {
        ReportsScreen {
            charts: ChartRegistry::new(),
            synced: None,
            history_rows,
        }
    }

    #[cfg(test)]
    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    fn rebuild_charts(&mut self, report: &TelemetrySnapshot, history: &[TelemetrySnapshot]) {
        if let Some((synced_report, synced_history)) = &self.synced {
            if synced_report == report && synced_history.as_slice() == history {
                return;
            }
        }

        self.charts.destroy_all();

        let (labels, runtimes) = runtime_series(report, history, self.history_rows);
        self.charts.create_or_update(
            "runtime",
            Chart::new(ChartKind::Line, "Total Runtime").labels(labels).values(runtimes).dataset_label("Runtime"),
        );

        self.charts.create_or_update(
            "accel_gyro",
            Chart::new(ChartKind::Bar, "DBG Accel + Gyro Output")
                .labels(["DBG Accel", "DBG Gyro"])
                .values(vec![report.dbg_accel_output, report.dbg_gyro_output])
                .dataset_label("Debug"),
        );

        let error_code = report.error_code as f64;
        self.charts.create_or_update(
            "error_code",
            Chart::new(ChartKind::Doughnut, "Error Code")
                .labels(["Error", "OK"])
                .values(vec![error_code, 1.0 - error_code])
                .center_text(report.error_code.to_string()),
        );

        self.synced = Some((report.clone(), history.to_vec()));
    }

    fn render_history(&self, out: &mut String, state: &DashboardState) {
        out.push_str("\nHistory\n");

        let records = match state.history.ready() {
            Some(records) if !records.is_empty() => records,
            Some(_) => {
                out.push_str("No history available.\n");
                return;
            }
            None => {
                out.push_str(placeholder(&state.history).unwrap_or_default());
                out.push('\n');
                return;
            }
        };

        let mut table = new_table();
        table.set_header(header(&["Time Stamp", "Total Runtime", "Battery %", "Temperature", "Error Code"]));
        for record in records.iter().rev().take(self.history_rows) {
            table.add_row(vec![
                Cell::new(record.timestamp.to_local_string()),
                Cell::new(format!("{} min", record.total_runtime)),
                Cell::new(format!("{}%", record.battery_pct())),
                Cell::new(format!("{} °C", record.temperature)),
                Cell::new(record.error_code),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }
}

impl Screen for ReportsScreen {
    fn tab(&self) -> Tab {
        Tab::Reports
    }

    fn render(&mut self, state: &DashboardState, context: &RenderContext<'_>) -> String {
        let mut out = heading("Reports", "Visual insights into runtime, error codes, and sensor outputs from recent operations.");

        let Some(report) = state.report.ready() else {
            if self.synced.take().is_some() {
                self.charts.destroy_all();
            }
            out.push_str(placeholder(&state.report).unwrap_or_default());
            out.push('\n');
            return out;
        };

        let history = state.history.ready().map(Vec::as_slice).unwrap_or_default();
        self.rebuild_charts(report, history);

        out.push_str(&self.charts.render(context.chart_width));
        out.push_str("\nPerformance Metrics\n");
        out.push_str(&parameter_table(&performance_metrics(report), context.highlight).to_string());
        out.push('\n');
        self.render_history(&mut out, state);
        out
    }
}

/// Runtime trend: the latest history records when there are at least two,
/// otherwise three points leading up to the current runtime.
fn runtime_series(report: &TelemetrySnapshot, history: &[TelemetrySnapshot], count: usize) -> (Vec<String>, Vec<f64>) {
    if history.len() >= 2 {
        let recent = &history[history.len().saturating_sub(count.max(2))..];
        let labels = recent.iter().map(|r| r.timestamp.to_local_time_string()).collect();
        let values = recent.iter().map(|r| r.total_runtime).collect();
        return (labels, values);
    }

    let runtime = report.total_runtime;
    (
        vec!["10m".to_string(), "5m".to_string(), "Now".to_string()],
        vec![runtime - 5.0, runtime - 2.0, runtime],
    )
}

fn performance_metrics(s: &TelemetrySnapshot) -> Vec<(&'static str, String)> {
    vec![
        ("Error Code", s.error_code.to_string()),
        ("Total Runtime", s.total_runtime.to_string()),
        ("DBG Accel Output", s.dbg_accel_output.to_string()),
        ("DBG Gyro Output", s.dbg_gyro_output.to_string()),
        ("DBG Motor Status 0", s.dbg_motor_status_0.to_string()),
        ("DBG Motor Status 1", s.dbg_motor_status_1.to_string()),
        ("General Status", s.general_status.to_string()),
        ("Time Stamp", s.timestamp.to_local_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Loadable;
    use crate::domain::snapshot::snapshot_fixture;
    use crate::navigation::search;
    use pretty_assertions::assert_eq;

    fn history_fixture() -> Vec<TelemetrySnapshot> {
        serde_json::from_str(include_str!("../../tests/resources/history_response.json")).unwrap()
    }

    fn context(highlight: Option<&str>) -> RenderContext<'_> {
        RenderContext {
            highlight,
            chart_width: 20,
            cache_entries: &[],
        }
    }

    fn state(report: Loadable<TelemetrySnapshot>, history: Loadable<Vec<TelemetrySnapshot>>) -> DashboardState {
        DashboardState {
            report,
            history,
            ..DashboardState::default()
        }
    }

    #[test]
    fn shows_no_data_when_the_report_failed() {
        let mut screen = ReportsScreen::new(5);

        let rendered = screen.render(&state(Loadable::Unavailable, Loadable::Ready(history_fixture())), &context(None));

        assert!(rendered.contains("No data available."));
        assert!(screen.charts().is_empty());
    }

    #[test]
    fn charts_are_destroyed_when_the_report_goes_away() {
        let mut screen = ReportsScreen::new(5);

        screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Ready(history_fixture())), &context(None));
        assert_eq!(screen.charts().len(), 3);

        let rendered = screen.render(&state(Loadable::Unavailable, Loadable::Ready(history_fixture())), &context(None));
        assert!(rendered.contains("No data available."));
        assert!(screen.charts().is_empty());

        screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Ready(history_fixture())), &context(None));
        assert_eq!(screen.charts().len(), 3);
    }

    #[test]
    fn runtime_falls_back_to_points_leading_up_to_now() {
        let (labels, values) = runtime_series(&snapshot_fixture(), &[], 5);

        assert_eq!(labels, vec!["10m", "5m", "Now"]);
        assert_eq!(values, vec![1279.0, 1282.0, 1284.0]);
    }

    #[test]
    fn runtime_uses_the_latest_history_records() {
        let mut history = history_fixture();
        history.push(snapshot_fixture());

        let (labels, values) = runtime_series(&snapshot_fixture(), &history, 2);

        assert_eq!(labels.len(), 2);
        assert_eq!(values, vec![1277.0, 1284.0]);
    }

    #[test]
    fn renders_charts_metrics_and_history() {
        let mut screen = ReportsScreen::new(5);

        let rendered = screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Ready(history_fixture())), &context(None));

        assert!(rendered.contains("── Total Runtime ──"));
        assert!(rendered.contains("── DBG Accel + Gyro Output ──"));
        assert!(rendered.contains("── Error Code ──"));
        assert!(rendered.contains("Performance Metrics"));
        assert!(rendered.contains("1277 min"));
        assert!(rendered.contains("1270 min"));
    }

    #[test]
    fn history_states_are_rendered_independently_of_the_report() {
        let mut screen = ReportsScreen::new(5);

        let loading = screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Loading), &context(None));
        let empty = screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Ready(Vec::new())), &context(None));

        assert!(loading.contains("Performance Metrics"));
        assert!(loading.contains("Loading data please wait..."));
        assert!(empty.contains("No history available."));
    }

    #[test]
    fn charts_are_rebuilt_only_when_data_changes() {
        let mut screen = ReportsScreen::new(5);
        let report = snapshot_fixture();

        screen.render(&state(Loadable::Ready(report.clone()), Loadable::Loading), &context(None));
        screen.render(&state(Loadable::Ready(report.clone()), Loadable::Loading), &context(None));
        assert_eq!(screen.charts().len(), 3);

        let changed = TelemetrySnapshot { error_code: 1, ..report };
        screen.render(&state(Loadable::Ready(changed), Loadable::Loading), &context(None));

        let error_chart = screen.charts().get("error_code").unwrap();
        assert_eq!(screen.charts().len(), 3);
        assert_eq!(error_chart.revision(), 0);
        assert_eq!(error_chart.data(), &[1.0, 0.0]);
        assert_eq!(error_chart.current_center_text(), Some("1"));
    }

    #[test]
    fn every_reports_search_term_points_at_a_row() {
        let ids = performance_metrics(&snapshot_fixture()).into_iter().map(|(id, _)| id).collect::<Vec<_>>();

        for term in ["error code", "total runtime reports", "time stamp reports", "general status"] {
            let target = search(term).unwrap();
            if target.tab == Tab::Reports {
                assert!(ids.contains(&target.element_id), "no row for '{}'", term);
            }
        }
    }

    #[test]
    fn highlights_the_searched_row() {
        let mut screen = ReportsScreen::new(5);

        let rendered = screen.render(&state(Loadable::Ready(snapshot_fixture()), Loadable::Loading), &context(Some("Error Code")));

        assert!(rendered.contains("▶ Error Code"));
    }
}
