use crate::cache::CacheEntryInfo;
use crate::domain::Tab;
use crate::extensions::date_time_ext::ToLocalString;
use crate::extensions::duration_ext::ToShortString;
use crate::screens::table::{header, new_table};
use crate::screens::{RenderContext, Screen, heading};
use crate::store::DashboardState;
use comfy_table::{Cell, Color};
use std::time::Duration;

/// Backend endpoints and the contents of the response cache.
#[derive(Debug)]
pub struct AdminScreen {
    telemetry_url: String,
    ml_url: String,
    ttl: Duration,
    poll_interval: Duration,
}

impl AdminScreen {
    pub fn new(telemetry_url: &str, ml_url: &str, ttl: Duration, poll_interval: Duration) -> Self {
        AdminScreen {
            telemetry_url: telemetry_url.to_string(),
            ml_url: ml_url.to_string(),
            ttl,
            poll_interval,
        }
    }
}

impl Screen for AdminScreen {
    fn tab(&self) -> Tab {
        Tab::Admin
    }

    fn render(&mut self, _state: &DashboardState, context: &RenderContext<'_>) -> String {
        let mut out = heading("Admin", "Backend connections and cached responses.");

        let mut backends = new_table();
        backends.set_header(header(&["Setting", "Value"]));
        backends.add_row(vec!["Telemetry backend".to_string(), self.telemetry_url.clone()]);
        backends.add_row(vec!["ML backend".to_string(), self.ml_url.clone()]);
        backends.add_row(vec!["Cache TTL".to_string(), self.ttl.to_short_string()]);
        backends.add_row(vec!["Poll interval".to_string(), self.poll_interval.to_short_string()]);
        out.push_str(&backends.to_string());
        out.push_str("\n\nCache\n");

        if context.cache_entries.is_empty() {
            out.push_str("Cache is empty.\n");
            return out;
        }

        out.push_str(&cache_table(context.cache_entries));
        out.push('\n');
        out
    }
}

fn cache_table(entries: &[CacheEntryInfo]) -> String {
    let mut table = new_table();
    table.set_header(header(&["Key", "Fetched at", "Age", "State"]));
    for entry in entries {
        let state = if entry.fresh {
            Cell::new("fresh").fg(Color::Green)
        } else {
            Cell::new("stale").fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&entry.key),
            Cell::new(entry.fetched_at.to_local_string()),
            Cell::new(entry.age.to_short_string()),
            state,
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn screen() -> AdminScreen {
        AdminScreen::new(
            "http://localhost:5000",
            "http://localhost:8000",
            Duration::from_secs(15 * 60),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn renders_backends_and_an_empty_cache() {
        let rendered = screen().render(&DashboardState::default(), &RenderContext::default());

        assert!(rendered.contains("http://localhost:5000"));
        assert!(rendered.contains("http://localhost:8000"));
        assert!(rendered.contains("15m"));
        assert!(rendered.contains("1m"));
        assert!(rendered.contains("Cache is empty."));
    }

    #[test]
    fn renders_cache_entries_with_their_freshness() {
        let entries = vec![
            CacheEntryInfo {
                key: "history_data".to_string(),
                fetched_at: Utc::now() - TimeDelta::minutes(21),
                age: TimeDelta::minutes(21),
                fresh: false,
            },
            CacheEntryInfo {
                key: "live_data".to_string(),
                fetched_at: Utc::now() - TimeDelta::minutes(2),
                age: TimeDelta::minutes(2),
                fresh: true,
            },
        ];
        let context = RenderContext {
            cache_entries: &entries,
            ..RenderContext::default()
        };

        let rendered = screen().render(&DashboardState::default(), &context);

        assert!(rendered.contains("history_data"));
        assert!(rendered.contains("21m"));
        assert!(rendered.contains("stale"));
        assert!(rendered.contains("live_data"));
        assert!(rendered.contains("fresh"));
        assert!(!rendered.contains("Cache is empty."));
    }
}
