use crate::app_config::AppConfig;
use crate::cache::CacheEntryInfo;
use crate::domain::Tab;
use crate::navigation::{Navigator, SearchError, SearchTarget};
use crate::screens::{AdminScreen, AiIntelligenceScreen, AlertsScreen, LiveStatusScreen, RenderContext, ReportsScreen, Screen};
use crate::store::DashboardState;
use std::time::Instant;

/// The tab bar, the active screen and a one-line status message.
#[derive(Debug)]
pub struct Dashboard {
    navigator: Navigator,
    screens: Vec<Box<dyn Screen>>,
    chart_width: usize,
    message: Option<String>,
}

impl Dashboard {
    pub fn new(config: &AppConfig) -> Self {
        let ui = config.ui();
        let screens: Vec<Box<dyn Screen>> = vec![
            Box::new(AdminScreen::new(
                config.telemetry().url(),
                config.ml().url(),
                config.cache().ttl(),
                config.core().poll_interval(),
            )),
            Box::new(LiveStatusScreen::new()),
            Box::new(ReportsScreen::new(ui.history_rows())),
            Box::new(AlertsScreen::new()),
            Box::new(AiIntelligenceScreen::new(ui.anomaly_rows())),
        ];

        Dashboard {
            navigator: Navigator::new(ui.highlight_duration()),
            screens,
            chart_width: ui.chart_width(),
            message: None,
        }
    }

    pub fn active(&self) -> Tab {
        self.navigator.active()
    }

    pub fn select(&mut self, tab: Tab) {
        self.navigator.select(tab);
        self.message = None;
    }

    /// An empty query is ignored. A failed search leaves the active tab as is
    /// and shows the error instead.
    pub fn search(&mut self, query: &str, now: Instant) -> Option<SearchTarget> {
        match self.navigator.search(query, now) {
            Ok(target) => {
                self.message = None;
                Some(target)
            }
            Err(SearchError::EmptyQuery) => None,
            Err(err @ SearchError::NotFound(_)) => {
                self.message = Some(err.to_string());
                None
            }
        }
    }

    pub fn highlight_expiry(&self, now: Instant) -> Option<Instant> {
        self.navigator.highlight_expiry(now)
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn render(&mut self, state: &DashboardState, cache_entries: &[CacheEntryInfo], now: Instant) -> String {
        let active = self.navigator.active();
        let mut out = tab_bar(active);

        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        out.push('\n');

        let context = RenderContext {
            highlight: self.navigator.highlighted(active, now),
            chart_width: self.chart_width,
            cache_entries,
        };
        if let Some(screen) = self.screens.iter_mut().find(|screen| screen.tab() == active) {
            out.push_str(&screen.render(state, &context));
        }
        out
    }
}

fn tab_bar(active: Tab) -> String {
    let tabs = Tab::ALL
        .iter()
        .enumerate()
        .map(|(index, tab)| {
            if *tab == active {
                format!("[{}] *{}*", index + 1, tab.label())
            } else {
                format!("[{}] {}", index + 1, tab.label())
            }
        })
        .collect::<Vec<_>>();
    format!("{}\n", tabs.join("  "))
}
