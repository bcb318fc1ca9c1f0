mod admin;
mod ai_intelligence;
mod alerts;
mod live_status;
mod reports;
mod table;

pub use admin::AdminScreen;
pub use ai_intelligence::AiIntelligenceScreen;
pub use alerts::AlertsScreen;
pub use live_status::LiveStatusScreen;
pub use reports::ReportsScreen;

use crate::cache::CacheEntryInfo;
use crate::domain::{Loadable, Tab};
use crate::store::DashboardState;
use std::fmt::Debug;

pub const LOADING: &str = "Loading data please wait...";
pub const NO_DATA: &str = "No data available.";
pub const MISSING: &str = "—";

/// Everything a screen needs besides the dashboard state.
#[derive(Debug, Default)]
pub struct RenderContext<'a> {
    /// Element id of the row to highlight.
    pub highlight: Option<&'a str>,
    pub chart_width: usize,
    pub cache_entries: &'a [CacheEntryInfo],
}

pub trait Screen: Debug + Send {
    fn tab(&self) -> Tab;

    /// Takes `&mut self` so screens can keep their chart instances between frames.
    fn render(&mut self, state: &DashboardState, context: &RenderContext<'_>) -> String;
}

fn heading(title: &str, subtitle: &str) -> String {
    format!("{}\n{}\n\n", title, subtitle)
}

/// The text shown in place of data that is not ready.
fn placeholder<T>(loadable: &Loadable<T>) -> Option<&'static str> {
    match loadable {
        Loadable::Loading => Some(LOADING),
        Loadable::Unavailable => Some(NO_DATA),
        Loadable::Ready(_) => None,
    }
}
