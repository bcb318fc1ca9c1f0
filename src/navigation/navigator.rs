use crate::domain::Tab;
use crate::navigation::{SearchError, SearchTarget, search};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug)]
struct Highlight {
    target: SearchTarget,
    until: Instant,
}

/// Active tab plus the element a search pointed at, highlighted for a while.
#[derive(Debug)]
pub struct Navigator {
    active: Tab,
    highlight: Option<Highlight>,
    highlight_duration: Duration,
}

impl Navigator {
    pub fn new(highlight_duration: Duration) -> Self {
        Navigator {
            active: Tab::default(),
            highlight: None,
            highlight_duration,
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Switches to the tab of the matching parameter and highlights it. The
    /// active tab is left alone when nothing matches.
    pub fn search(&mut self, query: &str, now: Instant) -> Result<SearchTarget, SearchError> {
        let target = search(query)?;
        info!(tab = target.tab.id(), element = target.element_id, "🔍 Found '{}'", query.trim());

        self.active = target.tab;
        self.highlight = Some(Highlight {
            target,
            until: now + self.highlight_duration,
        });
        Ok(target)
    }

    /// The element to highlight on `tab`, if a search pointed there recently.
    pub fn highlighted(&self, tab: Tab, now: Instant) -> Option<&'static str> {
        self.highlight
            .as_ref()
            .filter(|highlight| highlight.target.tab == tab && now < highlight.until)
            .map(|highlight| highlight.target.element_id)
    }

    /// When the current highlight goes away, if it is still showing at `now`.
    pub fn highlight_expiry(&self, now: Instant) -> Option<Instant> {
        self.highlight.as_ref().map(|highlight| highlight.until).filter(|until| now < *until)
    }
}
