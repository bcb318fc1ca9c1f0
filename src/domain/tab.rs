use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Admin,
    LiveStatus,
    Reports,
    Alerts,
    AiIntelligence,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Admin, Tab::LiveStatus, Tab::Reports, Tab::Alerts, Tab::AiIntelligence];

    pub fn id(&self) -> &'static str {
        match self {
            Tab::Admin => "admin",
            Tab::LiveStatus => "live-status",
            Tab::Reports => "reports",
            Tab::Alerts => "alerts",
            Tab::AiIntelligence => "ai-intelligence",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Admin => "Admin",
            Tab::LiveStatus => "Live Status",
            Tab::Reports => "Reports",
            Tab::Alerts => "Alerts",
            Tab::AiIntelligence => "AI Intelligence",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tab {
    type Err = ParseTabError;

    /// Accepts the tab id, its label or its 1-based position, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        if let Ok(position) = needle.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| Tab::ALL.get(index).copied())
                .ok_or_else(|| ParseTabError(s.to_string()));
        }

        Tab::ALL
            .into_iter()
            .find(|tab| tab.id().eq_ignore_ascii_case(needle) || tab.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseTabError(s.to_string()))
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown tab '{0}'")]
pub struct ParseTabError(String);
