use chrono::TimeDelta;
use std::time::Duration;

pub trait ToShortString {
    /// Compact form using the two largest units, e.g. `15m`, `1h 5m` or `1500ms`.
    fn to_short_string(&self) -> String;
}

impl ToShortString for Duration {
    fn to_short_string(&self) -> String {
        let secs = self.as_secs();
        let millis = self.subsec_millis();

        match (secs / 3600, secs % 3600 / 60, secs % 60) {
            (0, 0, 0) => format!("{}ms", millis),
            (0, 0, s) if millis > 0 => format!("{}ms", s * 1000 + u64::from(millis)),
            (0, 0, s) => format!("{}s", s),
            (0, m, 0) => format!("{}m", m),
            (0, m, s) => format!("{}m {}s", m, s),
            (h, 0, _) => format!("{}h", h),
            (h, m, _) => format!("{}h {}m", h, m),
        }
    }
}

impl ToShortString for TimeDelta {
    /// Negative deltas (an instant in the future) print as zero.
    fn to_short_string(&self) -> String {
        self.to_std().unwrap_or_default().to_short_string()
    }
}
