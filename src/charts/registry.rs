use crate::charts::Chart;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Updated,
}

/// Owns the chart instances of one screen, keyed by name, in creation order.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: Vec<(String, Chart)>,
}

impl ChartRegistry {
    pub fn new() -> Self {
        ChartRegistry::default()
    }

    /// Creates the instance on first use. Afterwards only the data and center
    /// text of the existing instance are replaced.
    pub fn create_or_update(&mut self, key: &str, chart: Chart) -> Lifecycle {
        match self.charts.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => {
                existing.update_from(chart);
                trace!(chart = key, revision = existing.revision(), "📊 Updated chart");
                Lifecycle::Updated
            }
            None => {
                trace!(chart = key, "📊 Created chart");
                self.charts.push((key.to_string(), chart));
                Lifecycle::Created
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Chart> {
        self.charts.iter().find(|(k, _)| k == key).map(|(_, chart)| chart)
    }

    pub fn destroy(&mut self, key: &str) -> bool {
        let before = self.charts.len();
        self.charts.retain(|(k, _)| k != key);
        before != self.charts.len()
    }

    /// Returns how many instances were destroyed.
    pub fn destroy_all(&mut self) -> usize {
        let count = self.charts.len();
        self.charts.clear();
        if count > 0 {
            trace!(count, "📊 Destroyed charts");
        }
        count
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn render(&self, width: usize) -> String {
        self.charts.iter().map(|(_, chart)| chart.render(width)).collect::<Vec<_>>().join("\n")
    }
}
