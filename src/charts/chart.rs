use std::fmt::Write;

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const COLUMN_HEIGHT: usize = 5;
const COLUMN_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Vertical columns.
    Bar,
    HorizontalBar,
    Line,
    /// A two or more segment ring, drawn as a segmented bar with its center text.
    Doughnut,
}

/// A chart instance. Kind, title and labels are fixed at creation, the data and
/// center text change through [`ChartRegistry`](crate::charts::ChartRegistry) updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    kind: ChartKind,
    title: String,
    labels: Vec<String>,
    dataset_label: Option<String>,
    values: Vec<f64>,
    scale: Option<(f64, f64)>,
    unit: Option<String>,
    center_text: Option<String>,
    revision: u64,
}

impl Chart {
    pub fn new(kind: ChartKind, title: &str) -> Self {
        Chart {
            kind,
            title: title.to_string(),
            labels: Vec::new(),
            dataset_label: None,
            values: Vec::new(),
            scale: None,
            unit: None,
            center_text: None,
            revision: 0,
        }
    }

    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    pub fn dataset_label(mut self, label: &str) -> Self {
        self.dataset_label = Some(label.to_string());
        self
    }

    pub fn scale(mut self, min: f64, max: f64) -> Self {
        self.scale = Some((min, max));
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn center_text(mut self, text: String) -> Self {
        self.center_text = Some(text);
        self
    }

    #[cfg(test)]
    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    #[cfg(test)]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub fn data(&self) -> &[f64] {
        &self.values
    }

    #[cfg(test)]
    pub fn current_center_text(&self) -> Option<&str> {
        self.center_text.as_deref()
    }

    /// How many times the instance has been updated since it was created.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(super) fn update_from(&mut self, other: Chart) {
        self.values = other.values;
        self.center_text = other.center_text;
        self.revision += 1;
    }

    pub fn render(&self, width: usize) -> String {
        let mut out = format!("── {} ──\n", self.title);
        if let Some(label) = &self.dataset_label {
            let _ = writeln!(out, "{}", label);
        }

        match self.kind {
            ChartKind::HorizontalBar => self.render_rows(&mut out, width),
            ChartKind::Bar => self.render_columns(&mut out),
            ChartKind::Line => self.render_line(&mut out),
            ChartKind::Doughnut => self.render_doughnut(&mut out, width),
        }
        out
    }

    fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("")
    }

    fn format_value(&self, value: f64) -> String {
        format!("{}{}", trim_number(value), self.unit.as_deref().unwrap_or(""))
    }

    fn range(&self) -> (f64, f64) {
        self.scale.unwrap_or_else(|| {
            let max = self.values.iter().copied().fold(0.0_f64, f64::max);
            (0.0, if max > 0.0 { max } else { 1.0 })
        })
    }

    /// Fraction of the scale covered by `value`, clamped to 0..=1.
    fn fraction(&self, value: f64) -> f64 {
        let (min, max) = self.range();
        if max <= min {
            return 0.0;
        }
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }

    fn render_rows(&self, out: &mut String, width: usize) {
        let label_width = self.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        for (index, value) in self.values.iter().enumerate() {
            let filled = (self.fraction(*value) * width as f64).round() as usize;
            let _ = writeln!(
                out,
                "{:<label_width$} {}{} {}",
                self.label(index),
                "█".repeat(filled),
                "·".repeat(width.saturating_sub(filled)),
                self.format_value(*value),
            );
        }

        if let Some((min, max)) = self.scale {
            let _ = writeln!(out, "{:<label_width$} {}..{}", "", self.format_value(min), self.format_value(max));
        }
    }

    fn render_columns(&self, out: &mut String) {
        let heights = self
            .values
            .iter()
            .map(|value| (self.fraction(*value) * COLUMN_HEIGHT as f64).round() as usize)
            .collect::<Vec<_>>();

        let values_row = self.values.iter().map(|v| format!("{:^w$}", self.format_value(*v), w = COLUMN_WIDTH)).collect::<String>();
        let _ = writeln!(out, "{}", values_row.trim_end());

        for level in (1..=COLUMN_HEIGHT).rev() {
            let row = heights
                .iter()
                .map(|height| format!("{:^w$}", if *height >= level { "███" } else { "" }, w = COLUMN_WIDTH))
                .collect::<String>();
            let _ = writeln!(out, "{}", row.trim_end());
        }

        let labels_row = (0..self.values.len())
            .map(|index| format!("{:^w$}", truncate(self.label(index), COLUMN_WIDTH - 1), w = COLUMN_WIDTH))
            .collect::<String>();
        let _ = writeln!(out, "{}", labels_row.trim_end());
    }

    fn render_line(&self, out: &mut String) {
        let (Some(first), Some(last)) = (self.values.first(), self.values.last()) else {
            let _ = writeln!(out, "(no data)");
            return;
        };

        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sparkline = self
            .values
            .iter()
            .map(|value| {
                if max > min {
                    let index = ((value - min) / (max - min) * (SPARKS.len() - 1) as f64).round() as usize;
                    SPARKS[index.min(SPARKS.len() - 1)]
                } else {
                    SPARKS[SPARKS.len() / 2]
                }
            })
            .collect::<String>();

        let _ = writeln!(out, "{}  {} → {}", sparkline, self.format_value(*first), self.format_value(*last));
        if !self.labels.is_empty() {
            let _ = writeln!(out, "{}", self.labels.join(" "));
        }
    }

    fn render_doughnut(&self, out: &mut String, width: usize) {
        let total = self.values.iter().filter(|v| **v > 0.0).sum::<f64>();
        let fills = ['█', '░', '▒', '▓'];

        let mut ring = String::new();
        if total > 0.0 {
            let mut drawn = 0;
            for (index, value) in self.values.iter().enumerate() {
                let cells = if index + 1 == self.values.len() {
                    width - drawn
                } else {
                    ((value.max(0.0) / total) * width as f64).round() as usize
                };
                let cells = cells.min(width - drawn);
                ring.extend(std::iter::repeat_n(fills[index % fills.len()], cells));
                drawn += cells;
            }
        } else {
            ring = "░".repeat(width);
        }

        let _ = writeln!(out, "{}  {}", ring, self.center_text.as_deref().unwrap_or(""));

        let legend = self
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| format!("{} {} {}", fills[index % fills.len()], self.label(index), self.format_value(*value)))
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", legend);
    }
}

/// Whole numbers print without a fraction, others with at most two decimals.
pub(crate) fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        let formatted = format!("{:.2}", value);
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(12.0, "12")]
    #[case(12.3456, "12.35")]
    #[case(0.5, "0.5")]
    #[case(-3.0, "-3")]
    fn trims_numbers(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(trim_number(value), expected);
    }

    #[test]
    fn horizontal_bar_fills_relative_to_its_scale() {
        let chart = Chart::new(ChartKind::HorizontalBar, "Temperature")
            .labels([""])
            .values(vec![25.0])
            .scale(0.0, 50.0)
            .unit("°");

        let rendered = chart.render(10);

        assert_eq!(rendered, "── Temperature ──\n █████····· 25°\n 0°..50°\n");
    }

    #[test]
    fn horizontal_bar_clamps_values_outside_the_scale() {
        let chart = Chart::new(ChartKind::HorizontalBar, "Temperature").labels([""]).values(vec![80.0]).scale(0.0, 50.0);

        assert!(chart.render(4).contains("████ 80"));
    }

    #[test]
    fn columns_scale_to_the_largest_value() {
        let chart = Chart::new(ChartKind::Bar, "Current")
            .labels(["Average", "Running"])
            .values(vec![20.0, 40.0])
            .dataset_label("Current (mA)");

        let rendered = chart.render(30);
        let lines = rendered.lines().collect::<Vec<_>>();

        assert_eq!(lines[1], "Current (mA)");
        assert_eq!(lines[2], "    20        40");
        // top row only holds the tallest column
        assert_eq!(lines[3], "             ███");
        assert_eq!(lines.last(), Some(&" Average   Running"));
    }

    #[test]
    fn line_renders_a_sparkline_with_first_and_last_value() {
        let chart = Chart::new(ChartKind::Line, "Total Runtime")
            .labels(["10m", "5m", "Now"])
            .values(vec![1279.0, 1282.0, 1284.0]);

        let rendered = chart.render(30);

        assert_eq!(rendered, "── Total Runtime ──\n▁▅█  1279 → 1284\n10m 5m Now\n");
    }

    #[test]
    fn flat_line_renders_mid_height() {
        let chart = Chart::new(ChartKind::Line, "Flat").values(vec![3.0, 3.0]);

        assert!(chart.render(30).contains("▅▅"));
    }

    #[test]
    fn doughnut_splits_the_ring_and_shows_the_center_text() {
        let chart = Chart::new(ChartKind::Doughnut, "Battery")
            .labels(["Battery", "Remaining"])
            .values(vec![80.0, 20.0])
            .center_text("80%".to_string());

        let rendered = chart.render(10);

        assert_eq!(rendered, "── Battery ──\n████████░░  80%\n█ Battery 80  ░ Remaining 20\n");
    }

    #[test]
    fn empty_doughnut_renders_an_empty_ring() {
        let chart = Chart::new(ChartKind::Doughnut, "Error Code").labels(["Error", "OK"]).values(vec![0.0, 0.0]);

        assert!(chart.render(5).contains("░░░░░"));
    }
}
