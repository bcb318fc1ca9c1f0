mod chart;
mod registry;

pub use chart::{Chart, ChartKind};
pub use registry::ChartRegistry;
