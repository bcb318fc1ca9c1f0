mod navigator;
mod search;

pub use navigator::Navigator;
pub use search::{SearchError, SearchTarget, search};
