pub mod events;
pub mod insights;
mod loadable;
mod number_deserializer;
pub mod snapshot;
mod tab;
mod timestamp_deserializer;

pub use loadable::Loadable;
pub use tab::Tab;
