mod clock;
mod ttl_cache;

pub use clock::{Clock, SystemClock};
pub use ttl_cache::{CacheEntryInfo, TtlCache};

#[cfg(test)]
pub use clock::ManualClock;
