//! Contract between the discovery runner and individual discovery units.

pub mod container;
pub mod envelope;
pub mod error;
pub mod finding;
pub mod unit;

pub use container::Container;
pub use envelope::{CacheEnvelope, CachedLocation, UnitCache};
pub use error::DiscoveryError;
pub use finding::{FindingCollection, FindingStore, UnitFindings};
pub use unit::DiscoveryUnit;
